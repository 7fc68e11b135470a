//! HTTP handlers for the policy service.

use axum::{
  extract::{rejection::JsonRejection, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use policy_engine::rules::{self as rule_table, RuleDescriptor};
use policy_engine::ErrorOutput;
use serde_json::Value;
use std::sync::Arc;

use crate::state::AppState;

pub async fn health() -> &'static str {
  "ok"
}

/// Static constraint catalog in evaluation order.
pub async fn rules() -> Json<Vec<RuleDescriptor>> {
  Json(rule_table::catalog())
}

fn unavailable(message: String) -> Response {
  (StatusCode::BAD_REQUEST, Json(ErrorOutput::unavailable(message))).into_response()
}

/// Evaluate one snapshot. Bodies that never reach the engine get a 400 with an
/// "evaluation_unavailable" error, never a gate value.
pub async fn evaluate(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Response {
  let Json(body) = match payload {
    Ok(body) => body,
    Err(rejection) => {
      tracing::warn!(error = %rejection.body_text(), "evaluate: rejected body");
      return unavailable(rejection.body_text());
    }
  };

  match state.engine.evaluate_value(body) {
    Ok(result) => {
      tracing::info!(
        gate = ?result.policy_gate,
        hash = %result.meta.deterministic_hash,
        scenario = result.meta.scenario_id.as_deref().unwrap_or("-"),
        "evaluate: ok"
      );
      Json(result).into_response()
    }
    Err(e) => {
      tracing::warn!(error = %e, "evaluate: rejected request");
      unavailable(e.to_string())
    }
  }
}
