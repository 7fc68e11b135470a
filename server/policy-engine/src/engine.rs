//! Core engine: wires normalization, rules, aggregation, explainability and audit.

use chrono::{DateTime, Utc};

use crate::audit;
use crate::config::Config;
use crate::error::EngineError;
use crate::explain;
use crate::gate;
use crate::normalize;
use crate::rules;
use crate::types::*;

/// The safety policy engine. Holds only immutable configuration; every call is
/// independent and safe to run concurrently.
#[derive(Debug, Clone, Default)]
pub struct Engine {
  config: Config,
}

impl Engine {
  pub fn new(config: Config) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(Config::default())
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  /// Evaluate a raw request, stamping the current time.
  pub fn evaluate(&self, raw: &EvaluationRequest) -> PolicyResult {
    let input = normalize::normalize(raw, &self.config);
    let meta = audit::stamp_now(&input, &self.config, raw.scenario_id.clone());
    self.assemble(&input, meta)
  }

  /// Evaluate a raw request at an explicit instant (replays, tests).
  pub fn evaluate_at(&self, raw: &EvaluationRequest, at: DateTime<Utc>) -> PolicyResult {
    let input = normalize::normalize(raw, &self.config);
    let meta = audit::stamp(&input, &self.config, at, raw.scenario_id.clone());
    self.assemble(&input, meta)
  }

  /// Evaluate an already-normalized input.
  pub fn evaluate_input(&self, input: &EvaluationInput, at: DateTime<Utc>) -> PolicyResult {
    self.assemble(input, audit::stamp(input, &self.config, at, None))
  }

  /// Parse one JSON request and evaluate it. Only the parse can fail.
  pub fn evaluate_json(&self, line: &str) -> Result<PolicyResult, EngineError> {
    self.evaluate_value(serde_json::from_str(line)?)
  }

  /// Evaluate an already-decoded JSON document; anything but an object is rejected.
  pub fn evaluate_value(&self, value: serde_json::Value) -> Result<PolicyResult, EngineError> {
    if !value.is_object() {
      return Err(EngineError::parse("request must be a JSON object"));
    }
    let raw: EvaluationRequest = serde_json::from_value(value)?;
    Ok(self.evaluate(&raw))
  }

  fn assemble(&self, input: &EvaluationInput, meta: PolicyMeta) -> PolicyResult {
    let outcomes = rules::evaluate_all(input, &self.config);
    let summary = gate::aggregate(&outcomes);
    let explainability = explain::compose(input, &self.config);

    tracing::debug!(
      hash = %meta.deterministic_hash,
      gate = ?summary.gate,
      triggered = outcomes.iter().filter(|o| o.triggered()).count(),
      blocked = summary.blocked.len(),
      "policy evaluated"
    );

    PolicyResult {
      policy_gate: summary.gate,
      allowed_actions: summary.allowed,
      blocked_actions: summary.blocked,
      escalation_flags: summary.flags,
      safety_constraints: outcomes.iter().map(|o| o.to_constraint()).collect(),
      explainability,
      meta,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use serde_json::json;

  fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap()
  }

  fn request(value: serde_json::Value) -> EvaluationRequest {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn every_constraint_is_reported() {
    let engine = Engine::with_defaults();
    let result = engine.evaluate_at(&EvaluationRequest::default(), at());
    assert_eq!(result.safety_constraints.len(), rules::RULES.len());
    let ids: Vec<&str> = result.safety_constraints.iter().map(|c| c.id.as_str()).collect();
    let table: Vec<&str> = rules::RULES.iter().map(|r| r.id).collect();
    assert_eq!(ids, table);
  }

  #[test]
  fn heat_severity_four_blocks_reroute() {
    let engine = Engine::with_defaults();
    let raw = request(json!({
      "hazardType": "Heatwave",
      "phase": "Event",
      "severity": 4,
      "crews": {"available": 5, "enRoute": 0, "estimatedNeeded": 2},
      "dataQuality": {"completeness": 0.9, "freshnessMinutes": 5}
    }));
    let result = engine.evaluate_at(&raw, at());
    assert!(result.has_flag(EscalationFlag::TransformerThermalStress));
    assert!(result.has_flag(EscalationFlag::HeatLoadSpike));
    assert!(result.is_blocked(AdvisoryAction::RerouteLoad));
    assert_eq!(result.policy_gate, PolicyGate::Block);
  }

  #[test]
  fn scenario_id_is_echoed_but_not_hashed() {
    let engine = Engine::with_defaults();
    let a = engine.evaluate_at(&request(json!({"scenarioId": "evt-1", "hazardType": "Storm"})), at());
    let b = engine.evaluate_at(&request(json!({"scenarioId": "evt-2", "hazardType": "Storm"})), at());
    assert_eq!(a.meta.scenario_id.as_deref(), Some("evt-1"));
    assert_eq!(a.meta.deterministic_hash, b.meta.deterministic_hash);
  }

  #[test]
  fn evaluate_json_rejects_non_objects() {
    let engine = Engine::with_defaults();
    assert!(engine.evaluate_json("[1, 2]").is_err());
    assert!(engine.evaluate_json("{not json").is_err());
    assert!(engine.evaluate_json("{}").is_ok());
  }

  #[test]
  fn malformed_field_types_degrade_instead_of_failing() {
    let engine = Engine::with_defaults();
    let result = engine
      .evaluate_json(
        r#"{"severity": {"nested": true}, "hazardType": "Ice/Snow", "phase": 7,
            "assets": "not-a-list", "crews": [1, 2], "criticalLoads": [42, {"type": "hospital"}]}"#,
      )
      .unwrap();
    assert_eq!(result.meta.engine_version, audit::ENGINE_VERSION);
    assert!(result
      .explainability
      .assumptions
      .iter()
      .any(|a| a.starts_with("Severity was not supplied")));
    assert!(result
      .explainability
      .assumptions
      .iter()
      .any(|a| a.starts_with("Event phase was not recognised")));
    let crit = result.constraint("SC-CRIT-001").unwrap();
    assert_eq!(crit.evidence.len(), 1);
  }
}
