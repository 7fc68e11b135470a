//! Decision-log record construction.
//!
//! Shapes the append-only audit row a caller persists after acting on a
//! PolicyResult. Storage, retries and de-duplication belong to the caller.

use serde::{Deserialize, Serialize};

use crate::types::{AdvisoryAction, EscalationFlag, PolicyGate, PolicyResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleImpact {
  pub policy_gate: PolicyGate,
  pub triggered_constraints: Vec<String>,
  pub escalation_flags: Vec<EscalationFlag>,
  /// The action taken was on the blocked list (an operator override).
  pub action_was_blocked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionMetadata {
  pub engine_version: String,
  pub deterministic_hash: String,
  pub config_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionLogRecord {
  pub trigger: String,
  pub action_taken: String,
  pub rule_impact: RuleImpact,
  pub metadata: DecisionMetadata,
}

/// Build the audit row for `action_taken` under `result`.
pub fn record(result: &PolicyResult, trigger: impl Into<String>, action_taken: impl Into<String>) -> DecisionLogRecord {
  let action_taken = action_taken.into();
  let action_was_blocked = result
    .blocked_actions
    .iter()
    .any(|b| b.action.as_str() == action_taken);

  DecisionLogRecord {
    trigger: trigger.into(),
    action_taken,
    rule_impact: RuleImpact {
      policy_gate: result.policy_gate,
      triggered_constraints: result.triggered_ids(),
      escalation_flags: result.escalation_flags.clone(),
      action_was_blocked,
    },
    metadata: DecisionMetadata {
      engine_version: result.meta.engine_version.clone(),
      deterministic_hash: result.meta.deterministic_hash.clone(),
      config_hash: result.meta.config_hash.clone(),
    },
  }
}

/// Convenience for the typed action vocabulary.
pub fn record_action(result: &PolicyResult, trigger: impl Into<String>, action: AdvisoryAction) -> DecisionLogRecord {
  record(result, trigger, action.as_str())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::engine::Engine;
  use crate::types::EvaluationRequest;
  use chrono::{TimeZone, Utc};
  use serde_json::json;

  fn storm_result() -> PolicyResult {
    let raw: EvaluationRequest = serde_json::from_value(json!({
      "hazardType": "Storm",
      "phase": "Event",
      "severity": 3,
      "crews": {"available": 6, "enRoute": 0, "estimatedNeeded": 2},
      "dataQuality": {"completeness": 0.9, "freshnessMinutes": 3}
    }))
    .unwrap();
    Engine::with_defaults().evaluate_at(&raw, Utc.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap())
  }

  #[test]
  fn blocked_action_is_marked_as_override() {
    let result = storm_result();
    let rec = record_action(&result, "evt-42", AdvisoryAction::DispatchCrews);
    assert!(rec.rule_impact.action_was_blocked);
    assert_eq!(rec.rule_impact.policy_gate, PolicyGate::Block);
    assert_eq!(rec.rule_impact.triggered_constraints, vec!["SC-STORM-001"]);
    assert_eq!(rec.metadata.deterministic_hash, result.meta.deterministic_hash);
  }

  #[test]
  fn wire_shape_uses_log_field_names() {
    let rec = record(&storm_result(), "evt-42", "request_mutual_aid");
    assert!(!rec.rule_impact.action_was_blocked);
    let v = serde_json::to_value(&rec).unwrap();
    assert!(v.get("action_taken").is_some());
    assert!(v.get("rule_impact").is_some());
    assert!(v["metadata"].get("engineVersion").is_some());
    assert!(v["metadata"].get("deterministicHash").is_some());
    assert!(v["metadata"].get("configHash").is_some());
  }
}
