//! Gate aggregation: overall verdict, action catalogs and escalation flags.

use std::collections::BTreeSet;

use crate::rules::RuleOutcome;
use crate::types::*;

/// Everything the aggregator derives from the rule outcomes.
#[derive(Debug, Clone, PartialEq)]
pub struct GateSummary {
  pub gate: PolicyGate,
  pub blocked: Vec<BlockedAction>,
  pub allowed: Vec<AllowedAction>,
  pub flags: Vec<EscalationFlag>,
}

/// BLOCK if any triggered rule blocks an action, WARN if anything triggered, else PASS.
pub fn policy_gate(outcomes: &[RuleOutcome]) -> PolicyGate {
  if outcomes.iter().any(RuleOutcome::is_blocking) {
    PolicyGate::Block
  } else if outcomes.iter().any(RuleOutcome::triggered) {
    PolicyGate::Warn
  } else {
    PolicyGate::Pass
  }
}

/// One entry per blocked action, ordered by the first rule that blocks it.
///
/// Several rules blocking the same action are merged: distinct reasons joined
/// with "; ", distinct remediation steps kept in rule order.
pub fn blocked_actions(outcomes: &[RuleOutcome]) -> Vec<BlockedAction> {
  let mut blocked: Vec<BlockedAction> = Vec::new();
  for outcome in outcomes.iter().filter(|o| o.is_blocking()) {
    let rule = outcome.rule;
    for &action in rule.blocks {
      let idx = match blocked.iter().position(|b| b.action == action) {
        Some(idx) => idx,
        None => {
          blocked.push(BlockedAction {
            action,
            reason: String::new(),
            remediation: Vec::new(),
            blocked_by: Vec::new(),
          });
          blocked.len() - 1
        }
      };
      let entry = &mut blocked[idx];
      if entry.reason.is_empty() {
        entry.reason = rule.reason.to_string();
      } else if !entry.reason.split("; ").any(|r| r == rule.reason) {
        entry.reason.push_str("; ");
        entry.reason.push_str(rule.reason);
      }
      for step in rule.remediation {
        if !entry.remediation.iter().any(|s| s == step) {
          entry.remediation.push(step.to_string());
        }
      }
      entry.blocked_by.push(rule.id.to_string());
    }
  }
  blocked
}

/// The action universe minus everything blocked, each with a context-aware reason.
pub fn allowed_actions(outcomes: &[RuleOutcome], blocked: &[BlockedAction]) -> Vec<AllowedAction> {
  let triggered: Vec<String> = outcomes
    .iter()
    .filter(|o| o.triggered())
    .map(|o| o.rule.id.to_string())
    .collect();
  let crews_short = outcomes
    .iter()
    .any(|o| o.triggered() && o.rule.flags.contains(&EscalationFlag::InsufficientCrews));

  AdvisoryAction::ALL
    .iter()
    .copied()
    .filter(|action| !blocked.iter().any(|b| b.action == *action))
    .map(|action| {
      let reason = if triggered.is_empty() {
        "No safety constraint triggered for this scenario"
      } else if action == AdvisoryAction::RequestMutualAid && crews_short {
        "Crew coverage is below the estimated need; mutual aid is recommended"
      } else {
        "No triggered constraint restricts this action; review active warnings first"
      };
      AllowedAction {
        action,
        reason: reason.to_string(),
        constraints: if triggered.is_empty() {
          None
        } else {
          Some(triggered.clone())
        },
      }
    })
    .collect()
}

/// Union of flags from triggered rules, in vocabulary order.
pub fn escalation_flags(outcomes: &[RuleOutcome]) -> Vec<EscalationFlag> {
  outcomes
    .iter()
    .filter(|o| o.triggered())
    .flat_map(|o| o.rule.flags.iter().copied())
    .collect::<BTreeSet<_>>()
    .into_iter()
    .collect()
}

pub fn aggregate(outcomes: &[RuleOutcome]) -> GateSummary {
  let blocked = blocked_actions(outcomes);
  let allowed = allowed_actions(outcomes, &blocked);
  GateSummary {
    gate: policy_gate(outcomes),
    blocked,
    allowed,
    flags: escalation_flags(outcomes),
  }
}
