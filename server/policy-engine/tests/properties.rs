//! Property tests over generated scenarios.

use chrono::{TimeZone, Utc};
use policy_engine::rules;
use policy_engine::types::*;
use policy_engine::Engine;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn hazard() -> impl Strategy<Value = HazardType> {
  prop::sample::select(vec![
    HazardType::Storm,
    HazardType::Wildfire,
    HazardType::Rain,
    HazardType::Heat,
    HazardType::Ice,
    HazardType::Unknown,
  ])
}

fn phase() -> impl Strategy<Value = Phase> {
  prop::sample::select(vec![Phase::PreEvent, Phase::Active, Phase::PostEvent, Phase::Unknown])
}

fn load_kind() -> impl Strategy<Value = CriticalLoadKind> {
  prop::sample::select(vec![
    CriticalLoadKind::Hospital,
    CriticalLoadKind::Water,
    CriticalLoadKind::Telecom,
    CriticalLoadKind::Shelter,
    CriticalLoadKind::DataCenter,
    CriticalLoadKind::Other,
  ])
}

fn critical_load() -> impl Strategy<Value = CriticalLoad> {
  (load_kind(), prop::option::of(0.0..24.0f64)).prop_map(|(kind, hours)| CriticalLoad {
    kind,
    name: format!("{}-site", kind.as_str()),
    backup_hours_remaining: hours,
  })
}

fn asset() -> impl Strategy<Value = Asset> {
  (
    0u32..1000,
    prop::option::of(0.0..=1.0f64),
    prop::option::of(0.0..=1.0f64),
  )
    .prop_map(|(n, vegetation, criticality)| Asset {
      id: format!("A-{n}"),
      asset_type: "feeder".to_string(),
      age_years: None,
      vegetation_exposure: vegetation,
      load_criticality: criticality,
    })
}

fn crews() -> impl Strategy<Value = CrewStatus> {
  (0u32..10, 0u32..10, 1u32..12).prop_map(|(available, en_route, estimated_needed)| CrewStatus {
    available,
    en_route,
    estimated_needed,
  })
}

fn input() -> impl Strategy<Value = EvaluationInput> {
  (
    hazard(),
    phase(),
    1u8..=5,
    0u64..50_000,
    prop::collection::vec(critical_load(), 0..4),
    prop::collection::vec(asset(), 0..6),
    crews(),
    (0.0..=1.0f64, 0.0..240.0f64),
  )
    .prop_map(
      |(hazard_type, phase, severity, customers_affected, critical_loads, assets, crews, (completeness, freshness))| {
        EvaluationInput {
          hazard_type,
          phase,
          severity,
          customers_affected,
          critical_loads,
          assets,
          crews,
          data_quality: DataQuality {
            completeness,
            freshness_minutes: freshness,
          },
          defaulted_fields: BTreeSet::new(),
        }
      },
    )
}

fn evaluate(input: &EvaluationInput) -> PolicyResult {
  let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
  Engine::with_defaults().evaluate_input(input, at)
}

proptest! {
  #[test]
  fn identical_input_identical_output(input in input()) {
    let a = serde_json::to_string(&evaluate(&input)).unwrap();
    let b = serde_json::to_string(&evaluate(&input)).unwrap();
    prop_assert_eq!(a, b);
  }

  #[test]
  fn gate_follows_triggered_and_blocked(input in input()) {
    let result = evaluate(&input);
    let any_triggered = result.safety_constraints.iter().any(|c| c.triggered);
    let expected = if !result.blocked_actions.is_empty() {
      PolicyGate::Block
    } else if any_triggered {
      PolicyGate::Warn
    } else {
      PolicyGate::Pass
    };
    prop_assert_eq!(result.policy_gate, expected);
  }

  #[test]
  fn every_constraint_reported_and_evidence_matches_trigger(input in input()) {
    let result = evaluate(&input);
    prop_assert_eq!(result.safety_constraints.len(), rules::RULES.len());
    for c in &result.safety_constraints {
      prop_assert_eq!(c.triggered, !c.evidence.is_empty(), "{}", c.id);
    }
  }

  #[test]
  fn allowed_and_blocked_partition_the_action_set(input in input()) {
    let result = evaluate(&input);
    let blocked: BTreeSet<AdvisoryAction> = result.blocked_actions.iter().map(|b| b.action).collect();
    let allowed: BTreeSet<AdvisoryAction> = result.allowed_actions.iter().map(|a| a.action).collect();
    prop_assert_eq!(blocked.len(), result.blocked_actions.len());
    prop_assert!(blocked.is_disjoint(&allowed));
    let all: BTreeSet<AdvisoryAction> = AdvisoryAction::ALL.iter().copied().collect();
    let union: BTreeSet<AdvisoryAction> = blocked.union(&allowed).copied().collect();
    prop_assert_eq!(union, all);
  }

  #[test]
  fn flags_and_blocks_trace_to_triggered_rules(input in input()) {
    let result = evaluate(&input);
    let triggered: Vec<&rules::RuleSpec> = result
      .triggered_ids()
      .iter()
      .filter_map(|id| rules::find(id))
      .collect();

    for flag in &result.escalation_flags {
      prop_assert!(triggered.iter().any(|r| r.flags.contains(flag)), "{:?}", flag);
    }
    for b in &result.blocked_actions {
      prop_assert!(!b.blocked_by.is_empty());
      for id in &b.blocked_by {
        let rule = rules::find(id).unwrap();
        prop_assert!(triggered.iter().any(|r| r.id == rule.id));
        prop_assert!(rule.blocks.contains(&b.action));
      }
    }
  }

  #[test]
  fn driver_weights_stay_in_unit_interval(input in input()) {
    for d in evaluate(&input).explainability.drivers {
      prop_assert!((0.0..=1.0).contains(&d.weight), "{} {}", d.name, d.weight);
    }
  }

  #[test]
  fn arbitrary_lines_never_panic(line in ".{0,64}") {
    let engine = Engine::with_defaults();
    if let Ok(result) = engine.evaluate_json(&line) {
      prop_assert_eq!(result.safety_constraints.len(), rules::RULES.len());
    }
  }

  #[test]
  fn loose_numeric_fields_normalize_into_range(
    severity in prop::num::f64::ANY,
    completeness in -5.0..5.0f64,
    vegetation in -5.0..5.0f64,
  ) {
    let raw: EvaluationRequest = serde_json::from_value(serde_json::json!({
      "severity": if severity.is_finite() { serde_json::json!(severity) } else { serde_json::json!("n/a") },
      "assets": [{"vegetationExposure": vegetation}],
      "dataQuality": {"completeness": completeness, "freshnessMinutes": 10},
    }))
    .unwrap();
    let input = policy_engine::normalize::normalize(&raw, &policy_engine::Config::default());
    prop_assert!((1..=5).contains(&input.severity));
    prop_assert!((0.0..=1.0).contains(&input.data_quality.completeness));
    let v = input.assets[0].vegetation_exposure.unwrap();
    prop_assert!((0.0..=1.0).contains(&v));
  }
}
