//! Table-driven safety constraints.
//!
//! Each row is an independent predicate-and-evidence pair. A rule triggers iff
//! its hazard/phase scope applies and its collector renders at least one
//! evidence line. Rules never read each other's outcomes; per-item rules walk
//! assets and critical loads in input order so evidence (and the hash) stay
//! reproducible.

use serde::Serialize;
use std::fmt;

use crate::config::Config;
use crate::evidence::{render, Fields};
use crate::types::*;

/// Static definition of one safety constraint.
pub struct RuleSpec {
  pub id: &'static str,
  pub title: &'static str,
  pub severity: ConstraintSeverity,
  /// Hazard/phase scope. Implementations match every variant explicitly.
  pub applies: fn(HazardType, Phase) -> bool,
  /// Evidence lines for the scenario; empty means not triggered.
  pub collect: fn(&EvaluationInput, &Config) -> Vec<String>,
  pub flags: &'static [EscalationFlag],
  pub blocks: &'static [AdvisoryAction],
  pub reason: &'static str,
  pub remediation: &'static [&'static str],
}

impl fmt::Debug for RuleSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RuleSpec")
      .field("id", &self.id)
      .field("severity", &self.severity)
      .field("flags", &self.flags)
      .field("blocks", &self.blocks)
      .finish_non_exhaustive()
  }
}

/// Result of evaluating one rule against one input.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
  pub rule: &'static RuleSpec,
  pub evidence: Vec<String>,
}

impl RuleOutcome {
  pub fn triggered(&self) -> bool {
    !self.evidence.is_empty()
  }

  pub fn is_blocking(&self) -> bool {
    self.triggered() && !self.rule.blocks.is_empty()
  }

  pub fn to_constraint(&self) -> SafetyConstraint {
    SafetyConstraint {
      id: self.rule.id.to_string(),
      title: self.rule.title.to_string(),
      severity: self.rule.severity,
      triggered: self.triggered(),
      evidence: self.evidence.clone(),
    }
  }
}

/// Public, static view of a rule for catalogs and audit tooling.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDescriptor {
  pub id: &'static str,
  pub title: &'static str,
  pub severity: ConstraintSeverity,
  pub flags: &'static [EscalationFlag],
  pub blocks: &'static [AdvisoryAction],
  pub reason: &'static str,
  pub remediation: &'static [&'static str],
}

// ---------------------------------------------------------------------------
// Scope predicates
// ---------------------------------------------------------------------------

fn is_active(phase: Phase) -> bool {
  match phase {
    Phase::Active => true,
    Phase::PreEvent | Phase::PostEvent | Phase::Unknown => false,
  }
}

fn any_scenario(_hazard: HazardType, _phase: Phase) -> bool {
  true
}

fn heat_any_phase(hazard: HazardType, _phase: Phase) -> bool {
  match hazard {
    HazardType::Heat => true,
    HazardType::Storm | HazardType::Wildfire | HazardType::Rain | HazardType::Ice | HazardType::Unknown => {
      false
    }
  }
}

fn rain_active(hazard: HazardType, phase: Phase) -> bool {
  match hazard {
    HazardType::Rain => is_active(phase),
    HazardType::Storm | HazardType::Wildfire | HazardType::Heat | HazardType::Ice | HazardType::Unknown => {
      false
    }
  }
}

fn storm_active(hazard: HazardType, phase: Phase) -> bool {
  match hazard {
    HazardType::Storm => is_active(phase),
    HazardType::Wildfire | HazardType::Rain | HazardType::Heat | HazardType::Ice | HazardType::Unknown => {
      false
    }
  }
}

fn ice_active(hazard: HazardType, phase: Phase) -> bool {
  match hazard {
    HazardType::Ice => is_active(phase),
    HazardType::Storm | HazardType::Wildfire | HazardType::Rain | HazardType::Heat | HazardType::Unknown => {
      false
    }
  }
}

fn ice_any_phase(hazard: HazardType, _phase: Phase) -> bool {
  match hazard {
    HazardType::Ice => true,
    HazardType::Storm | HazardType::Wildfire | HazardType::Rain | HazardType::Heat | HazardType::Unknown => {
      false
    }
  }
}

fn wildfire_any_phase(hazard: HazardType, _phase: Phase) -> bool {
  match hazard {
    HazardType::Wildfire => true,
    HazardType::Storm | HazardType::Rain | HazardType::Heat | HazardType::Ice | HazardType::Unknown => {
      false
    }
  }
}

// ---------------------------------------------------------------------------
// Evidence collectors
// ---------------------------------------------------------------------------

fn vegetation_above<'a>(input: &'a EvaluationInput, threshold: f64) -> impl Iterator<Item = &'a Asset> {
  input
    .assets
    .iter()
    .filter(move |a| a.vegetation_exposure.is_some_and(|v| v > threshold))
}

fn asset_fields(asset: &Asset, threshold: f64) -> Fields {
  Fields::new()
    .with("id", asset.id.as_str())
    .with("type", asset.asset_type.as_str())
    .exceeding("exposure", asset.vegetation_exposure.unwrap_or(0.0), "threshold", threshold)
}

fn collect_critical_loads(input: &EvaluationInput, config: &Config) -> Vec<String> {
  const LOAD: &str = "Life-safety critical load on affected section: {kind} '{name}'";
  const AVG: &str = "Average asset load criticality {avg} meets the {threshold} threshold";

  let mut lines: Vec<String> = input
    .critical_loads
    .iter()
    .filter(|l| l.kind.is_life_safety())
    .map(|l| {
      let fields = Fields::new().with("kind", l.kind.as_str()).with("name", l.name.as_str());
      render(LOAD, &fields)
    })
    .collect();

  if let Some(avg) = input.avg_load_criticality() {
    if avg >= config.load_criticality_threshold {
      let fields = Fields::new()
        .ratio("avg", avg)
        .ratio("threshold", config.load_criticality_threshold);
      lines.push(render(AVG, &fields));
    }
  }
  lines
}

fn collect_backup_window(input: &EvaluationInput, config: &Config) -> Vec<String> {
  const LOAD: &str = "{kind} '{name}' has {hours} h of backup power remaining (threshold {threshold} h)";

  input
    .critical_loads
    .iter()
    .filter_map(|l| {
      let hours = l.backup_hours_remaining?;
      if hours >= config.backup_hours_threshold {
        return None;
      }
      let fields = Fields::new()
        .with("kind", l.kind.as_str())
        .with("name", l.name.as_str())
        .hours("hours", hours)
        .hours("threshold", config.backup_hours_threshold);
      Some(render(LOAD, &fields))
    })
    .collect()
}

fn collect_crew_shortfall(input: &EvaluationInput, _config: &Config) -> Vec<String> {
  const SHORT: &str = "{available} crews available and {enRoute} en route against {needed} needed";

  if !input.crews.is_short() {
    return Vec::new();
  }
  let fields = Fields::new()
    .with("available", input.crews.available)
    .with("enRoute", input.crews.en_route)
    .with("needed", input.crews.estimated_needed);
  vec![render(SHORT, &fields)]
}

fn collect_heat_stress(input: &EvaluationInput, config: &Config) -> Vec<String> {
  const STRESS: &str = "Heat event at severity {severity} (threshold {threshold}) raises transformer thermal loading";

  if input.severity < config.heat_stress_severity {
    return Vec::new();
  }
  let fields = Fields::new()
    .with("severity", input.severity)
    .with("threshold", config.heat_stress_severity);
  vec![render(STRESS, &fields)]
}

fn collect_heat_spike(input: &EvaluationInput, config: &Config) -> Vec<String> {
  const SPIKE: &str = "Heat event at severity {severity} (threshold {threshold}) drives peak demand beyond planning margins";
  const TRANSFER: &str = "Load transfers onto already stressed transformers risk thermal overload";

  if input.severity < config.heat_spike_severity {
    return Vec::new();
  }
  let fields = Fields::new()
    .with("severity", input.severity)
    .with("threshold", config.heat_spike_severity);
  vec![render(SPIKE, &fields), TRANSFER.to_string()]
}

fn collect_flood(_input: &EvaluationInput, _config: &Config) -> Vec<String> {
  vec![
    "Active rain event with flooding potential in the affected area".to_string(),
    "Road and substation access may be restricted for field crews".to_string(),
  ]
}

fn collect_storm(_input: &EvaluationInput, _config: &Config) -> Vec<String> {
  vec![
    "Active storm with high winds in the affected area".to_string(),
    "Conductor slap and falling debris endanger field crews and rerouted circuits".to_string(),
  ]
}

fn collect_ice_active(input: &EvaluationInput, config: &Config) -> Vec<String> {
  const LIMBS: &str = "{count} asset(s) with vegetation exposure above {threshold} risk ice-laden limb contact";

  let mut lines = vec![
    "Active ice event loading conductors and structures".to_string(),
    "Switching under ice load risks cascading equipment failure".to_string(),
  ];
  let exposed = vegetation_above(input, config.ice_vegetation_threshold).count();
  if exposed > 0 {
    let fields = Fields::new()
      .with("count", exposed)
      .ratio("threshold", config.ice_vegetation_threshold);
    lines.push(render(LIMBS, &fields));
  }
  lines
}

fn collect_ice_vegetation(input: &EvaluationInput, config: &Config) -> Vec<String> {
  const ASSET: &str = "Asset {id} ({type}) vegetation exposure {exposure} exceeds {threshold} under ice loading";

  vegetation_above(input, config.ice_vegetation_threshold)
    .map(|a| render(ASSET, &asset_fields(a, config.ice_vegetation_threshold)))
    .collect()
}

fn collect_wildfire_vegetation(input: &EvaluationInput, config: &Config) -> Vec<String> {
  const SUMMARY: &str = "{count} asset(s) exceed vegetation exposure {threshold} during wildfire conditions";
  const ASSET: &str = "Asset {id} ({type}) vegetation exposure {exposure} exceeds {threshold}";

  let threshold = config.wildfire_vegetation_threshold;
  let per_asset: Vec<String> = vegetation_above(input, threshold)
    .map(|a| render(ASSET, &asset_fields(a, threshold)))
    .collect();
  if per_asset.is_empty() {
    return per_asset;
  }
  let summary = render(
    SUMMARY,
    &Fields::new().with("count", per_asset.len()).ratio("threshold", threshold),
  );
  std::iter::once(summary).chain(per_asset).collect()
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

pub static RULES: [RuleSpec; 10] = [
  RuleSpec {
    id: "SC-CRIT-001",
    title: "Critical load on affected section",
    severity: ConstraintSeverity::High,
    applies: any_scenario,
    collect: collect_critical_loads,
    flags: &[EscalationFlag::CriticalLoadAtRisk],
    blocks: &[AdvisoryAction::DeenergizeSection],
    reason: "Life-safety critical loads depend on this section",
    remediation: &[
      "Confirm critical customers are on backup generation or transferred",
      "Obtain operations supervisor approval before de-energizing",
    ],
  },
  RuleSpec {
    id: "SC-CRIT-002",
    title: "Critical load backup window short",
    severity: ConstraintSeverity::High,
    applies: any_scenario,
    collect: collect_backup_window,
    flags: &[EscalationFlag::CriticalBackupWindowShort],
    blocks: &[],
    reason: "Critical load backup runway is below the safe window",
    remediation: &["Prioritize restoration or mobile generation for short-runway loads"],
  },
  RuleSpec {
    id: "SC-CREW-001",
    title: "Insufficient crew coverage",
    severity: ConstraintSeverity::High,
    applies: any_scenario,
    collect: collect_crew_shortfall,
    flags: &[EscalationFlag::InsufficientCrews],
    blocks: &[AdvisoryAction::RerouteLoad],
    reason: "Crew coverage is below the estimated need",
    remediation: &[
      "Request mutual aid crews",
      "Hold load transfers until crews can patrol switched circuits",
    ],
  },
  RuleSpec {
    id: "SC-HEAT-001",
    title: "Transformer thermal stress",
    severity: ConstraintSeverity::High,
    applies: heat_any_phase,
    collect: collect_heat_stress,
    flags: &[EscalationFlag::TransformerThermalStress],
    blocks: &[AdvisoryAction::RerouteLoad],
    reason: "Heat is driving transformer thermal stress",
    remediation: &[
      "Check transformer loading before transferring load",
      "Stage mobile transformers near stressed substations",
    ],
  },
  RuleSpec {
    id: "SC-HEAT-002",
    title: "Heat-driven load spike",
    severity: ConstraintSeverity::High,
    applies: heat_any_phase,
    collect: collect_heat_spike,
    flags: &[EscalationFlag::HeatLoadSpike, EscalationFlag::TransformerThermalStress],
    blocks: &[AdvisoryAction::RerouteLoad],
    reason: "Heat-driven demand spike leaves no transfer margin",
    remediation: &[
      "Coordinate demand response before any load transfer",
      "Check transformer loading before transferring load",
    ],
  },
  RuleSpec {
    id: "SC-FLOOD-001",
    title: "Flood access risk",
    severity: ConstraintSeverity::High,
    applies: rain_active,
    collect: collect_flood,
    flags: &[EscalationFlag::FloodAccessRisk],
    blocks: &[AdvisoryAction::DispatchCrews],
    reason: "Flooded access routes endanger field crews",
    remediation: &[
      "Confirm safe access routes with emergency management",
      "Stage crews outside the flood zone until water recedes",
    ],
  },
  RuleSpec {
    id: "SC-STORM-001",
    title: "Active storm conditions",
    severity: ConstraintSeverity::High,
    applies: storm_active,
    collect: collect_storm,
    flags: &[EscalationFlag::StormActive, EscalationFlag::HighWindConductorRisk],
    blocks: &[AdvisoryAction::DispatchCrews, AdvisoryAction::RerouteLoad],
    reason: "Active high winds endanger field crews and rerouted circuits",
    remediation: &[
      "Hold dispatch until sustained winds drop below safe working limits",
      "Patrol circuits before re-energizing alternate feeds",
    ],
  },
  RuleSpec {
    id: "SC-ICE-001",
    title: "Active ice loading",
    severity: ConstraintSeverity::High,
    applies: ice_active,
    collect: collect_ice_active,
    flags: &[EscalationFlag::IceLoadRisk],
    blocks: &[AdvisoryAction::RerouteLoad, AdvisoryAction::DeenergizeSection],
    reason: "Ice loading makes switching and transfers unsafe",
    remediation: &[
      "Wait for ice shedding or de-icing before switching",
      "Patrol circuits for ice-laden limbs before any transfer",
    ],
  },
  RuleSpec {
    id: "SC-ICE-002",
    title: "Vegetation contact under ice",
    severity: ConstraintSeverity::High,
    applies: ice_any_phase,
    collect: collect_ice_vegetation,
    flags: &[EscalationFlag::IceLoadRisk],
    blocks: &[],
    reason: "Vegetation near ice-loaded conductors",
    remediation: &["Schedule vegetation patrol for exposed assets"],
  },
  RuleSpec {
    id: "SC-WILD-001",
    title: "Wildfire vegetation exposure",
    severity: ConstraintSeverity::High,
    applies: wildfire_any_phase,
    collect: collect_wildfire_vegetation,
    flags: &[EscalationFlag::VegetationFireRisk],
    blocks: &[AdvisoryAction::DeenergizeSection],
    reason: "Vegetation exposure requires coordinated wildfire de-energization",
    remediation: &[
      "Coordinate any de-energization with the fire agency and public safety power shutoff plan",
      "Notify critical customers before switching",
    ],
  },
];

/// Evaluate one rule. Out-of-scope rules are reported untriggered.
pub fn evaluate_rule(rule: &'static RuleSpec, input: &EvaluationInput, config: &Config) -> RuleOutcome {
  let evidence = if (rule.applies)(input.hazard_type, input.phase) {
    (rule.collect)(input, config)
  } else {
    Vec::new()
  };
  RuleOutcome { rule, evidence }
}

/// Evaluate every rule in table order. Always returns one outcome per rule.
pub fn evaluate_all(input: &EvaluationInput, config: &Config) -> Vec<RuleOutcome> {
  RULES.iter().map(|rule| evaluate_rule(rule, input, config)).collect()
}

pub fn find(id: &str) -> Option<&'static RuleSpec> {
  RULES.iter().find(|r| r.id == id)
}

/// Static metadata for every rule, in table order.
pub fn catalog() -> Vec<RuleDescriptor> {
  RULES
    .iter()
    .map(|r| RuleDescriptor {
      id: r.id,
      title: r.title,
      severity: r.severity,
      flags: r.flags,
      blocks: r.blocks,
      reason: r.reason,
      remediation: r.remediation,
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::{BTreeSet, HashSet};

  fn base_input() -> EvaluationInput {
    EvaluationInput {
      hazard_type: HazardType::Unknown,
      phase: Phase::PreEvent,
      severity: 2,
      customers_affected: 100,
      critical_loads: vec![],
      assets: vec![],
      crews: CrewStatus {
        available: 4,
        en_route: 0,
        estimated_needed: 2,
      },
      data_quality: DataQuality {
        completeness: 0.9,
        freshness_minutes: 5.0,
      },
      defaulted_fields: BTreeSet::new(),
    }
  }

  fn asset(id: &str, vegetation: f64) -> Asset {
    Asset {
      id: id.into(),
      asset_type: "feeder".into(),
      age_years: None,
      vegetation_exposure: Some(vegetation),
      load_criticality: None,
    }
  }

  fn load(kind: CriticalLoadKind, name: &str, hours: Option<f64>) -> CriticalLoad {
    CriticalLoad {
      kind,
      name: name.into(),
      backup_hours_remaining: hours,
    }
  }

  fn outcome(id: &str, input: &EvaluationInput) -> RuleOutcome {
    let rule = find(id).unwrap();
    evaluate_rule(rule, input, &Config::default())
  }

  #[test]
  fn table_ids_are_unique_and_complete() {
    let ids: HashSet<&str> = RULES.iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 10);
    assert_eq!(catalog().len(), 10);
  }

  #[test]
  fn quiet_scenario_triggers_nothing() {
    let outcomes = evaluate_all(&base_input(), &Config::default());
    assert_eq!(outcomes.len(), RULES.len());
    assert!(outcomes.iter().all(|o| !o.triggered()));
  }

  #[test]
  fn crit_001_matches_life_safety_loads_only() {
    let mut input = base_input();
    input.critical_loads = vec![
      load(CriticalLoadKind::Hospital, "General", None),
      load(CriticalLoadKind::Shelter, "Gym", None),
      load(CriticalLoadKind::Telecom, "Tower 9", None),
    ];
    let o = outcome("SC-CRIT-001", &input);
    assert_eq!(o.evidence.len(), 2);
    assert_eq!(o.evidence[0], "Life-safety critical load on affected section: hospital 'General'");
    assert!(o.is_blocking());
  }

  #[test]
  fn crit_001_fires_on_average_load_criticality() {
    let mut input = base_input();
    input.assets = vec![
      Asset { load_criticality: Some(0.9), ..asset("A", 0.0) },
      Asset { load_criticality: Some(0.7), ..asset("B", 0.0) },
      Asset { load_criticality: None, ..asset("C", 0.0) },
    ];
    let o = outcome("SC-CRIT-001", &input);
    assert_eq!(o.evidence, vec!["Average asset load criticality 0.80 meets the 0.70 threshold"]);

    input.assets[1].load_criticality = Some(0.4);
    assert!(!outcome("SC-CRIT-001", &input).triggered());
  }

  #[test]
  fn crit_002_one_line_per_short_load() {
    let mut input = base_input();
    input.critical_loads = vec![
      load(CriticalLoadKind::Hospital, "General", Some(2.0)),
      load(CriticalLoadKind::Water, "Plant 2", Some(4.0)),
      load(CriticalLoadKind::Shelter, "Gym", Some(3.5)),
      load(CriticalLoadKind::Telecom, "Tower", None),
    ];
    let o = outcome("SC-CRIT-002", &input);
    assert_eq!(
      o.evidence,
      vec![
        "hospital 'General' has 2.0 h of backup power remaining (threshold 4.0 h)",
        "shelter 'Gym' has 3.5 h of backup power remaining (threshold 4.0 h)",
      ]
    );
    assert!(!o.is_blocking());
  }

  #[test]
  fn crew_shortfall_blocks_reroute() {
    let mut input = base_input();
    input.crews = CrewStatus {
      available: 1,
      en_route: 0,
      estimated_needed: 3,
    };
    let o = outcome("SC-CREW-001", &input);
    assert_eq!(o.evidence, vec!["1 crews available and 0 en route against 3 needed"]);
    assert_eq!(o.rule.blocks, &[AdvisoryAction::RerouteLoad]);
  }

  #[test]
  fn heat_rules_step_with_severity() {
    let mut input = base_input();
    input.hazard_type = HazardType::Heat;
    input.severity = 3;
    assert!(outcome("SC-HEAT-001", &input).triggered());
    assert!(!outcome("SC-HEAT-002", &input).triggered());

    input.severity = 4;
    assert!(outcome("SC-HEAT-001", &input).triggered());
    assert_eq!(outcome("SC-HEAT-002", &input).evidence.len(), 2);

    input.hazard_type = HazardType::Storm;
    assert!(!outcome("SC-HEAT-002", &input).triggered());
  }

  #[test]
  fn phase_scoped_rules_need_active_phase() {
    let mut input = base_input();
    for (hazard, id) in [
      (HazardType::Rain, "SC-FLOOD-001"),
      (HazardType::Storm, "SC-STORM-001"),
      (HazardType::Ice, "SC-ICE-001"),
    ] {
      input.hazard_type = hazard;
      input.phase = Phase::PostEvent;
      assert!(!outcome(id, &input).triggered(), "{} fired outside active phase", id);
      input.phase = Phase::Unknown;
      assert!(!outcome(id, &input).triggered(), "{} fired on unknown phase", id);
      input.phase = Phase::Active;
      assert!(outcome(id, &input).triggered(), "{} did not fire in active phase", id);
    }
  }

  #[test]
  fn ice_active_adds_vegetation_summary_line() {
    let mut input = base_input();
    input.hazard_type = HazardType::Ice;
    input.phase = Phase::Active;
    assert_eq!(outcome("SC-ICE-001", &input).evidence.len(), 2);

    input.assets = vec![asset("P-7", 0.62), asset("P-8", 0.50)];
    let o = outcome("SC-ICE-001", &input);
    assert_eq!(o.evidence.len(), 3);
    assert_eq!(o.evidence[2], "1 asset(s) with vegetation exposure above 0.50 risk ice-laden limb contact");
  }

  #[test]
  fn ice_vegetation_applies_in_any_phase() {
    let mut input = base_input();
    input.hazard_type = HazardType::Ice;
    input.phase = Phase::PreEvent;
    input.assets = vec![asset("P-7", 0.62), asset("P-8", 0.51), asset("P-9", 0.2)];
    let o = outcome("SC-ICE-002", &input);
    assert_eq!(
      o.evidence,
      vec![
        "Asset P-7 (feeder) vegetation exposure 0.62 exceeds 0.50 under ice loading",
        "Asset P-8 (feeder) vegetation exposure 0.51 exceeds 0.50 under ice loading",
      ]
    );
  }

  #[test]
  fn exposure_just_over_threshold_renders_with_more_decimals() {
    let mut input = base_input();
    input.hazard_type = HazardType::Ice;
    input.assets = vec![asset("P-1", 0.504)];
    let o = outcome("SC-ICE-002", &input);
    assert_eq!(
      o.evidence,
      vec!["Asset P-1 (feeder) vegetation exposure 0.504 exceeds 0.500 under ice loading"]
    );
  }

  #[test]
  fn wildfire_summary_precedes_asset_lines() {
    let mut input = base_input();
    input.hazard_type = HazardType::Wildfire;
    input.assets = vec![asset("Z", 0.8), asset("A", 0.61), asset("M", 0.6)];
    let o = outcome("SC-WILD-001", &input);
    assert_eq!(o.evidence.len(), 3);
    assert_eq!(o.evidence[0], "2 asset(s) exceed vegetation exposure 0.60 during wildfire conditions");
    assert!(o.evidence[1].starts_with("Asset Z "));
    assert!(o.evidence[2].starts_with("Asset A "));
  }

  #[test]
  fn unknown_hazard_only_runs_hazard_agnostic_rules() {
    let mut input = base_input();
    input.phase = Phase::Active;
    input.severity = 5;
    input.assets = vec![asset("X", 1.0)];
    let fired: Vec<&str> = evaluate_all(&input, &Config::default())
      .iter()
      .filter(|o| o.triggered())
      .map(|o| o.rule.id)
      .collect();
    assert!(fired.is_empty(), "unexpected: {:?}", fired);
  }
}
