//! Normalize inbound evaluation requests into the canonical EvaluationInput.
//!
//! Never fails: unmapped enums fold to `Unknown`, numerics are clamped, and
//! anything missing gets a conservative default recorded in `defaulted_fields`.

use serde_json::Value;
use std::collections::BTreeSet;

use crate::config::Config;
use crate::types::*;

/// Raw hazard labels (lowercased) and the hazard they map to.
const HAZARD_TABLE: &[(&str, HazardType)] = &[
  ("storm", HazardType::Storm),
  ("lightning", HazardType::Storm),
  ("high wind", HazardType::Storm),
  ("wind", HazardType::Storm),
  ("thunderstorm", HazardType::Storm),
  ("snow storm", HazardType::Storm),
  ("wildfire", HazardType::Wildfire),
  ("vegetation", HazardType::Wildfire),
  ("fire", HazardType::Wildfire),
  ("flood", HazardType::Rain),
  ("flooding", HazardType::Rain),
  ("heavy rain", HazardType::Rain),
  ("rain", HazardType::Rain),
  ("heatwave", HazardType::Heat),
  ("heat wave", HazardType::Heat),
  ("heat", HazardType::Heat),
  ("extreme heat", HazardType::Heat),
  ("ice/snow", HazardType::Ice),
  ("ice", HazardType::Ice),
  ("ice storm", HazardType::Ice),
  ("freezing rain", HazardType::Ice),
];

const PHASE_TABLE: &[(&str, Phase)] = &[
  ("pre-event", Phase::PreEvent),
  ("pre_event", Phase::PreEvent),
  ("event", Phase::Active),
  ("active", Phase::Active),
  ("post-event", Phase::PostEvent),
  ("post_event", Phase::PostEvent),
];

const LOAD_KIND_TABLE: &[(&str, CriticalLoadKind)] = &[
  ("hospital", CriticalLoadKind::Hospital),
  ("medical", CriticalLoadKind::Hospital),
  ("water", CriticalLoadKind::Water),
  ("water treatment", CriticalLoadKind::Water),
  ("wastewater", CriticalLoadKind::Water),
  ("telecom", CriticalLoadKind::Telecom),
  ("communications", CriticalLoadKind::Telecom),
  ("shelter", CriticalLoadKind::Shelter),
  ("data center", CriticalLoadKind::DataCenter),
  ("data_center", CriticalLoadKind::DataCenter),
  ("datacenter", CriticalLoadKind::DataCenter),
];

fn lookup<T: Copy>(table: &[(&str, T)], raw: Option<&str>, fallback: T) -> T {
  let key = match raw {
    Some(s) => s.trim().to_ascii_lowercase(),
    None => return fallback,
  };
  table
    .iter()
    .find(|(label, _)| *label == key)
    .map(|(_, v)| *v)
    .unwrap_or(fallback)
}

pub fn parse_hazard(raw: Option<&str>) -> HazardType {
  lookup(HAZARD_TABLE, raw, HazardType::Unknown)
}

pub fn parse_phase(raw: Option<&str>) -> Phase {
  lookup(PHASE_TABLE, raw, Phase::Unknown)
}

pub fn parse_load_kind(raw: Option<&str>) -> CriticalLoadKind {
  lookup(LOAD_KIND_TABLE, raw, CriticalLoadKind::Other)
}

/// Number or numeric string; non-finite values count as missing.
fn loose_f64(v: Option<&Value>) -> Option<f64> {
  let n = match v? {
    Value::Number(n) => n.as_f64(),
    Value::String(s) => s.trim().parse::<f64>().ok(),
    _ => None,
  };
  n.filter(|x| x.is_finite())
}

/// `-0.0` survives `clamp`/`max` and would leak into evidence text and the hash.
fn positive_zero(x: f64) -> f64 {
  x + 0.0
}

fn unit_interval(v: Option<&Value>) -> Option<f64> {
  loose_f64(v).map(|x| positive_zero(x.clamp(0.0, 1.0)))
}

fn non_negative(v: Option<&Value>) -> Option<f64> {
  loose_f64(v).map(|x| positive_zero(x.max(0.0)))
}

fn count(v: Option<&Value>) -> Option<u32> {
  non_negative(v).map(|x| x.round().min(u32::MAX as f64) as u32)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
  s.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse and normalize an EvaluationRequest into a canonical EvaluationInput.
pub fn normalize(raw: &EvaluationRequest, config: &Config) -> EvaluationInput {
  let mut defaulted = BTreeSet::new();

  let severity = match loose_f64(raw.severity.as_ref()) {
    Some(s) => s.round().clamp(1.0, 5.0) as u8,
    None => {
      defaulted.insert(DefaultedField::Severity);
      config.default_severity.clamp(1, 5)
    }
  };

  let customers_affected = match non_negative(raw.customers_affected.as_ref()) {
    Some(c) => c.round().min(u64::MAX as f64) as u64,
    None => {
      defaulted.insert(DefaultedField::CustomersAffected);
      0
    }
  };

  let critical_loads = raw
    .critical_loads
    .iter()
    .map(|l| CriticalLoad {
      kind: parse_load_kind(l.kind.as_deref()),
      name: non_empty(l.name.as_deref()).unwrap_or("unnamed").to_string(),
      backup_hours_remaining: non_negative(l.backup_hours_remaining.as_ref()),
    })
    .collect();

  let assets = raw
    .assets
    .iter()
    .enumerate()
    .map(|(idx, a)| Asset {
      id: non_empty(a.id.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| format!("asset-{}", idx + 1)),
      asset_type: non_empty(a.asset_type.as_deref())
        .unwrap_or("unknown")
        .to_ascii_lowercase(),
      age_years: non_negative(a.age_years.as_ref()),
      vegetation_exposure: unit_interval(a.vegetation_exposure.as_ref()),
      load_criticality: unit_interval(a.load_criticality.as_ref()),
    })
    .collect();

  let crews = normalize_crews(raw, severity, customers_affected, config, &mut defaulted);
  let data_quality = normalize_data_quality(raw.data_quality.as_ref(), config, &mut defaulted);

  EvaluationInput {
    hazard_type: parse_hazard(raw.hazard_type.as_deref()),
    phase: parse_phase(raw.phase.as_deref()),
    severity,
    customers_affected,
    critical_loads,
    assets,
    crews,
    data_quality,
    defaulted_fields: defaulted,
  }
}

fn normalize_crews(
  raw: &EvaluationRequest,
  severity: u8,
  customers_affected: u64,
  config: &Config,
  defaulted: &mut BTreeSet<DefaultedField>,
) -> CrewStatus {
  let (available, en_route) = match &raw.crews {
    Some(c) => (
      count(c.available.as_ref()).unwrap_or(0),
      count(c.en_route.as_ref()).unwrap_or(0),
    ),
    None if !raw.crew_assignments.is_empty() => tally_assignments(&raw.crew_assignments),
    None => {
      defaulted.insert(DefaultedField::Crews);
      (0, 0)
    }
  };

  let supplied = raw
    .crews
    .as_ref()
    .and_then(|c| count(c.estimated_needed.as_ref()));
  let estimated_needed = match supplied {
    Some(n) => n.max(1),
    None => {
      defaulted.insert(DefaultedField::EstimatedCrewsNeeded);
      derive_crews_needed(severity, customers_affected, config)
    }
  };

  CrewStatus {
    available,
    en_route,
    estimated_needed,
  }
}

/// Count assignment records by status into (available, en_route).
fn tally_assignments(assignments: &[RawCrewAssignment]) -> (u32, u32) {
  let mut available = 0u32;
  let mut en_route = 0u32;
  for a in assignments {
    let status = a
      .status
      .as_deref()
      .map(|s| s.trim().to_ascii_lowercase().replace([' ', '-'], "_"));
    match status.as_deref() {
      Some("en_route") | Some("dispatched") => en_route = en_route.saturating_add(1),
      Some("available") | Some("assigned") | Some("on_site") => {
        available = available.saturating_add(1)
      }
      _ => {}
    }
  }
  (available, en_route)
}

/// max(1, ceil(severity / 2), ceil(customers / customers_per_crew)).
pub fn derive_crews_needed(severity: u8, customers_affected: u64, config: &Config) -> u32 {
  let by_severity = u64::from(severity).div_ceil(2);
  let by_customers = customers_affected.div_ceil(config.customers_per_crew.max(1));
  let needed = by_severity.max(by_customers).max(1);
  u32::try_from(needed).unwrap_or(u32::MAX)
}

fn normalize_data_quality(
  raw: Option<&RawDataQuality>,
  config: &Config,
  defaulted: &mut BTreeSet<DefaultedField>,
) -> DataQuality {
  let completeness = raw.and_then(|d| unit_interval(d.completeness.as_ref()));
  let freshness = raw.and_then(|d| non_negative(d.freshness_minutes.as_ref()));
  if completeness.is_none() || freshness.is_none() {
    defaulted.insert(DefaultedField::DataQuality);
  }
  DataQuality {
    completeness: completeness.unwrap_or(config.default_completeness.clamp(0.0, 1.0)),
    freshness_minutes: freshness.unwrap_or(config.default_freshness_minutes.max(0.0)),
  }
}
