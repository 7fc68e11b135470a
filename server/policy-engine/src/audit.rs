//! Determinism and audit stamping.
//!
//! The hash covers the canonical form of the normalized input only. This is
//! the one module allowed to read the system clock, and the clock value never
//! reaches the hash.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::types::{Asset, CriticalLoad, EvaluationInput, PolicyMeta};

/// Bump whenever rule semantics change so stored hashes stay comparable
/// against the version that produced them.
pub const ENGINE_VERSION: &str = "1.0.0";

fn opt(v: Option<f64>) -> Value {
  v.map(Value::from).unwrap_or(Value::Null)
}

fn canonical_load(load: &CriticalLoad) -> Value {
  json!({
    "kind": load.kind.as_str(),
    "name": load.name,
    "backupHoursRemaining": opt(load.backup_hours_remaining),
  })
}

fn canonical_asset(asset: &Asset) -> Value {
  json!({
    "id": asset.id,
    "assetType": asset.asset_type,
    "ageYears": opt(asset.age_years),
    "vegetationExposure": opt(asset.vegetation_exposure),
    "loadCriticality": opt(asset.load_criticality),
  })
}

/// Canonical JSON value of the normalized input.
///
/// Object keys come out sorted (serde_json's default map is ordered), arrays
/// keep input order, absent optionals are explicit nulls.
pub fn canonical_value(input: &EvaluationInput) -> Value {
  let mut root = Map::new();
  root.insert("hazardType".into(), input.hazard_type.as_str().into());
  root.insert("phase".into(), input.phase.as_str().into());
  root.insert("severity".into(), u64::from(input.severity).into());
  root.insert("customersAffected".into(), input.customers_affected.into());
  root.insert(
    "criticalLoads".into(),
    Value::Array(input.critical_loads.iter().map(canonical_load).collect()),
  );
  root.insert(
    "assets".into(),
    Value::Array(input.assets.iter().map(canonical_asset).collect()),
  );
  root.insert(
    "crews".into(),
    json!({
      "available": input.crews.available,
      "enRoute": input.crews.en_route,
      "estimatedNeeded": input.crews.estimated_needed,
    }),
  );
  root.insert(
    "dataQuality".into(),
    json!({
      "completeness": input.data_quality.completeness,
      "freshnessMinutes": input.data_quality.freshness_minutes,
    }),
  );
  let defaulted: Vec<Value> = input
    .defaulted_fields
    .iter()
    .map(|f| Value::String(defaulted_name(*f).to_string()))
    .collect();
  root.insert("defaultedFields".into(), Value::Array(defaulted));
  Value::Object(root)
}

fn defaulted_name(field: crate::types::DefaultedField) -> &'static str {
  use crate::types::DefaultedField::*;
  match field {
    Severity => "severity",
    CustomersAffected => "customers_affected",
    Crews => "crews",
    EstimatedCrewsNeeded => "estimated_crews_needed",
    DataQuality => "data_quality",
  }
}

/// Compact canonical bytes.
pub fn canonical_bytes(input: &EvaluationInput) -> Vec<u8> {
  canonical_value(input).to_string().into_bytes()
}

/// `blake3:` followed by the 64-char hex digest of the canonical bytes.
pub fn deterministic_hash(input: &EvaluationInput) -> String {
  let hash = blake3::hash(&canonical_bytes(input));
  format!("blake3:{}", hash.to_hex())
}

/// `blake3:` digest of every threshold in `config`.
///
/// Destructured exhaustively so a new threshold cannot be left out.
pub fn config_hash(config: &Config) -> String {
  let Config {
    load_criticality_threshold,
    backup_hours_threshold,
    heat_stress_severity,
    heat_spike_severity,
    ice_vegetation_threshold,
    wildfire_vegetation_threshold,
    customers_per_crew,
    default_severity,
    default_completeness,
    default_freshness_minutes,
    min_completeness,
    max_freshness_minutes,
  } = config;
  let canonical = json!({
    "loadCriticalityThreshold": load_criticality_threshold,
    "backupHoursThreshold": backup_hours_threshold,
    "heatStressSeverity": heat_stress_severity,
    "heatSpikeSeverity": heat_spike_severity,
    "iceVegetationThreshold": ice_vegetation_threshold,
    "wildfireVegetationThreshold": wildfire_vegetation_threshold,
    "customersPerCrew": customers_per_crew,
    "defaultSeverity": default_severity,
    "defaultCompleteness": default_completeness,
    "defaultFreshnessMinutes": default_freshness_minutes,
    "minCompleteness": min_completeness,
    "maxFreshnessMinutes": max_freshness_minutes,
  });
  format!("blake3:{}", blake3::hash(canonical.to_string().as_bytes()).to_hex())
}

/// RFC 3339 UTC, millisecond precision, `Z` suffix.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
  at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn stamp(
  input: &EvaluationInput,
  config: &Config,
  at: DateTime<Utc>,
  scenario_id: Option<String>,
) -> PolicyMeta {
  PolicyMeta {
    deterministic_hash: deterministic_hash(input),
    evaluated_at: format_timestamp(&at),
    engine_version: ENGINE_VERSION.to_string(),
    config_hash: config_hash(config),
    scenario_id,
  }
}

/// Stamp with the current wall clock.
pub fn stamp_now(input: &EvaluationInput, config: &Config, scenario_id: Option<String>) -> PolicyMeta {
  stamp(input, config, Utc::now(), scenario_id)
}
