//! Core types for the policy engine (JSON contracts + internal models).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what the caller sends)
// ---------------------------------------------------------------------------

/// Strings stay strings, numbers become their decimal text, anything else is missing.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
  Ok(match Value::deserialize(d)? {
    Value::String(s) => Some(s),
    Value::Number(n) => Some(n.to_string()),
    _ => None,
  })
}

/// Non-arrays become empty; elements that are not the expected shape are skipped.
fn lenient_seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  Ok(match Value::deserialize(d)? {
    Value::Array(items) => items
      .into_iter()
      .filter_map(|v| serde_json::from_value(v).ok())
      .collect(),
    _ => Vec::new(),
  })
}

/// Anything that does not decode as the expected object is missing.
fn lenient_object<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  Ok(serde_json::from_value(Value::deserialize(d)?).ok())
}

/// One evaluation request. Every field is optional and unknown fields are
/// silently ignored; numeric fields accept numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
  #[serde(default, deserialize_with = "lenient_string")]
  pub scenario_id: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub hazard_type: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub phase: Option<String>,
  #[serde(default)]
  pub severity: Option<Value>,
  #[serde(default)]
  pub customers_affected: Option<Value>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub critical_loads: Vec<RawCriticalLoad>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub assets: Vec<RawAsset>,
  #[serde(default, deserialize_with = "lenient_object")]
  pub crews: Option<RawCrews>,
  #[serde(default, deserialize_with = "lenient_seq")]
  pub crew_assignments: Vec<RawCrewAssignment>,
  /// Accepted for contract compatibility; freshness comes from `dataQuality`.
  #[serde(default, deserialize_with = "lenient_string")]
  pub last_updated: Option<String>,
  #[serde(default, deserialize_with = "lenient_object")]
  pub data_quality: Option<RawDataQuality>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCriticalLoad {
  #[serde(default, rename = "type", deserialize_with = "lenient_string")]
  pub kind: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub name: Option<String>,
  #[serde(default)]
  pub backup_hours_remaining: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAsset {
  #[serde(default, deserialize_with = "lenient_string")]
  pub id: Option<String>,
  #[serde(default, rename = "type", deserialize_with = "lenient_string")]
  pub asset_type: Option<String>,
  #[serde(default)]
  pub age_years: Option<Value>,
  #[serde(default)]
  pub vegetation_exposure: Option<Value>,
  #[serde(default)]
  pub load_criticality: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCrews {
  #[serde(default)]
  pub available: Option<Value>,
  #[serde(default)]
  pub en_route: Option<Value>,
  #[serde(default)]
  pub estimated_needed: Option<Value>,
}

/// A crew assignment record linked to the event; used when `crews` is absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCrewAssignment {
  #[serde(default, deserialize_with = "lenient_string")]
  pub crew_id: Option<String>,
  #[serde(default, deserialize_with = "lenient_string")]
  pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDataQuality {
  #[serde(default)]
  pub completeness: Option<Value>,
  #[serde(default)]
  pub freshness_minutes: Option<Value>,
}

// ---------------------------------------------------------------------------
// Closed enums (normalized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HazardType {
  Storm,
  Wildfire,
  Rain,
  Heat,
  Ice,
  Unknown,
}

impl HazardType {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Storm => "STORM",
      Self::Wildfire => "WILDFIRE",
      Self::Rain => "RAIN",
      Self::Heat => "HEAT",
      Self::Ice => "ICE",
      Self::Unknown => "UNKNOWN",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
  PreEvent,
  Active,
  PostEvent,
  Unknown,
}

impl Phase {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::PreEvent => "PRE_EVENT",
      Self::Active => "ACTIVE",
      Self::PostEvent => "POST_EVENT",
      Self::Unknown => "UNKNOWN",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriticalLoadKind {
  Hospital,
  Water,
  Telecom,
  Shelter,
  DataCenter,
  Other,
}

impl CriticalLoadKind {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Hospital => "hospital",
      Self::Water => "water",
      Self::Telecom => "telecom",
      Self::Shelter => "shelter",
      Self::DataCenter => "data_center",
      Self::Other => "other",
    }
  }

  /// Loads whose loss is treated as an immediate life-safety concern.
  pub fn is_life_safety(self) -> bool {
    matches!(self, Self::Hospital | Self::Water | Self::Telecom)
  }
}

/// Fields the normalizer had to fill in because the snapshot lacked them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultedField {
  Severity,
  CustomersAffected,
  Crews,
  EstimatedCrewsNeeded,
  DataQuality,
}

// ---------------------------------------------------------------------------
// Canonical evaluation input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalLoad {
  pub kind: CriticalLoadKind,
  pub name: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub backup_hours_remaining: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
  pub id: String,
  pub asset_type: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub age_years: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub vegetation_exposure: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub load_criticality: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewStatus {
  pub available: u32,
  pub en_route: u32,
  pub estimated_needed: u32,
}

impl CrewStatus {
  pub fn committed(&self) -> u32 {
    self.available.saturating_add(self.en_route)
  }

  pub fn is_short(&self) -> bool {
    self.committed() < self.estimated_needed
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuality {
  pub completeness: f64,
  pub freshness_minutes: f64,
}

/// Canonical, clamped input to the rule set. Everything downstream reads only this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationInput {
  pub hazard_type: HazardType,
  pub phase: Phase,
  pub severity: u8,
  pub customers_affected: u64,
  pub critical_loads: Vec<CriticalLoad>,
  pub assets: Vec<Asset>,
  pub crews: CrewStatus,
  pub data_quality: DataQuality,
  #[serde(default)]
  pub defaulted_fields: BTreeSet<DefaultedField>,
}

impl EvaluationInput {
  pub fn is_defaulted(&self, field: DefaultedField) -> bool {
    self.defaulted_fields.contains(&field)
  }

  /// Mean load criticality over assets that report one.
  pub fn avg_load_criticality(&self) -> Option<f64> {
    let values: Vec<f64> = self.assets.iter().filter_map(|a| a.load_criticality).collect();
    if values.is_empty() {
      None
    } else {
      Some(values.iter().sum::<f64>() / values.len() as f64)
    }
  }

  pub fn max_vegetation_exposure(&self) -> Option<f64> {
    self
      .assets
      .iter()
      .filter_map(|a| a.vegetation_exposure)
      .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.max(v))))
  }

  pub fn min_backup_hours(&self) -> Option<f64> {
    self
      .critical_loads
      .iter()
      .filter_map(|l| l.backup_hours_remaining)
      .fold(None, |acc, v| Some(acc.map_or(v, |m: f64| m.min(v))))
  }
}

// ---------------------------------------------------------------------------
// Constraint and gate vocabulary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstraintSeverity {
  High,
  Medium,
  Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationFlag {
  CriticalLoadAtRisk,
  CriticalBackupWindowShort,
  InsufficientCrews,
  TransformerThermalStress,
  HeatLoadSpike,
  FloodAccessRisk,
  StormActive,
  HighWindConductorRisk,
  IceLoadRisk,
  VegetationFireRisk,
}

/// The advisory actions the engine reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryAction {
  DispatchCrews,
  RerouteLoad,
  DeenergizeSection,
  RequestMutualAid,
}

impl AdvisoryAction {
  /// Fixed action universe in catalog order.
  pub const ALL: [AdvisoryAction; 4] = [
    Self::DispatchCrews,
    Self::RerouteLoad,
    Self::DeenergizeSection,
    Self::RequestMutualAid,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::DispatchCrews => "dispatch_crews",
      Self::RerouteLoad => "reroute_load",
      Self::DeenergizeSection => "deenergize_section",
      Self::RequestMutualAid => "request_mutual_aid",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyGate {
  Pass,
  Warn,
  Block,
}

// ---------------------------------------------------------------------------
// Output types (JSON contract: what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyConstraint {
  pub id: String,
  pub title: String,
  pub severity: ConstraintSeverity,
  pub triggered: bool,
  pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedAction {
  pub action: AdvisoryAction,
  pub reason: String,
  pub remediation: Vec<String>,
  /// Constraint ids that block this action, in rule-table order.
  pub blocked_by: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedAction {
  pub action: AdvisoryAction,
  pub reason: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub constraints: Option<Vec<String>>,
}

/// Raw value behind an explainability driver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriverValue {
  Flag(bool),
  Count(u64),
  Number(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
  pub name: String,
  pub value: DriverValue,
  /// Relative UI emphasis in [0,1]; not a probability.
  pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explainability {
  pub drivers: Vec<Driver>,
  pub assumptions: Vec<String>,
  pub data_quality_warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyMeta {
  pub deterministic_hash: String,
  pub evaluated_at: String,
  pub engine_version: String,
  /// Fingerprint of the thresholds in force; differs whenever `Config` does.
  pub config_hash: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scenario_id: Option<String>,
}

/// The engine's sole output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResult {
  pub policy_gate: PolicyGate,
  pub allowed_actions: Vec<AllowedAction>,
  pub blocked_actions: Vec<BlockedAction>,
  pub escalation_flags: Vec<EscalationFlag>,
  pub safety_constraints: Vec<SafetyConstraint>,
  pub explainability: Explainability,
  pub meta: PolicyMeta,
}

impl PolicyResult {
  pub fn constraint(&self, id: &str) -> Option<&SafetyConstraint> {
    self.safety_constraints.iter().find(|c| c.id == id)
  }

  pub fn is_blocked(&self, action: AdvisoryAction) -> bool {
    self.blocked_actions.iter().any(|b| b.action == action)
  }

  pub fn has_flag(&self, flag: EscalationFlag) -> bool {
    self.escalation_flags.contains(&flag)
  }

  pub fn triggered_ids(&self) -> Vec<String> {
    self
      .safety_constraints
      .iter()
      .filter(|c| c.triggered)
      .map(|c| c.id.clone())
      .collect()
  }
}

// ---------------------------------------------------------------------------
// CLI / HTTP error wrappers
// ---------------------------------------------------------------------------

/// Emitted when a request never reached the engine (unparseable line or body).
///
/// Distinct from every `PolicyGate` value: "could not evaluate" must never read as BLOCK.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub state: String,
  pub message: String,
}

impl ErrorOutput {
  pub const UNAVAILABLE: &'static str = "evaluation_unavailable";

  pub fn unavailable(message: impl Into<String>) -> Self {
    Self {
      error: true,
      state: Self::UNAVAILABLE.to_string(),
      message: message.into(),
    }
  }
}
