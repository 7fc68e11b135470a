//! Engine configuration with sane defaults.
//!
//! Changing any threshold changes rule semantics, so every result carries a
//! `configHash` of the thresholds it was evaluated under.

/// Tunable thresholds for normalization, constraints and data-quality checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
  /// Average asset load criticality at or above which SC-CRIT-001 fires.
  pub load_criticality_threshold: f64,
  /// Backup runway (hours) below which SC-CRIT-002 fires per load.
  pub backup_hours_threshold: f64,
  /// Heat severity at which transformer thermal stress starts (SC-HEAT-001).
  pub heat_stress_severity: u8,
  /// Heat severity at which demand spikes (SC-HEAT-002).
  pub heat_spike_severity: u8,
  /// Vegetation exposure above which ice-laden limb contact is a risk.
  pub ice_vegetation_threshold: f64,
  /// Vegetation exposure above which wildfire ignition is a risk.
  pub wildfire_vegetation_threshold: f64,
  /// Customers one crew is assumed to restore when crews-needed is derived.
  pub customers_per_crew: u64,
  /// Severity assumed when the snapshot omits it.
  pub default_severity: u8,
  /// Completeness assumed when data quality is missing.
  pub default_completeness: f64,
  /// Freshness (minutes) assumed when data quality is missing.
  pub default_freshness_minutes: f64,
  /// Completeness below which a data-quality warning is raised.
  pub min_completeness: f64,
  /// Snapshot age (minutes) above which a staleness warning is raised.
  pub max_freshness_minutes: f64,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      load_criticality_threshold: 0.70,
      backup_hours_threshold: 4.0,
      heat_stress_severity: 3,
      heat_spike_severity: 4,
      ice_vegetation_threshold: 0.50,
      wildfire_vegetation_threshold: 0.60,
      customers_per_crew: 2500,
      default_severity: 3,
      default_completeness: 0.40,
      default_freshness_minutes: 60.0,
      min_completeness: 0.70,
      max_freshness_minutes: 30.0,
    }
  }
}
