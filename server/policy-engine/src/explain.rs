//! Explainability: decision drivers, assumptions and data-quality warnings
//! for the audit / "why" surface. Pure function of the normalized input.

use crate::config::Config;
use crate::evidence::{render, Fields};
use crate::types::*;

const STATIC_ASSUMPTIONS: [&str; 3] = [
  "Evaluation uses the supplied snapshot only; no live SCADA or OMS telemetry is consulted",
  "Each safety constraint is evaluated independently of every other constraint",
  "Hospital, water and telecom loads are treated as life-safety critical",
];

fn round2(x: f64) -> f64 {
  (x * 100.0).round() / 100.0
}

fn weight(x: f64) -> f64 {
  round2(x.clamp(0.0, 1.0))
}

fn driver(name: &str, value: DriverValue, w: f64) -> Driver {
  Driver {
    name: name.to_string(),
    value,
    weight: weight(w),
  }
}

/// Named factors with raw values and relative emphasis weights.
pub fn drivers(input: &EvaluationInput, config: &Config) -> Vec<Driver> {
  let crews = input.crews;
  let coverage = f64::from(crews.committed()) / f64::from(crews.estimated_needed.max(1));
  let avg_criticality = input.avg_load_criticality().unwrap_or(0.0);
  let max_vegetation = input.max_vegetation_exposure().unwrap_or(0.0);

  let mut out = vec![
    driver(
      "hazard_severity",
      DriverValue::Count(u64::from(input.severity)),
      f64::from(input.severity) / 5.0,
    ),
    driver(
      "customers_affected",
      DriverValue::Count(input.customers_affected),
      input.customers_affected as f64 / 10_000.0,
    ),
    driver(
      "crews_sufficient",
      DriverValue::Flag(!crews.is_short()),
      if crews.is_short() { 1.0 } else { 0.2 },
    ),
    driver(
      "crew_coverage_ratio",
      DriverValue::Number(round2(coverage)),
      1.0 - coverage,
    ),
    driver(
      "avg_load_criticality",
      DriverValue::Number(round2(avg_criticality)),
      avg_criticality,
    ),
    driver(
      "max_vegetation_exposure",
      DriverValue::Number(round2(max_vegetation)),
      max_vegetation,
    ),
  ];

  if let Some(hours) = input.min_backup_hours() {
    let threshold = config.backup_hours_threshold.max(f64::EPSILON);
    out.push(driver(
      "min_backup_hours",
      DriverValue::Number(round2(hours)),
      1.0 - hours / (2.0 * threshold),
    ));
  }

  out.push(driver(
    "data_completeness",
    DriverValue::Number(round2(input.data_quality.completeness)),
    1.0 - input.data_quality.completeness,
  ));
  out
}

/// Static policy statements plus conditional ones where the data is thin.
pub fn assumptions(input: &EvaluationInput) -> Vec<String> {
  let mut out: Vec<String> = STATIC_ASSUMPTIONS.iter().map(|s| s.to_string()).collect();

  for field in &input.defaulted_fields {
    let text = match field {
      DefaultedField::Severity => render(
        "Severity was not supplied; assumed {severity}",
        &Fields::new().with("severity", input.severity),
      ),
      DefaultedField::CustomersAffected => {
        "Customers affected was not supplied; assumed 0".to_string()
      }
      DefaultedField::Crews => "Crew counts are best-effort estimates; none were supplied".to_string(),
      DefaultedField::EstimatedCrewsNeeded => render(
        "Crews needed was derived from severity and customers affected ({needed})",
        &Fields::new().with("needed", input.crews.estimated_needed),
      ),
      DefaultedField::DataQuality => {
        "Data quality metadata was incomplete; conservative defaults applied".to_string()
      }
    };
    out.push(text);
  }

  if input.hazard_type == HazardType::Unknown {
    out.push("Hazard type was not recognised; hazard-specific constraints were not applied".to_string());
  }
  if input.phase == Phase::Unknown {
    out.push("Event phase was not recognised; phase-scoped constraints were not applied".to_string());
  }

  let no_runway = input
    .critical_loads
    .iter()
    .filter(|l| l.backup_hours_remaining.is_none())
    .count();
  if no_runway > 0 {
    out.push(render(
      "Backup runway unknown for {count} critical load(s); treated as not short",
      &Fields::new().with("count", no_runway),
    ));
  }
  if input.assets.is_empty() {
    out.push("No asset records were linked; asset-based constraints saw an empty set".to_string());
  }
  out
}

/// Warnings when completeness is low, the snapshot is stale, or metadata was missing.
pub fn data_quality_warnings(input: &EvaluationInput, config: &Config) -> Vec<String> {
  let dq = input.data_quality;
  let mut out = Vec::new();
  if input.is_defaulted(DefaultedField::DataQuality) {
    out.push("Data quality metadata missing; completeness and freshness were assumed".to_string());
  }
  if dq.completeness < config.min_completeness {
    out.push(render(
      "Data completeness {value} is below the {threshold} minimum",
      &Fields::new()
        .ratio("value", dq.completeness)
        .ratio("threshold", config.min_completeness),
    ));
  }
  if dq.freshness_minutes > config.max_freshness_minutes {
    out.push(render(
      "Snapshot is {value} minutes old, beyond the {threshold} minute freshness bound",
      &Fields::new()
        .hours("value", dq.freshness_minutes)
        .hours("threshold", config.max_freshness_minutes),
    ));
  }
  out
}

pub fn compose(input: &EvaluationInput, config: &Config) -> Explainability {
  Explainability {
    drivers: drivers(input, config),
    assumptions: assumptions(input),
    data_quality_warnings: data_quality_warnings(input, config),
  }
}
