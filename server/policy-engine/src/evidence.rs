//! Deterministic evidence rendering.
//!
//! Templates use `{name}` placeholders. Values carry their own formatting so
//! the same input always renders byte-identical text: hours to one decimal,
//! ratios to two decimals, integers in plain decimal. No locale, timezone or
//! clock access happens here.

use std::fmt;

/// A typed placeholder value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
  Text(String),
  Int(u64),
  Hours(f64),
  Ratio(f64),
  /// Fixed number of decimals.
  Decimal(f64, usize),
}

impl fmt::Display for FieldValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Text(s) => f.write_str(s),
      Self::Int(n) => write!(f, "{}", n),
      Self::Hours(h) => write!(f, "{:.1}", h),
      Self::Ratio(r) => write!(f, "{:.2}", r),
      Self::Decimal(x, digits) => write!(f, "{:.*}", digits, x),
    }
  }
}

impl From<&str> for FieldValue {
  fn from(s: &str) -> Self {
    Self::Text(s.to_string())
  }
}

impl From<String> for FieldValue {
  fn from(s: String) -> Self {
    Self::Text(s)
  }
}

impl From<u32> for FieldValue {
  fn from(n: u32) -> Self {
    Self::Int(u64::from(n))
  }
}

impl From<u8> for FieldValue {
  fn from(n: u8) -> Self {
    Self::Int(u64::from(n))
  }
}

impl From<usize> for FieldValue {
  fn from(n: usize) -> Self {
    Self::Int(n as u64)
  }
}

/// Ordered placeholder bindings for one template.
#[derive(Debug, Clone, Default)]
pub struct Fields(Vec<(&'static str, FieldValue)>);

impl Fields {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, name: &'static str, value: impl Into<FieldValue>) -> Self {
    self.0.push((name, value.into()));
    self
  }

  pub fn hours(self, name: &'static str, value: f64) -> Self {
    self.with(name, FieldValue::Hours(value))
  }

  pub fn ratio(self, name: &'static str, value: f64) -> Self {
    self.with(name, FieldValue::Ratio(value))
  }

  /// Bind a value and the threshold it exceeds at the same precision: two
  /// decimals, widened up to six until the rendered value reads as larger.
  pub fn exceeding(self, name: &'static str, value: f64, threshold_name: &'static str, threshold: f64) -> Self {
    let scaled = |x: f64, digits: i32| (x * 10f64.powi(digits)).round();
    let digits = (2..=6)
      .find(|&d| scaled(value, d) > scaled(threshold, d))
      .unwrap_or(6);
    self
      .with(name, FieldValue::Decimal(value, digits as usize))
      .with(threshold_name, FieldValue::Decimal(threshold, digits as usize))
  }

  fn get(&self, name: &str) -> Option<&FieldValue> {
    self.0.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
  }
}

/// Substitute `{name}` placeholders. Unknown placeholders are left verbatim.
pub fn render(template: &str, fields: &Fields) -> String {
  let mut out = String::with_capacity(template.len() + 32);
  let mut rest = template;
  while let Some(open) = rest.find('{') {
    out.push_str(&rest[..open]);
    let after = &rest[open + 1..];
    match after.find('}') {
      Some(close) => {
        let name = &after[..close];
        match fields.get(name) {
          Some(value) => out.push_str(&value.to_string()),
          None => {
            out.push('{');
            out.push_str(name);
            out.push('}');
          }
        }
        rest = &after[close + 1..];
      }
      None => {
        out.push_str(&rest[open..]);
        rest = "";
      }
    }
  }
  out.push_str(rest);
  out
}
