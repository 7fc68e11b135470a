//! Structured error types for the policy engine.
//!
//! Evaluation itself never fails; these cover requests that never reach it.

use thiserror::Error;

use crate::types::ErrorOutput;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),

  #[error("parse: {0}")]
  Parse(String),
}

impl EngineError {
  pub fn parse(msg: impl Into<String>) -> Self {
    Self::Parse(msg.into())
  }

  /// Render as the wire-level "evaluation unavailable" output.
  pub fn to_output(&self) -> ErrorOutput {
    ErrorOutput::unavailable(self.to_string())
  }
}
