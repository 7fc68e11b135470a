//! Outage Safety Policy Engine: deterministic, rule-based safety gating.
//!
//! Normalizes a loosely-typed outage snapshot, evaluates a fixed table of
//! safety constraints, and emits a PASS/WARN/BLOCK PolicyResult with
//! evidence, blocked/allowed actions, escalation flags and an audit hash.
//!
//! No AI, no DB, no network; pure computation. Identical normalized input
//! always yields identical output apart from `meta.evaluatedAt`.

pub mod audit;
pub mod config;
pub mod decision_log;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod explain;
pub mod gate;
pub mod normalize;
pub mod rules;
pub mod types;

pub use audit::ENGINE_VERSION;
pub use config::Config;
pub use engine::Engine;
pub use error::EngineError;
pub use types::{ErrorOutput, EvaluationRequest, PolicyResult};
