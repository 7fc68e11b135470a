//! Binary entrypoint: read JSON lines from stdin, write JSON lines to stdout.
//!
//! Each input line is an EvaluationRequest. Output lines are either:
//! - A PolicyResult (one per request, always)
//! - An ErrorOutput (when the line is not a JSON object)
//!
//! Logs go to stderr so stdout stays data-only. Set RUST_LOG to adjust.
//! Any stdin/stdout failure, including the final flush, exits non-zero.

use policy_engine::{Engine, EngineError};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn emit<W: Write, T: Serialize>(out: &mut W, value: &T) -> io::Result<()> {
  serde_json::to_writer(&mut *out, value)?;
  writeln!(out)
}

fn run(input: impl BufRead, output: impl Write) -> Result<(), EngineError> {
  let mut out = io::BufWriter::new(output);
  let engine = Engine::with_defaults();

  for (idx, line) in input.lines().enumerate() {
    let line = line?;

    // Skip blank lines.
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    match engine.evaluate_json(trimmed) {
      Ok(result) => emit(&mut out, &result)?,
      Err(e) => {
        tracing::warn!(line = idx + 1, error = %e, "request rejected");
        emit(&mut out, &e.to_output())?
      }
    }
  }

  out.flush()?;
  Ok(())
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(io::stderr)
    .init();

  if let Err(e) = run(io::stdin().lock(), io::stdout().lock()) {
    tracing::error!(error = %e, "policy-engine: aborted");
    std::process::exit(1);
  }
}
