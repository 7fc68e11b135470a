//! Binary entrypoint for the policy service.

use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use policy_service::{create_app, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let port: u16 = std::env::var("PORT")
    .unwrap_or_else(|_| "5005".into())
    .parse()
    .map_err(|e| format!("PORT must be a valid u16: {e}"))?;

  let state = Arc::new(AppState::default());
  let app = create_app(state);

  let addr = SocketAddr::from(([127, 0, 0, 1], port));
  tracing::info!(
    "policy-service listening on http://{} (engine {})",
    addr,
    policy_engine::ENGINE_VERSION
  );

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
