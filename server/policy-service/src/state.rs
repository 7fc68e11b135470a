use policy_engine::Engine;

/// Shared, read-only handler state.
#[derive(Debug, Clone, Default)]
pub struct AppState {
  pub engine: Engine,
}
