//! Application state for the payroll engine API.

use std::sync::Arc;

use crate::config::EngineConfig;

/// Shared application state.
///
/// Holds the immutable engine configuration shared by every request.
#[derive(Clone)]
pub struct AppState {
    config: Arc<EngineConfig>,
}

impl AppState {
    /// Creates a new application state with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
