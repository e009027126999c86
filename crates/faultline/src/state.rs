//! Application state shared across middleware

use std::sync::Arc;

use faultline_core::ErrorMapper;

use crate::config::Config;
use crate::security::Guard;

/// Application state shared across all requests, read-only after startup
#[derive(Clone)]
pub struct AppState {
    /// Failure classifier used by the error boundary
    pub mapper: ErrorMapper,
    /// Route protection
    pub guard: Arc<Guard>,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Self {
        let messages = Arc::new(config.messages.clone());
        Self {
            mapper: ErrorMapper::with_shared(Arc::clone(&messages)),
            guard: Arc::new(Guard::from_config(&config.security, messages)),
            config: Arc::new(config),
        }
    }
}
