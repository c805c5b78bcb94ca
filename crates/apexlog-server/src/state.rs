//! Shared application state.
//!
//! The engine itself is stateless; the only server-wide state is the default
//! analyzer configuration applied when a request does not carry its own.

use apexlog_core::AnalyzeConfig;

/// State shared by all handlers. Cheap to clone per request.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Default analyzer configuration for requests without an override.
    pub config: AnalyzeConfig,
}

impl AppState {
    pub fn new(config: AnalyzeConfig) -> Self {
        AppState { config }
    }
}
