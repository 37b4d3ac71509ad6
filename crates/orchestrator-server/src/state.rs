use std::sync::Arc;

use orchestrator_core::OrchestratorConfig;

use crate::upstream::UpstreamClient;

/// Shared application state passed to all route handlers. Read-only: nothing
/// here changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<OrchestratorConfig>,
    pub upstream: UpstreamClient,
}

impl AppState {
    pub fn new(config: OrchestratorConfig) -> Self {
        Self {
            config: Arc::new(config),
            upstream: UpstreamClient::default(),
        }
    }
}
