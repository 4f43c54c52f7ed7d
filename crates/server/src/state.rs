use crate::config::ServerConfig;
use matcher::{MatchService, Settings};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Matching service (shared across requests)
    pub service: Arc<MatchService>,
}

impl ServerState {
    /// Create new server state from startup configuration
    pub fn new(config: ServerConfig, settings: Settings) -> Self {
        Self::with_service(config, MatchService::new(Arc::new(settings)))
    }

    /// Create server state around an already-built matching service
    pub fn with_service(config: ServerConfig, service: MatchService) -> Self {
        Self {
            config: Arc::new(config),
            service: Arc::new(service),
        }
    }

    /// Which model backend requests are routed to
    pub fn model_mode(&self) -> &'static str {
        if self.service.settings().use_mock_llm {
            "mock"
        } else {
            "remote"
        }
    }
}
