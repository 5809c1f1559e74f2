//! Application state for Axum handlers.

use encore_config::AppConfig;
use encore_core::HealthCheck;
use encore_plugin_runtime::{AdminRouter, ApiRouter, PluginManager, PublicRouter};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<PluginManager>,
    pub admin_router: AdminRouter,
    pub public_router: PublicRouter,
    pub api_router: ApiRouter,
    pub health_checks: Vec<Arc<dyn HealthCheck>>,
    pub site_name: String,
    /// Largest plugin API request body accepted, in bytes.
    pub max_body_size: usize,
    pub allow_reload: bool,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(manager: Arc<PluginManager>, config: &AppConfig) -> Self {
        Self {
            admin_router: AdminRouter::new(manager.clone()),
            public_router: PublicRouter::new(manager.clone()),
            api_router: ApiRouter::new(manager.clone()),
            manager,
            health_checks: Vec::new(),
            site_name: config.app.name.clone(),
            max_body_size: config.server.max_body_size,
            allow_reload: config.plugins.allow_reload,
        }
    }

    /// Adds a dependency probed by `/health` and `/ready`.
    #[must_use]
    pub fn with_health_check(mut self, check: Arc<dyn HealthCheck>) -> Self {
        self.health_checks.push(check);
        self
    }
}
