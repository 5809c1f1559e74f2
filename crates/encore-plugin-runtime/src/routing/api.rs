use super::active_definition;
use crate::manager::PluginManager;
use encore_core::{EncoreError, EncoreResult};
use encore_plugin_api::matcher::{find_match, split_path};
use encore_plugin_api::{ApiHandler, ApiRequest, HttpMethod, HttpResponse, RouteParams};
use std::sync::Arc;
use tracing::debug;

/// An API handler selected for a request.
#[derive(Debug, Clone)]
pub struct ResolvedApiRoute {
    pub plugin_id: String,
    pub pattern: String,
    pub handler: ApiHandler,
    pub params: RouteParams,
    pub public_path: Option<String>,
}

impl ResolvedApiRoute {
    /// Runs the handler; handler errors become error responses.
    pub async fn dispatch(self, request: ApiRequest) -> HttpResponse {
        self.handler.call(request, self.params).await
    }
}

/// Resolves `/api/p/{plugin_id}/{path}` to an API handler.
#[derive(Debug, Clone)]
pub struct ApiRouter {
    manager: Arc<PluginManager>,
}

impl ApiRouter {
    #[must_use]
    pub fn new(manager: Arc<PluginManager>) -> Self {
        Self { manager }
    }

    /// `method` is the raw request verb; verbs outside [`HttpMethod`] are
    /// never allowed.
    ///
    /// # Errors
    ///
    /// `PluginNotFound`, `PluginNotEnabled`, `ModuleLoadFailure`,
    /// `RouteNotFound` or `MethodNotAllowed`.
    pub async fn resolve(&self, plugin_id: &str, method: &str, path: &str) -> EncoreResult<ResolvedApiRoute> {
        let definition = active_definition(&self.manager, plugin_id).await?;
        let segments = split_path(path);
        let joined = segments.join("/");

        let (route, params) = find_match(&definition.api_routes, &segments)
            .ok_or_else(|| EncoreError::route_not_found(plugin_id, joined.clone()))?;

        let handler = method
            .parse::<HttpMethod>()
            .ok()
            .and_then(|m| route.handler_for(m))
            .ok_or_else(|| EncoreError::MethodNotAllowed {
                plugin_id: plugin_id.to_string(),
                path: joined,
                method: method.to_string(),
            })?;

        debug!(plugin_id = %plugin_id, method = %method, pattern = %route.path, "API route resolved");
        let public_path = self.manager.state_store().public_path(plugin_id).await;
        Ok(ResolvedApiRoute {
            plugin_id: plugin_id.to_string(),
            pattern: route.path.clone(),
            handler: handler.clone(),
            params,
            public_path,
        })
    }
}
