use super::{active_definition, ResolvedPage};
use crate::manager::PluginManager;
use encore_core::{EncoreError, EncoreResult};
use encore_plugin_api::matcher::{find_match, split_path};
use std::sync::Arc;
use tracing::debug;

/// Resolves `/admin/p/{plugin_id}/{path}` to an admin page.
#[derive(Debug, Clone)]
pub struct AdminRouter {
    manager: Arc<PluginManager>,
}

impl AdminRouter {
    #[must_use]
    pub fn new(manager: Arc<PluginManager>) -> Self {
        Self { manager }
    }

    /// # Errors
    ///
    /// `PluginNotFound`, `PluginNotEnabled`, `ModuleLoadFailure` or
    /// `RouteNotFound`.
    pub async fn resolve(&self, plugin_id: &str, path: &str) -> EncoreResult<ResolvedPage> {
        let definition = active_definition(&self.manager, plugin_id).await?;
        let segments = split_path(path);

        let (page, params) = find_match(&definition.admin_pages, &segments)
            .ok_or_else(|| EncoreError::route_not_found(plugin_id, segments.join("/")))?;

        debug!(plugin_id = %plugin_id, pattern = %page.path, "Admin page resolved");
        Ok(ResolvedPage {
            plugin_id: plugin_id.to_string(),
            component: page.component.clone(),
            params,
            public_path: None,
        })
    }
}
