use super::ResolvedPage;
use crate::manager::PluginManager;
use encore_core::{EncoreError, EncoreResult};
use encore_plugin_api::matcher::{find_match, split_path, strip_segment_prefix};
use std::sync::Arc;
use tracing::debug;

/// Resolves public site paths by plugin public path prefix.
///
/// When several enabled plugins' paths prefix the request, the one with the
/// most segments wins; equal lengths keep registration order.
#[derive(Debug, Clone)]
pub struct PublicRouter {
    manager: Arc<PluginManager>,
}

impl PublicRouter {
    #[must_use]
    pub fn new(manager: Arc<PluginManager>) -> Self {
        Self { manager }
    }

    /// # Errors
    ///
    /// `NotFound` when no enabled plugin owns the path, `RouteNotFound` when
    /// the owning plugin declares no matching page.
    pub async fn resolve(&self, path: &str) -> EncoreResult<ResolvedPage> {
        let request = split_path(path);

        let mut best: Option<(usize, _, String)> = None;
        for instance in self.manager.enabled_instances().await {
            let Some(public_path) = instance.public_path() else {
                continue;
            };
            let base = split_path(public_path);
            if strip_segment_prefix(&base, &request).is_none() {
                continue;
            }
            if best.as_ref().map_or(true, |(len, _, _)| base.len() > *len) {
                best = Some((base.len(), instance.definition.clone(), public_path.to_string()));
            }
        }

        let (base_len, definition, public_path) =
            best.ok_or_else(|| EncoreError::not_found("page", path))?;
        let rest = &request[base_len..];

        let (page, params) = find_match(&definition.public_pages, rest)
            .ok_or_else(|| EncoreError::route_not_found(&definition.id, rest.join("/")))?;

        debug!(plugin_id = %definition.id, pattern = %page.path, "Public page resolved");
        Ok(ResolvedPage {
            plugin_id: definition.id.clone(),
            component: page.component.clone(),
            params,
            public_path: Some(public_path),
        })
    }
}
