//! Request routing into plugins.
//!
//! Three surfaces share one matching algorithm:
//!
//! | Surface | URL                          | Matched against |
//! |---------|------------------------------|-----------------|
//! | Admin   | `/admin/p/{plugin_id}/{..}`  | `admin_pages`   |
//! | Public  | `/{public_path}/{..}`        | `public_pages`  |
//! | API     | `/api/p/{plugin_id}/{..}`    | `api_routes`    |

mod admin;
mod api;
mod public;

pub use admin::AdminRouter;
pub use api::{ApiRouter, ResolvedApiRoute};
pub use public::PublicRouter;

use crate::manager::PluginManager;
use encore_core::{EncoreError, EncoreResult};
use encore_plugin_api::{Component, PageProps, PluginDefinition, RouteParams};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// A page component selected for a request.
#[derive(Debug, Clone)]
pub struct ResolvedPage {
    pub plugin_id: String,
    pub component: Component,
    pub params: RouteParams,
    /// Effective public base path; `None` on the admin surface.
    pub public_path: Option<String>,
}

impl ResolvedPage {
    /// Props for rendering the component.
    #[must_use]
    pub fn props(&self, query: BTreeMap<String, String>) -> PageProps {
        PageProps {
            plugin_id: self.plugin_id.clone(),
            params: self.params.clone(),
            public_path: self.public_path.clone(),
            query,
        }
    }
}

/// Returns the definition of an enabled, successfully loaded plugin.
///
/// Checks run in order: unknown id, disabled, failed to load. A module
/// switched off in configuration counts as unknown.
async fn active_definition(manager: &PluginManager, plugin_id: &str) -> EncoreResult<Arc<PluginDefinition>> {
    let loader = manager.loader();
    loader.ensure_loaded().await;

    let registered = manager.registry().get(plugin_id);
    if registered.is_none() && (!loader.catalog().contains(plugin_id) || loader.is_module_disabled(plugin_id)) {
        debug!(plugin_id = %plugin_id, "Unknown plugin");
        return Err(EncoreError::PluginNotFound(plugin_id.to_string()));
    }

    if !manager.state_store().is_enabled(plugin_id).await {
        debug!(plugin_id = %plugin_id, "Plugin not enabled");
        return Err(EncoreError::PluginNotEnabled(plugin_id.to_string()));
    }

    registered.ok_or_else(|| {
        let message = loader
            .last_report()
            .failed
            .into_iter()
            .find(|f| f.plugin_id == plugin_id)
            .map_or_else(|| "module is not loaded".to_string(), |f| f.message);
        EncoreError::module_load_failure(plugin_id, message)
    })
}
