//! Plugin manager.
//!
//! Read-side facade joining the registry with persisted state: plugin
//! listings, navigation, homepage sections and merged translations.

use crate::instance::PluginInstance;
use crate::loader::PluginLoader;
use crate::registry::PluginRegistry;
use crate::state_store::PluginStateStore;
use encore_plugin_api::{Component, Icon, Messages};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Public site navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationItem {
    pub plugin_id: String,
    pub name: String,
    pub href: String,
}

/// Admin sidebar entry of an enabled plugin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNavigationItem {
    pub plugin_id: String,
    pub name: String,
    pub href: String,
    #[serde(serialize_with = "serialize_icon_name")]
    pub icon: Icon,
}

fn serialize_icon_name<S: serde::Serializer>(icon: &Icon, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(icon.name())
}

/// A homepage section ready to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedHomepageSection {
    pub plugin_id: String,
    pub priority: i32,
    pub public_path: String,
    #[serde(skip)]
    pub component: Component,
}

/// Facade over registry, loader and state store.
pub struct PluginManager {
    registry: Arc<PluginRegistry>,
    loader: Arc<PluginLoader>,
    state_store: PluginStateStore,
}

impl PluginManager {
    #[must_use]
    pub fn new(loader: Arc<PluginLoader>, state_store: PluginStateStore) -> Self {
        Self {
            registry: loader.registry().clone(),
            loader,
            state_store,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn loader(&self) -> &Arc<PluginLoader> {
        &self.loader
    }

    #[must_use]
    pub fn state_store(&self) -> &PluginStateStore {
        &self.state_store
    }

    /// Every registered plugin with its state, in registration order.
    pub async fn all_instances(&self) -> Vec<PluginInstance> {
        self.loader.ensure_loaded().await;

        let mut states: HashMap<String, _> = self
            .state_store
            .get_all_states()
            .await
            .into_iter()
            .map(|s| (s.plugin_id.to_string(), s))
            .collect();

        self.registry
            .get_all()
            .into_iter()
            .map(|definition| {
                let state = states.remove(&definition.id);
                PluginInstance::new(definition, state)
            })
            .collect()
    }

    /// Enabled plugins whose definition is registered.
    ///
    /// State records for plugins that are not compiled in are skipped.
    pub async fn enabled_instances(&self) -> Vec<PluginInstance> {
        let instances: Vec<_> = self
            .all_instances()
            .await
            .into_iter()
            .filter(PluginInstance::enabled)
            .collect();
        debug!(count = instances.len(), "Resolved enabled plugins");
        instances
    }

    /// Looks up a single registered plugin with its state.
    pub async fn instance(&self, plugin_id: &str) -> Option<PluginInstance> {
        self.loader.ensure_loaded().await;
        let definition = self.registry.get(plugin_id)?;
        let state = self.state_store.get_state(plugin_id).await;
        Some(PluginInstance::new(definition, state))
    }

    /// Public navigation links of enabled plugins.
    ///
    /// Only plugins with both an admin navigation entry and a default public
    /// path appear. With a locale, `translations[locale][plugin_id].navName`
    /// replaces the entry name when present.
    pub async fn navigation_items(&self, locale: Option<&str>) -> Vec<NavigationItem> {
        self.enabled_instances()
            .await
            .iter()
            .filter_map(|instance| {
                let def = &instance.definition;
                let nav = def.admin_navigation.as_ref()?;
                def.default_public_path.as_ref()?;
                let href = instance.public_path()?.to_string();

                let name = locale
                    .and_then(|l| def.message(l, &def.id, "navName"))
                    .map_or_else(|| nav.name.clone(), str::to_string);

                Some(NavigationItem {
                    plugin_id: def.id.clone(),
                    name,
                    href,
                })
            })
            .collect()
    }

    /// Admin sidebar entries of enabled plugins.
    pub async fn admin_navigation(&self) -> Vec<AdminNavigationItem> {
        self.enabled_instances()
            .await
            .iter()
            .filter_map(|instance| {
                let nav = instance.definition.admin_navigation.as_ref()?;
                Some(AdminNavigationItem {
                    plugin_id: instance.id().to_string(),
                    name: nav.name.clone(),
                    href: nav.href.clone(),
                    icon: nav.icon.clone(),
                })
            })
            .collect()
    }

    /// Homepage sections of enabled plugins, highest priority first.
    ///
    /// Ties keep registration order.
    pub async fn homepage_sections(&self) -> Vec<ResolvedHomepageSection> {
        let mut sections: Vec<_> = self
            .enabled_instances()
            .await
            .iter()
            .filter_map(|instance| {
                let section = instance.definition.homepage_section.as_ref()?;
                let public_path = instance
                    .public_path()
                    .map_or_else(|| format!("/{}", instance.id()), str::to_string);
                Some(ResolvedHomepageSection {
                    plugin_id: instance.id().to_string(),
                    priority: section.priority,
                    public_path,
                    component: section.component.clone(),
                })
            })
            .collect();

        sections.sort_by(|a, b| b.priority.cmp(&a.priority));
        sections
    }

    /// Shallow merge of enabled plugins' messages for `locale`.
    ///
    /// A later plugin wins when two declare the same namespace.
    pub async fn translations_for(&self, locale: &str) -> Messages {
        let mut merged = Messages::new();
        for instance in self.enabled_instances().await {
            if let Some(messages) = instance.definition.translations.get(locale) {
                merged.extend(messages.clone());
            }
        }
        merged
    }
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager")
            .field("loader", &self.loader)
            .finish_non_exhaustive()
    }
}
