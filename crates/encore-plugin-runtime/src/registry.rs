//! In-memory registry of loaded plugin definitions.
//!
//! The registry knows nothing about enabled state; that lives in the
//! [`crate::PluginStateStore`].

use encore_plugin_api::PluginDefinition;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Default)]
struct Entries {
    by_id: HashMap<String, Arc<PluginDefinition>>,
    /// Registration order.
    order: Vec<String>,
}

/// Process-local registry of plugin definitions.
#[derive(Default)]
pub struct PluginRegistry {
    entries: RwLock<Entries>,
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition under its id.
    ///
    /// First registration wins: returns false and keeps the existing
    /// definition when the id is already present.
    pub fn register(&self, definition: PluginDefinition) -> bool {
        let mut entries = self.entries.write();
        if entries.by_id.contains_key(&definition.id) {
            debug!(plugin_id = %definition.id, "Plugin already registered, keeping first definition");
            return false;
        }

        let id = definition.id.clone();
        info!(plugin_id = %id, version = %definition.version, "Plugin registered");
        entries.order.push(id.clone());
        entries.by_id.insert(id, Arc::new(definition));
        true
    }

    /// Removes a definition. Returns the removed definition, if any.
    pub fn unregister(&self, plugin_id: &str) -> Option<Arc<PluginDefinition>> {
        let mut entries = self.entries.write();
        let removed = entries.by_id.remove(plugin_id)?;
        entries.order.retain(|id| id != plugin_id);
        info!(plugin_id = %plugin_id, "Plugin unregistered");
        Some(removed)
    }

    #[must_use]
    pub fn get(&self, plugin_id: &str) -> Option<Arc<PluginDefinition>> {
        self.entries.read().by_id.get(plugin_id).cloned()
    }

    /// All definitions in registration order.
    #[must_use]
    pub fn get_all(&self) -> Vec<Arc<PluginDefinition>> {
        let entries = self.entries.read();
        entries
            .order
            .iter()
            .filter_map(|id| entries.by_id.get(id).cloned())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, plugin_id: &str) -> bool {
        self.entries.read().by_id.contains_key(plugin_id)
    }

    /// Drops every definition. Used by reload only.
    pub fn clear(&self) {
        let mut entries = self.entries.write();
        let count = entries.order.len();
        entries.by_id.clear();
        entries.order.clear();
        info!(count = count, "Plugin registry cleared");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.entries.read().order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(id: &str, name: &str) -> PluginDefinition {
        PluginDefinition::new(id, name, "Test plugin", "1.0.0")
    }

    #[test]
    fn test_register_first_wins() {
        let registry = PluginRegistry::new();

        assert!(registry.register(definition("concerts", "Concerts")));
        assert!(!registry.register(definition("concerts", "Other Concerts")));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("concerts").unwrap().name, "Concerts");
    }

    #[test]
    fn test_get_all_keeps_registration_order() {
        let registry = PluginRegistry::new();
        registry.register(definition("photos", "Photos"));
        registry.register(definition("concerts", "Concerts"));
        registry.register(definition("news", "News"));

        let ids: Vec<_> = registry.get_all().iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["photos", "concerts", "news"]);
    }

    #[test]
    fn test_unregister_and_clear() {
        let registry = PluginRegistry::new();
        registry.register(definition("photos", "Photos"));
        registry.register(definition("concerts", "Concerts"));

        assert!(registry.unregister("photos").is_some());
        assert!(registry.unregister("photos").is_none());
        assert!(!registry.contains("photos"));
        assert_eq!(registry.get_all().len(), 1);

        registry.clear();
        assert!(registry.is_empty());
        assert!(registry.get("concerts").is_none());
    }

    #[test]
    fn test_reregister_after_unregister_appends() {
        let registry = PluginRegistry::new();
        registry.register(definition("photos", "Photos"));
        registry.register(definition("concerts", "Concerts"));
        registry.unregister("photos");
        registry.register(definition("photos", "Photos v2"));

        let ids: Vec<_> = registry.get_all().iter().map(|d| d.id.clone()).collect();
        assert_eq!(ids, vec!["concerts", "photos"]);
        assert_eq!(registry.get("photos").unwrap().name, "Photos v2");
    }
}
