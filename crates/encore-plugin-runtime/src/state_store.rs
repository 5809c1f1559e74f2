//! Enable/disable state of plugins, layered over the persistence repository.

use crate::registry::PluginRegistry;
use encore_core::{EncoreError, EncoreResult, PluginId};
use encore_plugin_api::LifecycleHook;
use encore_repository::{PluginState, PluginStateChanges, PluginStateRepository};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Plugin state operations used by the routers and the admin API.
///
/// Reads degrade to empty results when the backing store is unreachable.
/// Writes are single atomic upserts; lifecycle hooks run after the write and
/// their failures are logged, never propagated.
#[derive(Clone)]
pub struct PluginStateStore {
    repository: Arc<dyn PluginStateRepository>,
    registry: Arc<PluginRegistry>,
}

impl PluginStateStore {
    #[must_use]
    pub fn new(repository: Arc<dyn PluginStateRepository>, registry: Arc<PluginRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// Returns the state record, or `None` if absent or unreadable.
    pub async fn get_state(&self, plugin_id: &str) -> Option<PluginState> {
        match self.repository.find(&PluginId::new(plugin_id)).await {
            Ok(state) => state,
            Err(e) => {
                warn!(plugin_id = %plugin_id, error = %e, "Plugin state read failed, treating as absent");
                None
            }
        }
    }

    /// Returns every state record, or an empty list if unreadable.
    pub async fn get_all_states(&self) -> Vec<PluginState> {
        match self.repository.find_all().await {
            Ok(states) => states,
            Err(e) => {
                warn!(error = %e, "Plugin state read failed, treating as empty");
                Vec::new()
            }
        }
    }

    /// Enables a registered plugin.
    ///
    /// The public path is `custom_public_path` when given, else the
    /// definition's default.
    ///
    /// # Errors
    ///
    /// [`EncoreError::PluginNotRegistered`] if the definition is not loaded;
    /// nothing is written in that case. Repository errors propagate.
    pub async fn enable(&self, plugin_id: &str, custom_public_path: Option<String>) -> EncoreResult<PluginState> {
        let definition = self
            .registry
            .get(plugin_id)
            .ok_or_else(|| EncoreError::PluginNotRegistered(plugin_id.to_string()))?;

        let public_path = custom_public_path.or_else(|| definition.default_public_path.clone());
        let state = self
            .repository
            .upsert(&PluginId::new(plugin_id), PluginStateChanges::enable(public_path))
            .await?;

        info!(plugin_id = %plugin_id, public_path = ?state.custom_public_path, "Plugin enabled");
        run_hook(plugin_id, "onEnable", definition.on_enable.as_ref()).await;
        Ok(state)
    }

    /// Disables a plugin, creating a disabled record if none exists.
    ///
    /// The definition does not need to be registered.
    ///
    /// # Errors
    ///
    /// Repository errors propagate.
    pub async fn disable(&self, plugin_id: &str) -> EncoreResult<PluginState> {
        let state = self
            .repository
            .upsert(&PluginId::new(plugin_id), PluginStateChanges::disable())
            .await?;

        info!(plugin_id = %plugin_id, "Plugin disabled");
        if let Some(definition) = self.registry.get(plugin_id) {
            run_hook(plugin_id, "onDisable", definition.on_disable.as_ref()).await;
        }
        Ok(state)
    }

    /// Stores the settings object as an opaque JSON blob.
    ///
    /// # Errors
    ///
    /// Repository errors propagate.
    pub async fn update_settings(&self, plugin_id: &str, settings: &Value) -> EncoreResult<PluginState> {
        let blob = serde_json::to_string(settings)?;
        let state = self
            .repository
            .upsert(&PluginId::new(plugin_id), PluginStateChanges::settings(blob))
            .await?;
        debug!(plugin_id = %plugin_id, "Plugin settings updated");
        Ok(state)
    }

    /// Changes the public path of a plugin that already has a state record.
    ///
    /// # Errors
    ///
    /// [`EncoreError::NotFound`] when no record exists. Repository errors
    /// propagate.
    pub async fn update_public_path(&self, plugin_id: &str, path: &str) -> EncoreResult<PluginState> {
        let id = PluginId::new(plugin_id);
        if self.repository.find(&id).await?.is_none() {
            return Err(EncoreError::not_found("plugin_state", plugin_id));
        }

        let state = self
            .repository
            .upsert(&id, PluginStateChanges::public_path(path))
            .await?;
        info!(plugin_id = %plugin_id, public_path = %path, "Plugin public path updated");
        Ok(state)
    }

    pub async fn is_enabled(&self, plugin_id: &str) -> bool {
        self.get_state(plugin_id).await.is_some_and(|s| s.enabled)
    }

    /// Effective public path: the stored custom path, else the default.
    pub async fn public_path(&self, plugin_id: &str) -> Option<String> {
        let custom = self
            .get_state(plugin_id)
            .await
            .and_then(|s| s.custom_public_path);
        custom.or_else(|| {
            self.registry
                .get(plugin_id)
                .and_then(|d| d.default_public_path.clone())
        })
    }
}

async fn run_hook(plugin_id: &str, hook_name: &str, hook: Option<&LifecycleHook>) {
    let Some(hook) = hook else {
        return;
    };
    if let Err(e) = hook.run().await {
        error!(plugin_id = %plugin_id, hook = hook_name, error = %e, "Plugin lifecycle hook failed");
    }
}

impl std::fmt::Debug for PluginStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginStateStore")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore_plugin_api::{PluginDefinition, PluginError};
    use encore_repository::InMemoryPluginStateRepository;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn setup() -> (PluginStateStore, Arc<InMemoryPluginStateRepository>, Arc<PluginRegistry>) {
        let repo = Arc::new(InMemoryPluginStateRepository::new());
        let registry = Arc::new(PluginRegistry::new());
        (PluginStateStore::new(repo.clone(), registry.clone()), repo, registry)
    }

    #[tokio::test]
    async fn test_enable_unregistered_fails_without_writing() {
        let (store, repo, _) = setup();

        let err = store.enable("ghost", None).await.unwrap_err();

        assert!(matches!(err, EncoreError::PluginNotRegistered(id) if id == "ghost"));
        assert!(repo.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enable_falls_back_to_default_path() {
        let (store, _, registry) = setup();
        registry.register(
            PluginDefinition::new("concerts", "Concerts", "Events", "1.0.0").default_public_path("/concerts"),
        );

        let state = store.enable("concerts", None).await.unwrap();
        assert!(state.enabled);
        assert_eq!(state.custom_public_path.as_deref(), Some("/concerts"));

        let state = store.enable("concerts", Some("/gigs".into())).await.unwrap();
        assert_eq!(state.custom_public_path.as_deref(), Some("/gigs"));
        assert_eq!(store.public_path("concerts").await.as_deref(), Some("/gigs"));
    }

    #[tokio::test]
    async fn test_disable_unseen_creates_disabled_record() {
        let (store, repo, _) = setup();

        let state = store.disable("photos").await.unwrap();

        assert!(!state.enabled);
        assert_eq!(repo.find_all().await.unwrap().len(), 1);
        assert!(!store.is_enabled("photos").await);
    }

    #[tokio::test]
    async fn test_hook_failure_does_not_roll_back() {
        let (store, _, registry) = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        registry.register(
            PluginDefinition::new("concerts", "Concerts", "Events", "1.0.0")
                .on_enable(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Err::<(), _>(PluginError::Hook("seed failed".into()))
                    }
                })
                .on_disable(|| async { Err::<(), _>(PluginError::Hook("cleanup failed".into())) }),
        );

        assert!(store.enable("concerts", None).await.unwrap().enabled);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(store.is_enabled("concerts").await);

        assert!(!store.disable("concerts").await.unwrap().enabled);
        assert!(!store.is_enabled("concerts").await);
    }

    #[tokio::test]
    async fn test_update_settings_upserts_blob() {
        let (store, _, _) = setup();

        let state = store
            .update_settings("photos", &json!({ "perPage": 24 }))
            .await
            .unwrap();

        assert!(!state.enabled);
        assert_eq!(state.settings.as_deref(), Some(r#"{"perPage":24}"#));
    }

    #[tokio::test]
    async fn test_update_public_path_requires_record() {
        let (store, _, _) = setup();

        let err = store.update_public_path("photos", "/gallery").await.unwrap_err();
        assert!(err.is_not_found());

        store.disable("photos").await.unwrap();
        let state = store.update_public_path("photos", "/gallery").await.unwrap();
        assert_eq!(state.custom_public_path.as_deref(), Some("/gallery"));
        assert!(!state.enabled);
    }
}
