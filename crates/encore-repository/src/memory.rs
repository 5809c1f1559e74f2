//! In-memory plugin state repository.
//!
//! Used by tests and by deployments that do not need state to survive a
//! restart.

use crate::model::{PluginState, PluginStateChanges};
use crate::traits::PluginStateRepository;
use async_trait::async_trait;
use encore_core::{EncoreResult, PluginId};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct InMemoryPluginStateRepository {
    states: RwLock<BTreeMap<PluginId, PluginState>>,
}

impl InMemoryPluginStateRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository with existing records.
    #[must_use]
    pub fn with_states(states: impl IntoIterator<Item = PluginState>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.states.write();
            for state in states {
                map.insert(state.plugin_id.clone(), state);
            }
        }
        repo
    }
}

#[async_trait]
impl PluginStateRepository for InMemoryPluginStateRepository {
    async fn find(&self, plugin_id: &PluginId) -> EncoreResult<Option<PluginState>> {
        Ok(self.states.read().get(plugin_id).cloned())
    }

    async fn find_all(&self) -> EncoreResult<Vec<PluginState>> {
        Ok(self.states.read().values().cloned().collect())
    }

    async fn upsert(&self, plugin_id: &PluginId, changes: PluginStateChanges) -> EncoreResult<PluginState> {
        let mut states = self.states.write();
        let state = states
            .entry(plugin_id.clone())
            .or_insert_with(|| PluginState::new(plugin_id.clone()));
        state.apply(&changes);
        Ok(state.clone())
    }

    async fn delete(&self, plugin_id: &PluginId) -> EncoreResult<bool> {
        Ok(self.states.write().remove(plugin_id).is_some())
    }
}
