//! Repository trait definitions.

use crate::model::{PluginState, PluginStateChanges};
use async_trait::async_trait;
use encore_core::{EncoreResult, PluginId};

/// Backing persistence for plugin state, keyed by plugin id.
///
/// Settings are stored as an opaque blob; the repository never interprets
/// them.
#[async_trait]
pub trait PluginStateRepository: Send + Sync {
    /// Finds the state record of one plugin.
    async fn find(&self, plugin_id: &PluginId) -> EncoreResult<Option<PluginState>>;

    /// Returns every state record ordered by plugin id.
    async fn find_all(&self) -> EncoreResult<Vec<PluginState>>;

    /// Creates the record (disabled unless `changes` says otherwise) or
    /// applies `changes` to the existing one, atomically.
    async fn upsert(&self, plugin_id: &PluginId, changes: PluginStateChanges) -> EncoreResult<PluginState>;

    /// Deletes a record, returning whether one existed.
    async fn delete(&self, plugin_id: &PluginId) -> EncoreResult<bool>;
}
