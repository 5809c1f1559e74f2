//! SQLite plugin state repository implementation.

use crate::model::{PluginState, PluginStateChanges};
use crate::traits::PluginStateRepository;
use crate::DatabasePool;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use encore_core::{EncoreResult, PluginId};
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// SQLite plugin state repository.
#[derive(Clone)]
pub struct SqlitePluginStateRepository {
    pool: Arc<DatabasePool>,
}

impl SqlitePluginStateRepository {
    #[must_use]
    pub fn new(pool: Arc<DatabasePool>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a plugin state.
#[derive(Debug, FromRow)]
struct PluginStateRow {
    plugin_id: String,
    enabled: bool,
    custom_public_path: Option<String>,
    settings: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PluginStateRow> for PluginState {
    fn from(row: PluginStateRow) -> Self {
        Self {
            plugin_id: PluginId::new(row.plugin_id),
            enabled: row.enabled,
            custom_public_path: row.custom_public_path,
            settings: row.settings,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "plugin_id, enabled, custom_public_path, settings, created_at, updated_at";

#[async_trait]
impl PluginStateRepository for SqlitePluginStateRepository {
    async fn find(&self, plugin_id: &PluginId) -> EncoreResult<Option<PluginState>> {
        debug!("Finding plugin state: {}", plugin_id);

        let row = sqlx::query_as::<_, PluginStateRow>(&format!(
            "SELECT {COLUMNS} FROM plugin_states WHERE plugin_id = ?"
        ))
        .bind(plugin_id.as_str())
        .fetch_optional(self.pool.inner())
        .await?;

        Ok(row.map(PluginState::from))
    }

    async fn find_all(&self) -> EncoreResult<Vec<PluginState>> {
        let rows = sqlx::query_as::<_, PluginStateRow>(&format!(
            "SELECT {COLUMNS} FROM plugin_states ORDER BY plugin_id"
        ))
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(PluginState::from).collect())
    }

    async fn upsert(&self, plugin_id: &PluginId, changes: PluginStateChanges) -> EncoreResult<PluginState> {
        debug!(plugin_id = %plugin_id, ?changes, "Upserting plugin state");

        let row = sqlx::query_as::<_, PluginStateRow>(&format!(
            r"
            INSERT INTO plugin_states ({COLUMNS})
            VALUES (?1, COALESCE(?2, 0), ?3, ?4, ?5, ?5)
            ON CONFLICT (plugin_id) DO UPDATE SET
                enabled = COALESCE(?2, plugin_states.enabled),
                custom_public_path = COALESCE(?3, plugin_states.custom_public_path),
                settings = COALESCE(?4, plugin_states.settings),
                updated_at = ?5
            RETURNING {COLUMNS}
            "
        ))
        .bind(plugin_id.as_str())
        .bind(changes.enabled)
        .bind(changes.custom_public_path)
        .bind(changes.settings)
        .bind(Utc::now())
        .fetch_one(self.pool.inner())
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, plugin_id: &PluginId) -> EncoreResult<bool> {
        debug!("Deleting plugin state: {}", plugin_id);

        let result = sqlx::query("DELETE FROM plugin_states WHERE plugin_id = ?")
            .bind(plugin_id.as_str())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl std::fmt::Debug for SqlitePluginStateRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlitePluginStateRepository")
            .field("pool", &self.pool)
            .finish()
    }
}
