//! Integration tests for SqlitePluginStateRepository.

mod common;

use common::TestDatabase;
use encore_core::{HealthCheck, PluginId};
use encore_repository::{PluginStateChanges, PluginStateRepository, SqlitePluginStateRepository};

#[tokio::test]
async fn test_find_missing_state() {
    let db = TestDatabase::new().await;
    let repo = SqlitePluginStateRepository::new(db.pool());

    let result = repo
        .find(&PluginId::new("concerts"))
        .await
        .expect("Query failed");
    assert!(result.is_none());
}

#[tokio::test]
async fn test_enable_upsert_creates_record() {
    let db = TestDatabase::new().await;
    let repo = SqlitePluginStateRepository::new(db.pool());
    let id = PluginId::new("concerts");

    let state = repo
        .upsert(&id, PluginStateChanges::enable(Some("/concerts".into())))
        .await
        .expect("Failed to upsert");
    assert_eq!(state.plugin_id, id);
    assert!(state.enabled);
    assert_eq!(state.custom_public_path.as_deref(), Some("/concerts"));
    assert!(state.settings.is_none());

    let found = repo
        .find(&id)
        .await
        .expect("Query failed")
        .expect("State not found");
    assert_eq!(found.enabled, state.enabled);
    assert_eq!(found.custom_public_path, state.custom_public_path);
}

#[tokio::test]
async fn test_disable_unseen_plugin_creates_disabled_record() {
    let db = TestDatabase::new().await;
    let repo = SqlitePluginStateRepository::new(db.pool());
    let id = PluginId::new("ghost");

    let state = repo
        .upsert(&id, PluginStateChanges::disable())
        .await
        .expect("Failed to upsert");
    assert!(!state.enabled);
    assert!(repo.find(&id).await.expect("Query failed").is_some());
}

#[tokio::test]
async fn test_upsert_keeps_unset_columns() {
    let db = TestDatabase::new().await;
    let repo = SqlitePluginStateRepository::new(db.pool());
    let id = PluginId::new("photos");

    repo.upsert(&id, PluginStateChanges::enable(Some("/gallery".into())))
        .await
        .expect("Failed to enable");
    repo.upsert(&id, PluginStateChanges::settings(r#"{"layout":"grid"}"#))
        .await
        .expect("Failed to update settings");
    let state = repo
        .upsert(&id, PluginStateChanges::disable())
        .await
        .expect("Failed to disable");

    assert!(!state.enabled);
    assert_eq!(state.custom_public_path.as_deref(), Some("/gallery"));
    assert_eq!(state.settings.as_deref(), Some(r#"{"layout":"grid"}"#));
    assert!(state.updated_at >= state.created_at);
}

#[tokio::test]
async fn test_settings_upsert_on_new_record_is_disabled() {
    let db = TestDatabase::new().await;
    let repo = SqlitePluginStateRepository::new(db.pool());

    let state = repo
        .upsert(&PluginId::new("photos"), PluginStateChanges::settings("{}"))
        .await
        .expect("Failed to upsert");
    assert!(!state.enabled);
    assert_eq!(state.settings.as_deref(), Some("{}"));
}

#[tokio::test]
async fn test_find_all_ordered_by_plugin_id() {
    let db = TestDatabase::new().await;
    let repo = SqlitePluginStateRepository::new(db.pool());

    for id in ["photos", "concerts", "news"] {
        repo.upsert(&PluginId::new(id), PluginStateChanges::disable())
            .await
            .expect("Failed to upsert");
    }

    let ids: Vec<String> = repo
        .find_all()
        .await
        .expect("Query failed")
        .into_iter()
        .map(|s| s.plugin_id.to_string())
        .collect();
    assert_eq!(ids, vec!["concerts", "news", "photos"]);
}

#[tokio::test]
async fn test_delete() {
    let db = TestDatabase::new().await;
    let repo = SqlitePluginStateRepository::new(db.pool());
    let id = PluginId::new("concerts");

    repo.upsert(&id, PluginStateChanges::enable(None))
        .await
        .expect("Failed to upsert");

    assert!(repo.delete(&id).await.expect("Delete failed"));
    assert!(!repo.delete(&id).await.expect("Delete failed"));
    assert!(repo.find(&id).await.expect("Query failed").is_none());
}

#[tokio::test]
async fn test_pool_health_check() {
    let db = TestDatabase::new().await;
    let pool = db.pool();

    assert!(pool.check().await.is_healthy());

    pool.close().await;
    assert!(pool.check().await.is_unhealthy());
}

#[tokio::test]
async fn test_closed_pool_surfaces_unavailable() {
    let db = TestDatabase::new().await;
    let pool = db.pool();
    let repo = SqlitePluginStateRepository::new(pool.clone());

    pool.close().await;
    let err = repo
        .find_all()
        .await
        .expect_err("closed pool should fail");
    assert_eq!(err.status_code(), 503);
}
