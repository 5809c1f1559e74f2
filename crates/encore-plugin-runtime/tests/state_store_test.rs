//! Plugin state behaviour through the manager.

mod common;

use common::{catalog, enabled_state, Harness, UnavailableRepository};
use encore_core::EncoreError;
use encore_plugin_runtime::{PluginLoader, PluginManager, PluginRegistry, PluginStateStore, PublicRouter};
use std::sync::Arc;

#[tokio::test]
async fn test_register_is_idempotent() {
    let harness = Harness::new();
    harness.manager.loader().ensure_loaded().await;
    let before = harness.registry.get_all().len();

    let mut replacement = common::concerts();
    replacement.name = "Replacement".into();
    assert!(!harness.registry.register(replacement));

    assert_eq!(harness.registry.get_all().len(), before);
    assert_eq!(harness.registry.get("concerts").unwrap().name, "Concerts");
}

#[tokio::test]
async fn test_enable_unregistered_does_not_mutate() {
    let harness = Harness::new();
    harness.manager.loader().ensure_loaded().await;

    let err = harness.store().enable("broken", None).await.unwrap_err();

    assert!(matches!(err, EncoreError::PluginNotRegistered(_)));
    assert!(harness.store().get_all_states().await.is_empty());
}

#[tokio::test]
async fn test_disable_unseen_creates_record() {
    let harness = Harness::new();

    let state = harness.store().disable("never-seen").await.unwrap();

    assert!(!state.enabled);
    assert_eq!(harness.store().get_all_states().await.len(), 1);
}

#[tokio::test]
async fn test_all_instances_default_disabled() {
    let harness = Harness::with_states(vec![enabled_state("photos")]);

    let views: Vec<_> = harness
        .manager
        .all_instances()
        .await
        .iter()
        .map(|i| (i.id().to_string(), i.view().enabled))
        .collect();

    assert_eq!(
        views,
        vec![
            ("concerts".to_string(), false),
            ("photos".to_string(), true),
            ("archive".to_string(), false),
        ]
    );
}

#[tokio::test]
async fn test_unavailable_store_degrades_reads() {
    let registry = Arc::new(PluginRegistry::new());
    let loader = Arc::new(PluginLoader::new(catalog(), registry.clone()));
    let store = PluginStateStore::new(Arc::new(UnavailableRepository), registry);
    let manager = Arc::new(PluginManager::new(loader, store));

    assert!(manager.state_store().get_state("concerts").await.is_none());
    assert!(manager.state_store().get_all_states().await.is_empty());
    assert!(manager.enabled_instances().await.is_empty());
    assert_eq!(manager.all_instances().await.len(), 3);

    let err = PublicRouter::new(manager.clone()).resolve("/concerts").await.unwrap_err();
    assert!(err.is_not_found());

    let err = manager.state_store().disable("concerts").await.unwrap_err();
    assert_eq!(err.status_code(), 503);
}
