//! End-to-end resolution across the admin, public and API surfaces.

mod common;

use common::{enabled_state, Harness};
use encore_config::PluginConfig;
use encore_core::EncoreError;
use encore_plugin_api::{ApiRequest, HttpMethod};
use encore_plugin_runtime::{AdminRouter, ApiRouter, PublicRouter};
use std::collections::BTreeMap;

#[tokio::test]
async fn test_public_concerts_scenario() {
    let harness = Harness::with_states(vec![enabled_state("concerts")]);
    let router = PublicRouter::new(harness.manager.clone());

    let index = router.resolve("/concerts").await.unwrap();
    assert_eq!(index.component.name(), "X");
    assert!(index.params.is_empty());
    assert_eq!(index.public_path.as_deref(), Some("/concerts"));

    let detail = router.resolve("/concerts/42").await.unwrap();
    assert_eq!(detail.component.name(), "Y");
    assert_eq!(detail.params["id"], "42");

    let err = router.resolve("/concerts/42/extra").await.unwrap_err();
    assert!(matches!(err, EncoreError::RouteNotFound { .. }));
}

#[tokio::test]
async fn test_public_prefix_is_segment_based() {
    let harness = Harness::with_states(vec![enabled_state("concerts")]);
    let router = PublicRouter::new(harness.manager.clone());

    assert!(router.resolve("/concertsx").await.unwrap_err().is_not_found());
    assert!(router.resolve("/").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_public_longest_prefix_wins() {
    let harness = Harness::with_states(vec![enabled_state("concerts"), enabled_state("archive")]);
    let router = PublicRouter::new(harness.manager.clone());

    let page = router.resolve("/concerts/archive").await.unwrap();
    assert_eq!(page.plugin_id, "archive");
    assert_eq!(page.component.name(), "Archive");

    let page = router.resolve("/concerts/7").await.unwrap();
    assert_eq!(page.plugin_id, "concerts");
}

#[tokio::test]
async fn test_public_custom_path() {
    let harness = Harness::new();
    harness.manager.loader().ensure_loaded().await;
    harness.store().enable("photos", Some("/gallery".into())).await.unwrap();
    let router = PublicRouter::new(harness.manager.clone());

    let page = router.resolve("/gallery/summer-2024").await.unwrap();
    assert_eq!(page.component.name(), "Album");
    assert_eq!(page.params["slug"], "summer-2024");
    assert!(router.resolve("/photos").await.is_err());
}

#[tokio::test]
async fn test_disabling_stops_public_serving() {
    let harness = Harness::new();
    harness.enable("concerts").await;
    let router = PublicRouter::new(harness.manager.clone());
    assert!(router.resolve("/concerts").await.is_ok());

    harness.store().disable("concerts").await.unwrap();

    assert!(router.resolve("/concerts").await.unwrap_err().is_not_found());
    assert!(harness.registry.contains("concerts"));
}

#[tokio::test]
async fn test_admin_resolution() {
    let harness = Harness::with_states(vec![enabled_state("concerts")]);
    let router = AdminRouter::new(harness.manager.clone());

    assert_eq!(router.resolve("concerts", "").await.unwrap().component.name(), "ConcertList");
    assert_eq!(router.resolve("concerts", "new").await.unwrap().component.name(), "ConcertNew");

    let edit = router.resolve("concerts", "/17/").await.unwrap();
    assert_eq!(edit.component.name(), "ConcertEdit");
    assert_eq!(edit.params["id"], "17");
    assert_eq!(edit.public_path, None);

    let props = edit.props(BTreeMap::new());
    assert_eq!(props.param("id"), Some("17"));
}

#[tokio::test]
async fn test_admin_failure_taxonomy() {
    let harness = Harness::with_states(vec![enabled_state("concerts"), enabled_state("broken")]);
    let router = AdminRouter::new(harness.manager.clone());

    assert!(matches!(
        router.resolve("ghost", "").await.unwrap_err(),
        EncoreError::PluginNotFound(_)
    ));
    assert!(matches!(
        router.resolve("photos", "").await.unwrap_err(),
        EncoreError::PluginNotEnabled(_)
    ));
    assert!(matches!(
        router.resolve("broken", "").await.unwrap_err(),
        EncoreError::ModuleLoadFailure { message, .. } if message.contains("failed to import module")
    ));
    assert!(matches!(
        router.resolve("concerts", "1/2").await.unwrap_err(),
        EncoreError::RouteNotFound { path, .. } if path == "1/2"
    ));
}

#[tokio::test]
async fn test_api_dispatch() {
    let harness = Harness::with_states(vec![enabled_state("concerts")]);
    let router = ApiRouter::new(harness.manager.clone());

    let route = router.resolve("concerts", "GET", "42").await.unwrap();
    assert_eq!(route.pattern, "[id]");
    assert_eq!(route.public_path.as_deref(), Some("/concerts"));
    let response = route.dispatch(ApiRequest::new(HttpMethod::Get, "42")).await;
    assert_eq!(response.status, 200);
    assert_eq!(String::from_utf8(response.body).unwrap(), r#"{"id":"42"}"#);

    let route = router.resolve("concerts", "DELETE", "9").await.unwrap();
    let response = route.dispatch(ApiRequest::new(HttpMethod::Delete, "9")).await;
    assert_eq!(response.status, 404);

    let route = router.resolve("concerts", "POST", "").await.unwrap();
    let response = route
        .dispatch(ApiRequest::new(HttpMethod::Post, "").with_body(br#"{"title":"Gig"}"#.to_vec()))
        .await;
    assert_eq!(response.status, 201);
}

#[tokio::test]
async fn test_api_failure_statuses() {
    let harness = Harness::with_states(vec![enabled_state("concerts"), enabled_state("broken")]);
    let router = ApiRouter::new(harness.manager.clone());

    let status = |e: EncoreError| e.status_code();
    assert_eq!(status(router.resolve("ghost", "GET", "").await.unwrap_err()), 404);
    assert_eq!(status(router.resolve("photos", "GET", "").await.unwrap_err()), 403);
    assert_eq!(status(router.resolve("broken", "GET", "").await.unwrap_err()), 500);
    assert_eq!(status(router.resolve("concerts", "GET", "1/2/3").await.unwrap_err()), 404);
    assert_eq!(status(router.resolve("concerts", "PUT", "42").await.unwrap_err()), 405);
    assert_eq!(status(router.resolve("concerts", "OPTIONS", "42").await.unwrap_err()), 405);
}

#[tokio::test]
async fn test_configured_off_module_is_not_found() {
    let config = PluginConfig {
        disabled_modules: vec!["photos".to_string()],
        ..PluginConfig::default()
    };
    let harness = Harness::with_config(vec![enabled_state("concerts"), enabled_state("photos")], &config);

    let admin = AdminRouter::new(harness.manager.clone());
    assert!(matches!(
        admin.resolve("photos", "").await.unwrap_err(),
        EncoreError::PluginNotFound(id) if id == "photos"
    ));

    let api = ApiRouter::new(harness.manager.clone());
    assert_eq!(api.resolve("photos", "GET", "").await.unwrap_err().status_code(), 404);
    assert!(api.resolve("concerts", "GET", "").await.is_ok());
}
