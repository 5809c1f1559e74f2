//! Plugin API dispatch, admin pages and public pages over HTTP.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{enabled, TestApp};
use encore_config::AppConfig;
use serde_json::{json, Value};

#[tokio::test]
async fn test_api_dispatch_passes_params_and_query() {
    let app = TestApp::new(vec![enabled("concerts")]);

    let (status, body) = app.get_json("/api/p/concerts/42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": "42" }));

    let (status, body) = app.get_json("/api/p/concerts?published=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "published": "true" }));

    let (status, body) = app
        .post_json("/api/p/concerts", json!({ "title": "Spring Gala" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Spring Gala");
}

#[tokio::test]
async fn test_api_failure_statuses() {
    let app = TestApp::new(vec![enabled("concerts"), enabled("broken")]);

    let cases = [
        ("GET", "/api/p/ghost", StatusCode::NOT_FOUND),
        ("GET", "/api/p/photos", StatusCode::FORBIDDEN),
        ("GET", "/api/p/broken", StatusCode::INTERNAL_SERVER_ERROR),
        ("GET", "/api/p/concerts/1/2", StatusCode::NOT_FOUND),
        ("DELETE", "/api/p/concerts/42", StatusCode::METHOD_NOT_ALLOWED),
        ("OPTIONS", "/api/p/concerts/42", StatusCode::METHOD_NOT_ALLOWED),
    ];
    for (method, uri, expected) in cases {
        let (status, body) = app.request(method, uri, None).await;
        assert_eq!(status, expected, "{method} {uri}");
        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_cors_preflight_skips_plugin_dispatch() {
    let app = TestApp::new(vec![enabled("concerts")]);

    let response = app
        .send(
            Request::options("/api/p/concerts/42")
                .header(header::ORIGIN, "https://example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    let response = app
        .send(
            Request::options("/api/p/concerts/42")
                .header(header::ORIGIN, "https://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_options_without_cors() {
    let mut config = AppConfig::default();
    config.server.cors_enabled = false;
    let app = TestApp::with_config(vec![enabled("concerts")], config);

    let (status, _) = app.request("OPTIONS", "/api/p/concerts/42", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_handler_json_error_is_bad_request() {
    let app = TestApp::new(vec![enabled("concerts")]);

    let (status, body) = app.request("POST", "/api/p/concerts", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("error"));
}

#[tokio::test]
async fn test_admin_pages() {
    let app = TestApp::new(vec![enabled("concerts"), enabled("broken")]);

    let (status, html) = app.get("/admin/p/concerts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("data-component=\"ConcertAdminList\""));
    assert!(html.contains("<svg"));

    let (status, html) = app.get("/admin/p/concerts/7").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(">7</div>"));

    let (status, html) = app.get("/admin/p/photos").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(html.contains("Plugin not enabled"));

    let (status, _) = app.get("/admin/p/broken").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/admin/p/concerts/7/edit").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_pages_and_disable() {
    let app = TestApp::new(vec![]);
    app.post_json("/api/admin/plugins", json!({ "action": "enable", "pluginId": "concerts" }))
        .await;

    let (status, html) = app.get("/concerts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("data-component=\"ConcertList\""));

    let (status, html) = app.get("/concerts/42").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("data-component=\"ConcertDetail\">42"));

    let (status, _) = app.get("/concerts/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get("/concerts/42/extra").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.post_json("/api/admin/plugins", json!({ "action": "disable", "pluginId": "concerts" }))
        .await;
    let (status, html) = app.get("/concerts").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Page not found"));
}

#[tokio::test]
async fn test_homepage_orders_sections() {
    let app = TestApp::new(vec![enabled("photos"), enabled("concerts")]);

    let (status, html) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    let concerts = html.find("UpcomingConcerts").unwrap();
    let photos = html.find("LatestAlbums").unwrap();
    assert!(concerts < photos);
}

#[tokio::test]
async fn test_plugins_switched_off() {
    let mut config = AppConfig::default();
    config.plugins.enabled = false;
    let app = TestApp::with_config(vec![enabled("concerts")], config);

    let (status, _) = app.get("/api/p/concerts/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get("/api/admin/plugins").await;
    assert_eq!(status, StatusCode::OK);
}
