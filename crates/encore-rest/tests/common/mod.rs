//! Test application wiring for REST integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use encore_config::AppConfig;
use encore_plugin_api::{
    ApiRoute, Component, HttpResponse, Icon, NavigationEntry, PageProps, PluginDefinition, PluginError,
    PluginResult,
};
use encore_plugin_runtime::{PluginCatalog, PluginLoader, PluginManager, PluginRegistry, PluginStateStore};
use encore_repository::{InMemoryPluginStateRepository, PluginState};
use encore_rest::{create_router, AppState};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const ICON: Icon = Icon::new("music", "<svg viewBox=\"0 0 24 24\"></svg>");

fn component(name: &'static str) -> Component {
    Component::new(name, move |props: PageProps| async move {
        if props.param("id") == Some("missing") {
            return Err(PluginError::not_found("no such concert"));
        }
        PluginResult::Ok(format!("<div data-component=\"{name}\">{}</div>", props.param("id").unwrap_or("")))
    })
}

fn concerts() -> PluginDefinition {
    PluginDefinition::new("concerts", "Concerts", "Upcoming concerts", "1.0.0")
        .default_public_path("/concerts")
        .admin_navigation(NavigationEntry::new("Concerts", "/admin/p/concerts", ICON))
        .admin_page("", component("ConcertAdminList"))
        .admin_page("[id]", component("ConcertAdminEdit"))
        .public_page("", component("ConcertList"))
        .public_page("[id]", component("ConcertDetail"))
        .homepage_section(10, component("UpcomingConcerts"))
        .translations("nl", json!({ "concerts": { "navName": "Concerten" } }).as_object().cloned().unwrap_or_default())
        .api_route(
            ApiRoute::new("")
                .get(|req, _| async move {
                    HttpResponse::json(200, &json!({ "published": req.query_param("published") }))
                })
                .post(|req, _| async move {
                    let body: Value = req.json()?;
                    HttpResponse::json(201, &body)
                }),
        )
        .api_route(ApiRoute::new("[id]").get(|_, params| async move {
            HttpResponse::json(200, &json!({ "id": params["id"] }))
        }))
}

fn photos() -> PluginDefinition {
    PluginDefinition::new("photos", "Photo Albums", "Albums", "1.0.0")
        .default_public_path("/photos")
        .public_page("", component("Gallery"))
        .homepage_section(5, component("LatestAlbums"))
}

pub fn catalog() -> PluginCatalog {
    PluginCatalog::new()
        .module("concerts", || async { Ok(concerts()) })
        .module("photos", || async { Ok(photos()) })
        .module("broken", || async {
            Err::<PluginDefinition, _>(PluginError::Load("bad module".into()))
        })
}

pub struct TestApp {
    pub router: Router,
    pub manager: Arc<PluginManager>,
}

impl TestApp {
    pub fn new(states: Vec<PluginState>) -> Self {
        Self::with_config(states, AppConfig::default())
    }

    pub fn with_config(states: Vec<PluginState>, config: AppConfig) -> Self {
        let repository = Arc::new(InMemoryPluginStateRepository::with_states(states));
        let registry = Arc::new(PluginRegistry::new());
        let loader = Arc::new(PluginLoader::new(catalog(), registry.clone()));
        let manager = Arc::new(PluginManager::new(
            loader.clone(),
            PluginStateStore::new(repository, registry),
        ));
        let state = AppState::new(manager.clone(), &config).with_health_check(loader);
        Self {
            router: create_router(state, &config.server, &config.plugins),
            manager,
        }
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, String) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    pub async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        self.request("GET", uri, None).await
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let (status, body) = self.request("POST", uri, Some(body)).await;
        (status, serde_json::from_str(&body).unwrap())
    }
}

pub fn enabled(plugin_id: &str) -> PluginState {
    let mut state = PluginState::new(encore_core::PluginId::new(plugin_id));
    state.enabled = true;
    state
}
