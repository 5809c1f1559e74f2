//! Shared fixtures for runtime integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use encore_config::PluginConfig;
use encore_core::{EncoreError, EncoreResult, PluginId};
use encore_plugin_api::{
    ApiRoute, Component, HttpResponse, PageProps, PluginDefinition, PluginError, PluginResult,
};
use encore_plugin_runtime::{PluginCatalog, PluginLoader, PluginManager, PluginRegistry, PluginStateStore};
use encore_repository::{
    InMemoryPluginStateRepository, PluginState, PluginStateChanges, PluginStateRepository,
};
use serde_json::json;
use std::sync::Arc;

pub fn page(name: &'static str) -> Component {
    Component::new(name, move |props: PageProps| async move {
        PluginResult::Ok(format!("{name}:{:?}", props.params))
    })
}

pub fn concerts() -> PluginDefinition {
    PluginDefinition::new("concerts", "Concerts", "Upcoming concerts", "1.0.0")
        .default_public_path("/concerts")
        .admin_page("", page("ConcertList"))
        .admin_page("new", page("ConcertNew"))
        .admin_page("[id]", page("ConcertEdit"))
        .public_page("", page("X"))
        .public_page("[id]", page("Y"))
        .api_route(
            ApiRoute::new("")
                .get(|_, _| async { HttpResponse::json(200, &json!([])) })
                .post(|req, _| async move {
                    let body: serde_json::Value = req.json()?;
                    HttpResponse::json(201, &body)
                }),
        )
        .api_route(
            ApiRoute::new("[id]")
                .get(|_, params| async move { HttpResponse::json(200, &json!({ "id": params["id"] })) })
                .delete(|_, params| async move {
                    Err::<HttpResponse, _>(PluginError::not_found(format!("Concert {} not found", params["id"])))
                }),
        )
}

pub fn photos() -> PluginDefinition {
    PluginDefinition::new("photos", "Photo Albums", "Albums", "1.0.0")
        .default_public_path("/photos")
        .public_page("", page("Gallery"))
        .public_page("[slug]", page("Album"))
}

pub fn archive() -> PluginDefinition {
    PluginDefinition::new("archive", "Concert Archive", "Past concerts", "1.0.0")
        .default_public_path("/concerts/archive")
        .public_page("", page("Archive"))
}

pub fn catalog() -> PluginCatalog {
    PluginCatalog::new()
        .module("concerts", || async { Ok(concerts()) })
        .module("photos", || async { Ok(photos()) })
        .module("archive", || async { Ok(archive()) })
        .module("broken", || async {
            Err::<PluginDefinition, _>(PluginError::Load("failed to import module".into()))
        })
}

pub struct Harness {
    pub manager: Arc<PluginManager>,
    pub repository: Arc<InMemoryPluginStateRepository>,
    pub registry: Arc<PluginRegistry>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_states(Vec::new())
    }

    pub fn with_states(states: Vec<PluginState>) -> Self {
        Self::with_config(states, &PluginConfig::default())
    }

    pub fn with_config(states: Vec<PluginState>, config: &PluginConfig) -> Self {
        let repository = Arc::new(InMemoryPluginStateRepository::with_states(states));
        let registry = Arc::new(PluginRegistry::new());
        let loader = Arc::new(PluginLoader::new(catalog(), registry.clone()).with_config(config));
        let state_store = PluginStateStore::new(repository.clone(), registry.clone());
        Self {
            manager: Arc::new(PluginManager::new(loader, state_store)),
            repository,
            registry,
        }
    }

    pub fn store(&self) -> &PluginStateStore {
        self.manager.state_store()
    }

    pub async fn enable(&self, plugin_id: &str) {
        self.manager.loader().ensure_loaded().await;
        self.store().enable(plugin_id, None).await.unwrap();
    }
}

pub fn enabled_state(plugin_id: &str) -> PluginState {
    let mut state = PluginState::new(PluginId::new(plugin_id));
    state.enabled = true;
    state
}

/// Repository whose every call fails as if the database were down.
#[derive(Debug, Default)]
pub struct UnavailableRepository;

fn unavailable() -> EncoreError {
    EncoreError::StateStoreUnavailable("connection refused".into())
}

#[async_trait]
impl PluginStateRepository for UnavailableRepository {
    async fn find(&self, _plugin_id: &PluginId) -> EncoreResult<Option<PluginState>> {
        Err(unavailable())
    }

    async fn find_all(&self) -> EncoreResult<Vec<PluginState>> {
        Err(unavailable())
    }

    async fn upsert(&self, _plugin_id: &PluginId, _changes: PluginStateChanges) -> EncoreResult<PluginState> {
        Err(unavailable())
    }

    async fn delete(&self, _plugin_id: &PluginId) -> EncoreResult<bool> {
        Err(unavailable())
    }
}
