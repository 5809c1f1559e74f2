//! Main application router.

use crate::{
    controllers::{
        health_controller, page_controller, plugin_admin_controller, plugin_api_controller,
        site_controller,
    },
    middleware::{cors_layer, logging_middleware},
    openapi::ApiDoc,
    state::AppState,
};
use encore_config::{PluginConfig, ServerConfig};
use axum::{extract::DefaultBodyLimit, middleware, routing::get, Json, Router};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use utoipa::OpenApi;

/// Creates the main application router.
///
/// With plugins switched off only health, OpenAPI and the plugin admin API
/// are mounted.
pub fn create_router(state: AppState, server_config: &ServerConfig, plugin_config: &PluginConfig) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .merge(health_controller::router())
        // Plugin administration
        .nest("/api/admin/plugins", plugin_admin_controller::router(state.allow_reload))
        // OpenAPI document
        .route("/api-docs/openapi.json", get(openapi_json));

    if plugin_config.enabled {
        router = router
            .nest("/api/plugins", site_controller::router())
            .nest("/api/p", plugin_api_controller::router())
            .nest("/admin/p", page_controller::admin_router())
            .route("/", get(page_controller::homepage))
            .fallback(page_controller::public_fallback);
    } else {
        warn!("Plugins are disabled; plugin surfaces are not mounted");
    }

    let mut router = router
        .with_state(state)
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new());
    if let Some(cors) = cors_layer(server_config) {
        router = router.layer(cors);
    }
    let router = router
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with plugin admin, API, admin page and public page surfaces");
    router
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
