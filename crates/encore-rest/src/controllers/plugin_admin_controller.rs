//! Plugin administration: listing, enable/disable, paths, settings, reload.

use crate::{
    extractors::ValidatedJson,
    responses::{ok, ApiResult},
    state::AppState,
};
use encore_core::EncoreError;
use encore_plugin_runtime::{LoadReport, PluginInstanceView};
use encore_repository::PluginState;
use axum::{extract::State, routing::{get, post}, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use utoipa::ToSchema;
use validator::Validate;

/// Creates the plugin admin router.
///
/// The reload endpoint is only mounted when `allow_reload` is set.
pub fn router(allow_reload: bool) -> Router<AppState> {
    let router = Router::new().route("/", get(list_plugins).post(plugin_action));
    if allow_reload {
        router.route("/reload", post(reload_plugins))
    } else {
        router
    }
}

/// Admin action discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum PluginAction {
    Enable,
    Disable,
    UpdatePath,
    UpdateSettings,
}

/// Body of `POST /api/admin/plugins`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PluginActionRequest {
    pub action: PluginAction,
    #[validate(
        required(message = "pluginId is required"),
        length(min = 1, message = "pluginId is required")
    )]
    pub plugin_id: Option<String>,
    #[validate(length(min = 1, message = "customPublicPath must not be empty"))]
    pub custom_public_path: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub settings: Option<Value>,
}

/// Updated state plus the full plugin list.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PluginActionResponse {
    #[schema(value_type = Object)]
    pub plugin_state: PluginState,
    #[schema(value_type = Vec<Object>)]
    pub plugins: Vec<PluginInstanceView>,
}

/// Lists every registered plugin with its state.
#[utoipa::path(
    get,
    path = "/api/admin/plugins",
    tag = "plugins",
    responses(
        (status = 200, description = "All registered plugins, components stripped")
    )
)]
pub async fn list_plugins(State(state): State<AppState>) -> ApiResult<Vec<PluginInstanceView>> {
    debug!("List plugins request");
    ok(plugin_views(&state).await)
}

/// Applies one admin action to a plugin.
#[utoipa::path(
    post,
    path = "/api/admin/plugins",
    tag = "plugins",
    request_body = PluginActionRequest,
    responses(
        (status = 200, description = "Action applied", body = PluginActionResponse),
        (status = 400, description = "Missing or invalid fields, or plugin not registered"),
        (status = 404, description = "No state record for updatePath")
    )
)]
pub async fn plugin_action(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PluginActionRequest>,
) -> ApiResult<PluginActionResponse> {
    let plugin_id = request.plugin_id.unwrap_or_default();
    debug!(plugin_id = %plugin_id, action = ?request.action, "Plugin action request");

    state.manager.loader().ensure_loaded().await;
    let store = state.manager.state_store();

    let plugin_state = match request.action {
        PluginAction::Enable => store.enable(&plugin_id, request.custom_public_path).await?,
        PluginAction::Disable => store.disable(&plugin_id).await?,
        PluginAction::UpdatePath => {
            let path = request
                .custom_public_path
                .ok_or_else(|| EncoreError::validation("customPublicPath is required for updatePath"))?;
            store.update_public_path(&plugin_id, &path).await?
        }
        PluginAction::UpdateSettings => {
            let settings = request
                .settings
                .ok_or_else(|| EncoreError::validation("settings is required for updateSettings"))?;
            store.update_settings(&plugin_id, &settings).await?
        }
    };

    ok(PluginActionResponse {
        plugin_state,
        plugins: plugin_views(&state).await,
    })
}

/// Clears the registry and loads every module again.
#[utoipa::path(
    post,
    path = "/api/admin/plugins/reload",
    tag = "plugins",
    responses(
        (status = 200, description = "Reload report"),
        (status = 404, description = "Reload is disabled by configuration")
    )
)]
pub async fn reload_plugins(State(state): State<AppState>) -> ApiResult<LoadReport> {
    info!("Plugin reload requested");
    ok(state.manager.loader().reload().await)
}

async fn plugin_views(state: &AppState) -> Vec<PluginInstanceView> {
    state
        .manager
        .all_instances()
        .await
        .iter()
        .map(|instance| instance.view())
        .collect()
}
