//! Read-only plugin data for the site shell: navigation, homepage sections
//! and translations.

use super::page_controller::LocaleQuery;
use crate::{
    responses::{ok, ApiResult},
    state::AppState,
};
use encore_plugin_api::Messages;
use encore_plugin_runtime::{AdminNavigationItem, NavigationItem, ResolvedHomepageSection};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};

/// Creates the site data router, nested under `/api/plugins`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/navigation", get(navigation))
        .route("/admin-navigation", get(admin_navigation))
        .route("/homepage-sections", get(homepage_sections))
        .route("/translations/:locale", get(translations))
}

/// Public navigation links of enabled plugins.
#[utoipa::path(
    get,
    path = "/api/plugins/navigation",
    tag = "site",
    params(("locale" = Option<String>, Query, description = "Locale used for navigation names")),
    responses((status = 200, description = "Navigation links"))
)]
pub async fn navigation(
    State(state): State<AppState>,
    Query(query): Query<LocaleQuery>,
) -> ApiResult<Vec<NavigationItem>> {
    ok(state.manager.navigation_items(query.locale.as_deref()).await)
}

/// Admin sidebar entries of enabled plugins.
#[utoipa::path(
    get,
    path = "/api/plugins/admin-navigation",
    tag = "site",
    responses((status = 200, description = "Admin sidebar entries"))
)]
pub async fn admin_navigation(State(state): State<AppState>) -> ApiResult<Vec<AdminNavigationItem>> {
    ok(state.manager.admin_navigation().await)
}

/// Homepage sections in render order.
#[utoipa::path(
    get,
    path = "/api/plugins/homepage-sections",
    tag = "site",
    responses((status = 200, description = "Homepage sections, highest priority first"))
)]
pub async fn homepage_sections(State(state): State<AppState>) -> ApiResult<Vec<ResolvedHomepageSection>> {
    ok(state.manager.homepage_sections().await)
}

/// Merged messages of enabled plugins for one locale.
#[utoipa::path(
    get,
    path = "/api/plugins/translations/{locale}",
    tag = "site",
    params(("locale" = String, Path, description = "Locale code")),
    responses((status = 200, description = "Namespace to messages map"))
)]
pub async fn translations(State(state): State<AppState>, Path(locale): Path<String>) -> ApiResult<Messages> {
    ok(state.manager.translations_for(&locale).await)
}
