//! HTML surfaces: admin plugin pages, public plugin pages and the homepage.

use super::plugin_api_controller::parse_query;
use crate::{state::AppState, views};
use encore_core::EncoreError;
use encore_plugin_api::PageProps;
use encore_plugin_runtime::ResolvedPage;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::{error, warn};

/// Creates the admin page router, nested under `/admin/p`.
pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/:plugin_id", get(admin_root))
        .route("/:plugin_id/*path", get(admin_page))
}

#[derive(Debug, Default, Deserialize)]
pub struct LocaleQuery {
    pub locale: Option<String>,
}

async fn admin_root(
    State(state): State<AppState>,
    Path(plugin_id): Path<String>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    render_admin(&state, &plugin_id, "", query).await
}

async fn admin_page(
    State(state): State<AppState>,
    Path((plugin_id, path)): Path<(String, String)>,
    Query(query): Query<BTreeMap<String, String>>,
) -> Response {
    render_admin(&state, &plugin_id, &path, query).await
}

async fn render_admin(
    state: &AppState,
    plugin_id: &str,
    path: &str,
    query: BTreeMap<String, String>,
) -> Response {
    let page = match state.admin_router.resolve(plugin_id, path).await {
        Ok(page) => page,
        Err(e) => return page_error(state, &e),
    };

    match render(&page, query).await {
        Ok(content) => {
            let nav = state.manager.admin_navigation().await;
            Html(views::admin_page(&state.site_name, &nav, &content)).into_response()
        }
        Err(status) => error_page(state, status),
    }
}

/// Public pages are served from the fallback so plugins can own any prefix.
pub async fn public_fallback(State(state): State<AppState>, uri: Uri) -> Response {
    let page = match state.public_router.resolve(uri.path()).await {
        Ok(page) => page,
        Err(e) => return page_error(&state, &e),
    };

    let query = parse_query(uri.query());
    let locale = query.get("locale").cloned();
    match render(&page, query).await {
        Ok(content) => {
            let nav = state.manager.navigation_items(locale.as_deref()).await;
            Html(views::public_page(&state.site_name, &nav, &content)).into_response()
        }
        Err(status) => error_page(&state, status),
    }
}

/// Renders the homepage sections of enabled plugins, highest priority first.
///
/// A section that fails to render is logged and left out.
pub async fn homepage(State(state): State<AppState>, Query(query): Query<LocaleQuery>) -> Response {
    let mut content = String::new();
    for section in state.manager.homepage_sections().await {
        let props = PageProps {
            plugin_id: section.plugin_id.clone(),
            public_path: Some(section.public_path.clone()),
            ..PageProps::default()
        };
        match section.component.render(props).await {
            Ok(html) => content.push_str(&html),
            Err(e) => {
                error!(plugin_id = %section.plugin_id, error = %e, "Homepage section failed to render");
            }
        }
    }

    let nav = state.manager.navigation_items(query.locale.as_deref()).await;
    Html(views::public_page(&state.site_name, &nav, &content)).into_response()
}

async fn render(page: &ResolvedPage, query: BTreeMap<String, String>) -> Result<String, StatusCode> {
    page.component.render(page.props(query)).await.map_err(|e| {
        error!(
            plugin_id = %page.plugin_id,
            component = page.component.name(),
            error = %e,
            "Plugin page failed to render"
        );
        StatusCode::from_u16(e.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    })
}

/// Page surfaces never expose internals: not-enabled gets an explanation,
/// load failures and misses render as not found.
fn page_error(state: &AppState, error: &EncoreError) -> Response {
    match error {
        EncoreError::PluginNotEnabled(plugin_id) => (
            StatusCode::FORBIDDEN,
            Html(views::plugin_not_enabled(&state.site_name, plugin_id)),
        )
            .into_response(),
        EncoreError::ModuleLoadFailure { plugin_id, message } => {
            error!(plugin_id = %plugin_id, error = %message, "Plugin page unavailable, module failed to load");
            error_page(state, StatusCode::NOT_FOUND)
        }
        e if e.is_not_found() => error_page(state, StatusCode::NOT_FOUND),
        e => {
            warn!(error = %e, "Plugin page resolution failed");
            error_page(state, StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

fn error_page(state: &AppState, status: StatusCode) -> Response {
    let body = if status == StatusCode::NOT_FOUND {
        views::not_found(&state.site_name)
    } else {
        views::server_error(&state.site_name)
    };
    (status, Html(body)).into_response()
}
