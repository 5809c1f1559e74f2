//! Dispatch of `/api/p/{plugin_id}/{..}` to plugin API handlers.

use crate::{
    responses::{plugin_response, AppError},
    state::AppState,
};
use encore_core::EncoreError;
use encore_plugin_api::{ApiRequest, HttpMethod};
use axum::{
    extract::{Path, Request, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::collections::BTreeMap;
use tracing::debug;

/// Creates the plugin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:plugin_id", any(plugin_api_root))
        .route("/:plugin_id/*path", any(plugin_api))
}

async fn plugin_api_root(
    State(state): State<AppState>,
    Path(plugin_id): Path<String>,
    request: Request,
) -> Response {
    dispatch(&state, &plugin_id, "", request).await
}

async fn plugin_api(
    State(state): State<AppState>,
    Path((plugin_id, path)): Path<(String, String)>,
    request: Request,
) -> Response {
    dispatch(&state, &plugin_id, &path, request).await
}

async fn dispatch(state: &AppState, plugin_id: &str, path: &str, request: Request) -> Response {
    match try_dispatch(state, plugin_id, path, request).await {
        Ok(response) => response,
        Err(e) => AppError(e).into_response(),
    }
}

async fn try_dispatch(
    state: &AppState,
    plugin_id: &str,
    path: &str,
    request: Request,
) -> Result<Response, EncoreError> {
    let method = request.method().as_str().to_string();
    let route = state.api_router.resolve(plugin_id, &method, path).await?;

    // Resolution succeeded, so the verb is one the plugin declared.
    let method: HttpMethod = method
        .parse()
        .map_err(|_| EncoreError::internal("resolved route with unsupported method"))?;
    let query = parse_query(request.uri().query());
    let headers = extract_headers(request.headers());

    let body = axum::body::to_bytes(request.into_body(), state.max_body_size)
        .await
        .map_err(|e| EncoreError::validation(format!("Failed to read request body: {e}")))?;

    debug!(plugin_id = %plugin_id, method = %method, path = %path, pattern = %route.pattern, "Dispatching plugin API request");

    let api_request = ApiRequest {
        method,
        path: path.to_string(),
        query,
        headers,
        body: body.to_vec(),
    };
    Ok(plugin_response(route.dispatch(api_request).await))
}

pub(crate) fn parse_query(query: Option<&str>) -> BTreeMap<String, String> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn extract_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|val| (k.as_str().to_string(), val.to_string())))
        .collect()
}
