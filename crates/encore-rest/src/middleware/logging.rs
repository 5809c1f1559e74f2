//! Request logging middleware.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Logs method, path, status and latency of every request.
///
/// Plugin surfaces additionally carry the plugin id in the path, so the
/// `/api/p/{plugin_id}` and `/admin/p/{plugin_id}` prefixes are logged as a
/// separate field.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let plugin_id = plugin_id_from_path(&path).map(str::to_string);
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_server_error() {
        warn!(
            target: "http",
            method = %method,
            path = %path,
            plugin_id = plugin_id.as_deref(),
            status = status.as_u16(),
            duration_ms = duration.as_millis(),
            "HTTP request failed"
        );
    } else {
        info!(
            target: "http",
            method = %method,
            path = %path,
            plugin_id = plugin_id.as_deref(),
            status = status.as_u16(),
            duration_ms = duration.as_millis(),
            "HTTP request completed"
        );
    }

    response
}

fn plugin_id_from_path(path: &str) -> Option<&str> {
    let rest = path
        .strip_prefix("/api/p/")
        .or_else(|| path.strip_prefix("/admin/p/"))?;
    rest.split('/').next().filter(|id| !id.is_empty())
}
