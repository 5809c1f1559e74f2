//! Error types for plugin authors.

use crate::http::HttpResponse;
use thiserror::Error;

/// Errors raised by plugin code: module factories, lifecycle hooks,
/// API handlers and page renderers.
#[derive(Error, Debug)]
pub enum PluginError {
    /// The module could not produce its definition.
    #[error("Load error: {0}")]
    Load(String),

    /// A lifecycle hook failed.
    #[error("Hook failed: {0}")]
    Hook(String),

    /// A page or section failed to render.
    #[error("Render error: {0}")]
    Render(String),

    /// A record addressed by a handler does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request was rejected; the message is shown to the client as is.
    #[error("{0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Custom error with message
    #[error("{0}")]
    Custom(String),
}

impl PluginError {
    /// Create a custom error with a message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// HTTP status used when a handler error becomes a response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) | Self::Json(_) => 400,
            _ => 500,
        }
    }

    /// Converts the error into a JSON `{"error": ...}` response.
    #[must_use]
    pub fn into_response(self) -> HttpResponse {
        HttpResponse::error(self.status(), self.to_string())
    }
}

/// Result alias for plugin code.
pub type PluginResult<T> = Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(PluginError::custom("boom").to_string(), "boom");
        assert_eq!(
            PluginError::Hook("seed failed".into()).to_string(),
            "Hook failed: seed failed"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(PluginError::not_found("Concert not found").status(), 404);
        assert_eq!(PluginError::invalid_input("title").status(), 400);
        assert_eq!(PluginError::Render("x".into()).status(), 500);
    }

    #[test]
    fn test_invalid_input_body_is_bare_message() {
        let response = PluginError::invalid_input("Album ID required").into_response();
        assert_eq!(response.status, 400);
        assert_eq!(
            String::from_utf8(response.body).unwrap(),
            r#"{"error":"Album ID required"}"#
        );
    }

    #[test]
    fn test_json_error_is_bad_request() {
        let err: PluginError = serde_json::from_slice::<serde_json::Value>(b"{")
            .unwrap_err()
            .into();
        let response = err.into_response();
        assert_eq!(response.status, 400);
        assert_eq!(response.content_type, "application/json");
    }
}
