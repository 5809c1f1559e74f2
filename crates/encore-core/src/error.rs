//! Unified error types for all layers of the platform.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for Encore.
///
/// Plugin routing failures, state persistence failures and configuration
/// problems all surface through this enum so the REST layer can translate
/// them into a single response shape.
#[derive(Error, Debug)]
pub enum EncoreError {
    // ============ Plugin Errors ============
    /// Enable was requested for a definition that is not in the registry.
    #[error("Plugin \"{0}\" is not registered")]
    PluginNotRegistered(String),

    /// A request addressed a plugin id that nothing knows about.
    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    /// The plugin exists but its persisted state is disabled.
    #[error("Plugin not enabled: {0}")]
    PluginNotEnabled(String),

    /// No declared page or API route matched the remaining path.
    #[error("Route not found: {plugin_id} - /{path}")]
    RouteNotFound { plugin_id: String, path: String },

    /// A route matched but declares no handler for the requested method.
    #[error("Method not allowed: {method} {plugin_id} - /{path}")]
    MethodNotAllowed {
        plugin_id: String,
        path: String,
        method: String,
    },

    /// A plugin module failed while producing its definition.
    #[error("Plugin module failed to load: {plugin_id} - {message}")]
    ModuleLoadFailure { plugin_id: String, message: String },

    /// The state backing store could not be reached.
    #[error("Plugin state store unavailable: {0}")]
    StateStoreUnavailable(String),

    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl EncoreError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::PluginNotRegistered(_) | Self::Validation(_) => 400,
            Self::PluginNotEnabled(_) => 403,
            Self::PluginNotFound(_) | Self::RouteNotFound { .. } | Self::NotFound { .. } => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::StateStoreUnavailable(_) => 503,
            Self::ModuleLoadFailure { .. }
            | Self::Database(_)
            | Self::Configuration(_)
            | Self::Internal(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::PluginNotRegistered(_) => "PLUGIN_NOT_REGISTERED",
            Self::PluginNotFound(_) => "PLUGIN_NOT_FOUND",
            Self::PluginNotEnabled(_) => "PLUGIN_NOT_ENABLED",
            Self::RouteNotFound { .. } => "ROUTE_NOT_FOUND",
            Self::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            Self::ModuleLoadFailure { .. } => "MODULE_LOAD_FAILURE",
            Self::StateStoreUnavailable(_) => "STATE_STORE_UNAVAILABLE",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a route-not-found error for a plugin path.
    #[must_use]
    pub fn route_not_found(plugin_id: impl Into<String>, path: impl Into<String>) -> Self {
        Self::RouteNotFound {
            plugin_id: plugin_id.into(),
            path: path.into(),
        }
    }

    /// Creates a module load failure.
    #[must_use]
    pub fn module_load_failure(plugin_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ModuleLoadFailure {
            plugin_id: plugin_id.into(),
            message: message.into(),
        }
    }

    /// Returns true for the failures a page surface renders as "not found".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PluginNotFound(_) | Self::RouteNotFound { .. } | Self::NotFound { .. }
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for EncoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound {
                resource_type: "database_row",
                id: "unknown".to_string(),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::StateStoreUnavailable(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for EncoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    /// Request trace ID for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from an `EncoreError`.
    #[must_use]
    pub fn from_error(error: &EncoreError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
            trace_id: None,
        }
    }

    /// Sets the trace ID.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&EncoreError> for ErrorResponse {
    fn from(error: &EncoreError) -> Self {
        Self::from_error(error)
    }
}
