//! OpenAPI documentation for the platform endpoints.
//!
//! Plugin-provided endpoints under `/api/p/{plugin_id}` are declared by the
//! plugins at runtime and are not part of this document.

use crate::controllers::{
    health_controller::{ComponentHealth, HealthResponse},
    plugin_admin_controller::{PluginAction, PluginActionRequest, PluginActionResponse},
};
use encore_core::{ErrorResponse, FieldError};
use utoipa::OpenApi;

/// OpenAPI documentation for the Encore API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Encore API",
        version = "1.0.0",
        description = "Plugin administration and site endpoints of the Encore CMS",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    paths(
        // Plugin administration
        crate::controllers::plugin_admin_controller::list_plugins,
        crate::controllers::plugin_admin_controller::plugin_action,
        crate::controllers::plugin_admin_controller::reload_plugins,
        // Site data
        crate::controllers::site_controller::navigation,
        crate::controllers::site_controller::admin_navigation,
        crate::controllers::site_controller::homepage_sections,
        crate::controllers::site_controller::translations,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            ErrorResponse,
            FieldError,
            PluginAction,
            PluginActionRequest,
            PluginActionResponse,
            HealthResponse,
            ComponentHealth,
        )
    ),
    tags(
        (name = "plugins", description = "Plugin administration"),
        (name = "site", description = "Plugin data for the site shell"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
