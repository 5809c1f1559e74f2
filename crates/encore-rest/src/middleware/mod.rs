//! HTTP middleware.

mod cors;
mod logging;

pub use cors::{cors_layer, PreflightCors, PreflightCorsLayer};
pub use logging::logging_middleware;
