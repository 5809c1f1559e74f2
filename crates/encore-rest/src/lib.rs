//! # Encore REST
//!
//! HTTP surfaces of the plugin platform:
//!
//! - `/api/admin/plugins`: list plugins and apply enable/disable/path/settings actions
//! - `/api/p/{plugin_id}/{..}`: plugin API handlers
//! - `/admin/p/{plugin_id}/{..}`: plugin admin pages
//! - `/api/plugins/*`: navigation, homepage sections and translations
//! - `/`: homepage sections; any other path falls through to public plugin pages

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;
pub mod views;

pub use router::*;
pub use state::*;
