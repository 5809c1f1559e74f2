//! HTTP controllers.

pub mod health_controller;
pub mod page_controller;
pub mod plugin_admin_controller;
pub mod plugin_api_controller;
pub mod site_controller;

pub use health_controller::*;
