//! # Encore Plugin Runtime
//!
//! Everything between a compiled-in plugin module and an HTTP request:
//!
//! ```text
//! PluginCatalog ──load──▶ PluginRegistry ◀── PluginStateStore ──▶ PluginStateRepository
//!        ▲                     │                    │
//!   PluginLoader               └──── PluginManager ─┘
//!                                        │
//!                     AdminRouter · PublicRouter · ApiRouter
//! ```

pub mod catalog;
pub mod instance;
pub mod loader;
pub mod manager;
pub mod registry;
pub mod routing;
pub mod state_store;

pub use catalog::{ModuleFactory, PluginCatalog};
pub use instance::{PluginInstance, PluginInstanceView};
pub use loader::{LoadFailure, LoadReport, PluginLoader};
pub use manager::{AdminNavigationItem, NavigationItem, PluginManager, ResolvedHomepageSection};
pub use registry::PluginRegistry;
pub use routing::{AdminRouter, ApiRouter, PublicRouter, ResolvedApiRoute, ResolvedPage};
pub use state_store::PluginStateStore;
