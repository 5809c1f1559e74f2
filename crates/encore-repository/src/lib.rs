//! # Encore Repository
//!
//! Persistence for plugin state.
//!
//! ```text
//! PluginStateStore (encore-plugin-runtime)
//!   ↓  Arc<dyn PluginStateRepository>
//! SqlitePluginStateRepository | InMemoryPluginStateRepository
//!   ↓
//! SQLite (plugin_states table)
//! ```
//!
//! The repository knows nothing about plugin definitions: records are keyed
//! by plugin id and may exist for plugins that are not compiled in.

pub mod memory;
pub mod model;
pub mod pool;
pub mod sqlite;
pub mod traits;

pub use memory::InMemoryPluginStateRepository;
pub use model::*;
pub use pool::*;
pub use sqlite::SqlitePluginStateRepository;
pub use traits::*;
