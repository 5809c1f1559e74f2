//! SQLite repository implementations.

mod plugin_state_repository;

pub use plugin_state_repository::SqlitePluginStateRepository;
