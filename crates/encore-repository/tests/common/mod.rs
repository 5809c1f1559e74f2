//! Common test infrastructure for database integration tests.

use encore_config::DatabaseConfig;
use encore_repository::DatabasePool;
use std::sync::Arc;

/// Test database wrapper.
///
/// Each instance owns a private in-memory SQLite database with migrations
/// applied.
pub struct TestDatabase {
    pool: Arc<DatabasePool>,
}

impl TestDatabase {
    pub async fn new() -> Self {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            min_connections: 1,
            max_connections: 1,
            log_queries: true,
            ..DatabaseConfig::default()
        };

        let pool = DatabasePool::new(&config)
            .await
            .expect("Failed to open in-memory database");
        pool.run_migrations()
            .await
            .expect("Failed to run migrations");

        Self {
            pool: Arc::new(pool),
        }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<DatabasePool> {
        Arc::clone(&self.pool)
    }
}
