//! Database connection pool management.

use async_trait::async_trait;
use encore_config::DatabaseConfig;
use encore_core::{EncoreError, EncoreResult, HealthCheck, HealthStatus};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::ConnectOptions;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// SQLite pool wrapper.
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Creates a new database pool from configuration.
    ///
    /// # Errors
    ///
    /// Returns a database error if the URL is invalid or no connection can
    /// be established.
    pub async fn new(config: &DatabaseConfig) -> EncoreResult<Self> {
        info!("Connecting to SQLite database...");

        let mut options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| EncoreError::Database(format!("Invalid database URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);
        if !config.log_queries {
            options = options.disable_statement_logging();
        }

        let mut pool_options = SqlitePoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout());

        // Every connection to an in-memory database is a separate database,
        // so the pool must never recycle its connection.
        if config.url.contains(":memory:") {
            pool_options = pool_options
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        } else {
            pool_options = pool_options.idle_timeout(Some(config.idle_timeout()));
        }

        let pool = pool_options.connect_with(options).await.map_err(|e| {
            warn!("Failed to connect to database: {}", e);
            EncoreError::Database(format!("Failed to connect: {e}"))
        })?;

        info!("SQLite connection pool established");
        Ok(Self { pool })
    }

    /// Returns a reference to the underlying pool.
    #[must_use]
    pub fn inner(&self) -> &SqlitePool {
        &self.pool
    }

    /// Checks if the database connection is healthy.
    ///
    /// # Errors
    ///
    /// Returns [`EncoreError::StateStoreUnavailable`] if the probe fails.
    pub async fn ping(&self) -> EncoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| EncoreError::StateStoreUnavailable(format!("Health check failed: {e}")))?;
        Ok(())
    }

    /// Runs database migrations.
    ///
    /// # Errors
    ///
    /// Returns a database error if a migration fails.
    pub async fn run_migrations(&self) -> EncoreResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| EncoreError::Database(format!("Migration failed: {e}")))?;
        info!("Database migrations completed");
        Ok(())
    }

    /// Closes the database pool.
    pub async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

#[async_trait]
impl HealthCheck for DatabasePool {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        match self.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

impl std::ops::Deref for DatabasePool {
    type Target = SqlitePool;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

/// Creates a shared database pool, running migrations when configured.
///
/// # Errors
///
/// Propagates connection and migration failures.
pub async fn create_pool(config: &DatabaseConfig) -> EncoreResult<Arc<DatabasePool>> {
    let pool = DatabasePool::new(config).await?;
    if config.run_migrations {
        pool.run_migrations().await?;
    }
    Ok(Arc::new(pool))
}
