//! Application builder.

use axum::Router;
use encore_config::AppConfig;
use encore_core::{EncoreError, EncoreResult, HealthCheck};
use encore_plugin_runtime::{PluginCatalog, PluginLoader, PluginManager, PluginRegistry, PluginStateStore};
use encore_repository::{create_pool, DatabasePool, PluginStateRepository, SqlitePluginStateRepository};
use encore_rest::{create_router, AppState};
use std::future::Future;
use std::sync::Arc;
use tracing::info;

use crate::catalog::builtin_catalog;

/// Assembles config, state repository, catalog, loader and router.
#[derive(Default)]
pub struct AppBuilder {
    config: Option<AppConfig>,
    catalog: Option<PluginCatalog>,
    repository: Option<Arc<dyn PluginStateRepository>>,
}

impl AppBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Replaces the built-in catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: PluginCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Uses `repository` instead of opening the configured database.
    #[must_use]
    pub fn with_repository(mut self, repository: Arc<dyn PluginStateRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Builds the application, loading plugins now when `plugins.eager_load`
    /// is set.
    ///
    /// # Errors
    ///
    /// Fails when the database cannot be opened or migrated.
    pub async fn build(self) -> EncoreResult<App> {
        let config = self.config.unwrap_or_default();

        let (repository, pool) = match self.repository {
            Some(repository) => (repository, None),
            None => {
                let pool = create_pool(&config.database).await?;
                let repository: Arc<dyn PluginStateRepository> =
                    Arc::new(SqlitePluginStateRepository::new(Arc::clone(&pool)));
                (repository, Some(pool))
            }
        };

        let registry = Arc::new(PluginRegistry::new());
        let catalog = self.catalog.unwrap_or_else(builtin_catalog);
        let loader = Arc::new(PluginLoader::new(catalog, Arc::clone(&registry)).with_config(&config.plugins));

        if config.plugins.enabled && config.plugins.eager_load {
            loader.ensure_loaded().await;
        }

        let manager = Arc::new(PluginManager::new(
            Arc::clone(&loader),
            PluginStateStore::new(repository, registry),
        ));

        let mut state = AppState::new(Arc::clone(&manager), &config)
            .with_health_check(Arc::clone(&loader) as Arc<dyn HealthCheck>);
        if let Some(pool) = &pool {
            state = state.with_health_check(Arc::clone(pool) as Arc<dyn HealthCheck>);
        }
        let router = create_router(state, &config.server, &config.plugins);

        Ok(App {
            config,
            router,
            manager,
            pool,
        })
    }
}

/// A built application ready to serve.
pub struct App {
    pub config: AppConfig,
    pub router: Router,
    pub manager: Arc<PluginManager>,
    pool: Option<Arc<DatabasePool>>,
}

impl App {
    /// Serves until `shutdown` resolves, then closes the database pool.
    ///
    /// # Errors
    ///
    /// Fails when the listen address cannot be bound or the server errors.
    pub async fn serve<F>(self, shutdown: F) -> EncoreResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.server.addr();
        info!("Starting HTTP server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| EncoreError::Internal(format!("Failed to bind {addr}: {e}")))?;

        let Self { router, pool, .. } = self;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| EncoreError::Internal(format!("HTTP server error: {e}")))?;

        close_pool(pool.as_deref()).await;
        info!("Server shutdown complete");
        Ok(())
    }

    /// Releases the database pool, if one was opened.
    pub async fn close(&self) {
        close_pool(self.pool.as_deref()).await;
    }
}

async fn close_pool(pool: Option<&DatabasePool>) {
    if let Some(pool) = pool {
        pool.close().await;
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("addr", &self.config.server.addr())
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}
