//! Loads catalog modules into the registry.

use crate::catalog::PluginCatalog;
use crate::registry::PluginRegistry;
use async_trait::async_trait;
use encore_config::PluginConfig;
use encore_core::{HealthCheck, HealthStatus};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Outcome of one load pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    /// Newly registered plugin ids.
    pub loaded: Vec<String>,
    /// Modules skipped by configuration.
    pub skipped: Vec<String>,
    /// Modules that failed to build, with the reason.
    pub failed: Vec<LoadFailure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadFailure {
    pub plugin_id: String,
    pub message: String,
}

/// Populates a [`PluginRegistry`] from a [`PluginCatalog`].
///
/// Loads are serialized: a caller that arrives while a load is running waits
/// for it and shares its outcome instead of loading again.
pub struct PluginLoader {
    catalog: PluginCatalog,
    registry: Arc<PluginRegistry>,
    disabled_modules: HashSet<String>,
    loaded: AtomicBool,
    generation: AtomicU64,
    guard: Mutex<()>,
    last_report: RwLock<LoadReport>,
}

impl PluginLoader {
    #[must_use]
    pub fn new(catalog: PluginCatalog, registry: Arc<PluginRegistry>) -> Self {
        Self {
            catalog,
            registry,
            disabled_modules: HashSet::new(),
            loaded: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            guard: Mutex::new(()),
            last_report: RwLock::new(LoadReport::default()),
        }
    }

    /// Applies the module deny-list from configuration.
    #[must_use]
    pub fn with_config(mut self, config: &PluginConfig) -> Self {
        self.disabled_modules = config.disabled_modules.iter().cloned().collect();
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &PluginCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    /// True when configuration keeps `plugin_id` from ever loading.
    #[must_use]
    pub fn is_module_disabled(&self, plugin_id: &str) -> bool {
        self.disabled_modules.contains(plugin_id)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Report of the most recent completed load.
    #[must_use]
    pub fn last_report(&self) -> LoadReport {
        self.last_report.read().clone()
    }

    /// Loads every catalog module and registers its definition.
    ///
    /// A module that fails is logged and skipped. If another load finishes
    /// while this caller waits for the guard, its report is returned as is.
    pub async fn load(&self) -> LoadReport {
        let seen = self.generation.load(Ordering::Acquire);
        let _guard = self.guard.lock().await;
        if self.generation.load(Ordering::Acquire) != seen {
            debug!("Joined an in-flight plugin load");
            return self.last_report();
        }
        self.load_locked().await
    }

    /// Loads unless a load already completed and registered something.
    ///
    /// An empty registry is loaded again, so modules that failed on the
    /// first pass get another chance.
    pub async fn ensure_loaded(&self) {
        if self.is_populated() {
            return;
        }
        let _guard = self.guard.lock().await;
        if self.is_populated() {
            return;
        }
        self.load_locked().await;
    }

    fn is_populated(&self) -> bool {
        self.is_loaded() && !self.registry.is_empty()
    }

    /// Clears the registry and loads again from scratch.
    pub async fn reload(&self) -> LoadReport {
        let _guard = self.guard.lock().await;
        info!("Reloading plugins");
        self.registry.clear();
        self.loaded.store(false, Ordering::Release);
        self.load_locked().await
    }

    async fn load_locked(&self) -> LoadReport {
        let mut report = LoadReport::default();

        for plugin_id in self.catalog.available_ids() {
            if self.disabled_modules.contains(plugin_id) {
                debug!(plugin_id = %plugin_id, "Plugin module disabled by configuration");
                report.skipped.push(plugin_id.to_string());
                continue;
            }

            match self.catalog.load_module(plugin_id).await {
                Ok(definition) => {
                    if self.registry.register(definition) {
                        report.loaded.push(plugin_id.to_string());
                    }
                }
                Err(e) => {
                    error!(plugin_id = %plugin_id, error = %e, "Failed to load plugin module");
                    report.failed.push(LoadFailure {
                        plugin_id: plugin_id.to_string(),
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            loaded = report.loaded.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            total = self.registry.len(),
            "Plugin load complete"
        );

        *self.last_report.write() = report.clone();
        self.loaded.store(true, Ordering::Release);
        self.generation.fetch_add(1, Ordering::AcqRel);
        report
    }
}

#[async_trait]
impl HealthCheck for PluginLoader {
    fn name(&self) -> &str {
        "plugins"
    }

    async fn check(&self) -> HealthStatus {
        if !self.is_loaded() {
            return HealthStatus::Degraded("plugins not loaded yet".to_string());
        }
        let report = self.last_report.read();
        if report.failed.is_empty() {
            HealthStatus::Healthy
        } else {
            let ids: Vec<_> = report.failed.iter().map(|f| f.plugin_id.as_str()).collect();
            HealthStatus::Degraded(format!("failed to load: {}", ids.join(", ")))
        }
    }
}

impl std::fmt::Debug for PluginLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginLoader")
            .field("catalog", &self.catalog)
            .field("loaded", &self.is_loaded())
            .field("registered", &self.registry.len())
            .finish()
    }
}
