//! Table of plugin modules compiled into the binary.
//!
//! Each entry maps a plugin id to an asynchronous factory, so a module's
//! definition is only built when the loader asks for it.

use encore_core::{EncoreError, EncoreResult};
use encore_plugin_api::{PluginDefinition, PluginResult};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::debug;

type FactoryFn = dyn Fn() -> BoxFuture<'static, PluginResult<PluginDefinition>> + Send + Sync;

/// Asynchronous producer of one plugin definition.
#[derive(Clone)]
pub struct ModuleFactory(Arc<FactoryFn>);

impl ModuleFactory {
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<PluginDefinition>> + Send + 'static,
    {
        Self(Arc::new(move || Box::pin(factory())))
    }
}

/// Ordered id → factory table.
#[derive(Clone, Default)]
pub struct PluginCatalog {
    modules: Vec<(String, ModuleFactory)>,
}

impl PluginCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module. A later entry with the same id replaces the earlier one
    /// in place.
    #[must_use]
    pub fn module<F, Fut>(mut self, plugin_id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = PluginResult<PluginDefinition>> + Send + 'static,
    {
        let plugin_id = plugin_id.into();
        let factory = ModuleFactory::new(factory);
        match self.modules.iter_mut().find(|(id, _)| *id == plugin_id) {
            Some(entry) => entry.1 = factory,
            None => self.modules.push((plugin_id, factory)),
        }
        self
    }

    /// Module ids in declaration order.
    #[must_use]
    pub fn available_ids(&self) -> Vec<&str> {
        self.modules.iter().map(|(id, _)| id.as_str()).collect()
    }

    #[must_use]
    pub fn contains(&self, plugin_id: &str) -> bool {
        self.modules.iter().any(|(id, _)| id == plugin_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Builds the definition of one module.
    ///
    /// A factory error, a panic inside the factory, or a definition whose id
    /// differs from the catalog key all become a module load failure.
    ///
    /// # Errors
    ///
    /// Returns [`EncoreError::PluginNotFound`] for an unknown id and
    /// [`EncoreError::ModuleLoadFailure`] when the module cannot be built.
    pub async fn load_module(&self, plugin_id: &str) -> EncoreResult<PluginDefinition> {
        let (_, factory) = self
            .modules
            .iter()
            .find(|(id, _)| id == plugin_id)
            .ok_or_else(|| EncoreError::PluginNotFound(plugin_id.to_string()))?;

        debug!(plugin_id = %plugin_id, "Loading plugin module");

        let definition = match AssertUnwindSafe((factory.0)()).catch_unwind().await {
            Ok(Ok(definition)) => definition,
            Ok(Err(e)) => return Err(EncoreError::module_load_failure(plugin_id, e.to_string())),
            Err(payload) => {
                return Err(EncoreError::module_load_failure(
                    plugin_id,
                    format!("module panicked: {}", panic_message(payload.as_ref())),
                ))
            }
        };

        if definition.id != plugin_id {
            return Err(EncoreError::module_load_failure(
                plugin_id,
                format!("module produced a definition with id \"{}\"", definition.id),
            ));
        }

        Ok(definition)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

impl std::fmt::Debug for PluginCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginCatalog")
            .field("modules", &self.available_ids())
            .finish()
    }
}
