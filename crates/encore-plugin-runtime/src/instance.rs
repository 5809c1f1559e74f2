//! A plugin definition joined with its persisted state.

use encore_plugin_api::{PluginDefinition, PluginManifest};
use encore_repository::PluginState;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Runtime view of one plugin: what it can do and whether it is active.
#[derive(Debug, Clone)]
pub struct PluginInstance {
    pub definition: Arc<PluginDefinition>,
    /// `None` when the plugin has never been enabled or configured.
    pub state: Option<PluginState>,
}

impl PluginInstance {
    #[must_use]
    pub fn new(definition: Arc<PluginDefinition>, state: Option<PluginState>) -> Self {
        Self { definition, state }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.definition.id
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.enabled)
    }

    #[must_use]
    pub fn custom_public_path(&self) -> Option<&str> {
        self.state.as_ref()?.custom_public_path.as_deref()
    }

    /// Custom path if set, else the definition's default.
    #[must_use]
    pub fn public_path(&self) -> Option<&str> {
        self.custom_public_path()
            .or(self.definition.default_public_path.as_deref())
    }

    /// Parsed settings object. An unparseable blob is logged and ignored.
    #[must_use]
    pub fn settings(&self) -> Option<Value> {
        let blob = self.state.as_ref()?.settings.as_deref()?;
        match serde_json::from_str(blob) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(plugin_id = %self.id(), error = %e, "Ignoring unparseable plugin settings");
                None
            }
        }
    }

    /// Serializable form with every component stripped.
    #[must_use]
    pub fn view(&self) -> PluginInstanceView {
        PluginInstanceView {
            manifest: self.definition.manifest(),
            enabled: self.enabled(),
            custom_public_path: self.custom_public_path().map(str::to_string),
            public_path: self.public_path().map(str::to_string),
            settings: self.settings(),
        }
    }
}

/// JSON shape of a plugin instance sent to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginInstanceView {
    #[serde(flatten)]
    pub manifest: PluginManifest,
    pub enabled: bool,
    pub custom_public_path: Option<String>,
    pub public_path: Option<String>,
    pub settings: Option<Value>,
}
