//! Persisted plugin state.

use chrono::{DateTime, Utc};
use encore_core::PluginId;
use serde::{Deserialize, Serialize};

/// Persisted, mutable state of one plugin.
///
/// A record may exist for a plugin whose code is not loaded; a loaded plugin
/// without a record is treated as disabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginState {
    pub plugin_id: PluginId,
    pub enabled: bool,
    pub custom_public_path: Option<String>,
    /// Opaque serialized settings blob.
    pub settings: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PluginState {
    /// A fresh disabled record.
    #[must_use]
    pub fn new(plugin_id: PluginId) -> Self {
        let now = Utc::now();
        Self {
            plugin_id,
            enabled: false,
            custom_public_path: None,
            settings: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the set fields of `changes` and bumps `updated_at`.
    pub fn apply(&mut self, changes: &PluginStateChanges) {
        if let Some(enabled) = changes.enabled {
            self.enabled = enabled;
        }
        if let Some(path) = &changes.custom_public_path {
            self.custom_public_path = Some(path.clone());
        }
        if let Some(settings) = &changes.settings {
            self.settings = Some(settings.clone());
        }
        self.updated_at = Utc::now();
    }
}

/// Partial update for an upsert; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginStateChanges {
    pub enabled: Option<bool>,
    pub custom_public_path: Option<String>,
    pub settings: Option<String>,
}

impl PluginStateChanges {
    #[must_use]
    pub fn enable(custom_public_path: Option<String>) -> Self {
        Self {
            enabled: Some(true),
            custom_public_path,
            settings: None,
        }
    }

    #[must_use]
    pub fn disable() -> Self {
        Self {
            enabled: Some(false),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn public_path(path: impl Into<String>) -> Self {
        Self {
            custom_public_path: Some(path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn settings(settings: impl Into<String>) -> Self {
        Self {
            settings: Some(settings.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_disabled() {
        let state = PluginState::new(PluginId::new("concerts"));
        assert!(!state.enabled);
        assert!(state.custom_public_path.is_none());
        assert!(state.settings.is_none());
    }

    #[test]
    fn test_apply_keeps_unset_fields() {
        let mut state = PluginState::new(PluginId::new("concerts"));
        state.apply(&PluginStateChanges::enable(Some("/shows".into())));
        state.apply(&PluginStateChanges::settings(r#"{"perPage":10}"#));
        state.apply(&PluginStateChanges::disable());

        assert!(!state.enabled);
        assert_eq!(state.custom_public_path.as_deref(), Some("/shows"));
        assert_eq!(state.settings.as_deref(), Some(r#"{"perPage":10}"#));
        assert!(state.updated_at >= state.created_at);
    }

    #[test]
    fn test_serializes_camel_case() {
        let state = PluginState::new(PluginId::new("photos"));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["pluginId"], "photos");
        assert!(json.get("customPublicPath").is_some());
    }
}
