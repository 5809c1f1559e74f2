//! `encore-plugins`: inspect, validate and toggle plugins from a shell.

use clap::{Parser, Subcommand};
use encore_core::{EncoreError, EncoreResult};
use encore_plugin_api::validation::validate_plugin_fully;
use encore_plugin_runtime::PluginManager;
use serde_json::Value;
use std::path::PathBuf;

/// Encore plugin operations
#[derive(Parser, Debug)]
#[command(name = "encore-plugins")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding default.toml and environment overrides
    #[arg(long, default_value = "./config")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List plugins with their enabled state and public path
    List,
    /// Validate one plugin, or every plugin in the catalog
    Validate {
        plugin_id: Option<String>,
    },
    /// Enable a plugin, optionally at a custom public path
    Enable {
        plugin_id: String,
        #[arg(long)]
        path: Option<String>,
    },
    /// Disable a plugin
    Disable {
        plugin_id: String,
    },
    /// Replace a plugin's settings with a JSON object
    Settings {
        plugin_id: String,
        json: String,
    },
}

/// Printed lines plus whether the command succeeded.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub lines: Vec<String>,
    pub success: bool,
}

impl Outcome {
    fn ok(lines: Vec<String>) -> Self {
        Self { lines, success: true }
    }
}

/// Runs one command against a manager.
///
/// # Errors
///
/// Returns the state store's error for enable/disable/settings, a
/// validation error for malformed settings JSON and not-found for an
/// unknown plugin id.
pub async fn run(command: &Command, manager: &PluginManager) -> EncoreResult<Outcome> {
    manager.loader().ensure_loaded().await;

    match command {
        Command::List => list(manager).await,
        Command::Validate { plugin_id } => validate(manager, plugin_id.as_deref()),
        Command::Enable { plugin_id, path } => {
            let state = manager.state_store().enable(plugin_id, path.clone()).await?;
            let path = manager.state_store().public_path(plugin_id).await;
            Ok(Outcome::ok(vec![format!(
                "Enabled {} at {}",
                state.plugin_id,
                path.as_deref().unwrap_or("(no public path)")
            )]))
        }
        Command::Disable { plugin_id } => {
            let state = manager.state_store().disable(plugin_id).await?;
            Ok(Outcome::ok(vec![format!("Disabled {}", state.plugin_id)]))
        }
        Command::Settings { plugin_id, json } => {
            let settings: Value = serde_json::from_str(json)?;
            if !settings.is_object() {
                return Err(EncoreError::validation("settings must be a JSON object"));
            }
            if !manager.registry().contains(plugin_id) {
                return Err(EncoreError::not_found("plugin", plugin_id));
            }
            manager.state_store().update_settings(plugin_id, &settings).await?;
            Ok(Outcome::ok(vec![format!("Updated settings for {plugin_id}")]))
        }
    }
}

async fn list(manager: &PluginManager) -> EncoreResult<Outcome> {
    let mut lines: Vec<String> = manager
        .all_instances()
        .await
        .iter()
        .map(|instance| {
            format!(
                "{:<12} {:<20} {:<8} {:<9} {}",
                instance.id(),
                instance.definition.name,
                instance.definition.version,
                if instance.enabled() { "enabled" } else { "disabled" },
                instance.public_path().unwrap_or("-"),
            )
        })
        .collect();

    for failure in manager.loader().last_report().failed {
        lines.push(format!("{:<12} failed to load: {}", failure.plugin_id, failure.message));
    }
    Ok(Outcome::ok(lines))
}

fn validate(manager: &PluginManager, only: Option<&str>) -> EncoreResult<Outcome> {
    let registry = manager.registry();
    let report = manager.loader().last_report();

    if let Some(id) = only {
        let known = registry.contains(id) || report.failed.iter().any(|f| f.plugin_id == id);
        if !known {
            return Err(EncoreError::not_found("plugin", id));
        }
    }
    let selected = |id: &str| only.map_or(true, |only| only == id);

    let mut outcome = Outcome::ok(Vec::new());
    for failure in report.failed.iter().filter(|f| selected(&f.plugin_id)) {
        outcome.success = false;
        outcome
            .lines
            .push(format!("✗ {}: failed to load: {}", failure.plugin_id, failure.message));
    }

    for definition in registry.get_all().iter().filter(|d| selected(&d.id)) {
        let result = validate_plugin_fully(definition);
        if result.is_valid() {
            outcome.lines.push(format!(
                "✓ {} ({} warning{})",
                definition.id,
                result.warnings.len(),
                if result.warnings.len() == 1 { "" } else { "s" }
            ));
        } else {
            outcome.success = false;
            outcome.lines.push(format!("✗ {}", definition.id));
        }
        for error in &result.errors {
            outcome.lines.push(format!("    error: {error}"));
        }
        for warning in &result.warnings {
            outcome.lines.push(format!("    warning: {warning}"));
        }
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;
    use encore_plugin_api::PluginDefinition;
    use encore_plugin_runtime::{PluginCatalog, PluginLoader, PluginRegistry, PluginStateStore};
    use encore_repository::InMemoryPluginStateRepository;
    use std::sync::Arc;

    fn manager(catalog: PluginCatalog) -> PluginManager {
        let registry = Arc::new(PluginRegistry::new());
        let loader = Arc::new(PluginLoader::new(catalog, Arc::clone(&registry)));
        let repository = Arc::new(InMemoryPluginStateRepository::new());
        PluginManager::new(loader, PluginStateStore::new(repository, registry))
    }

    #[test]
    fn test_parses_enable_with_path() {
        let cli = Cli::parse_from(["encore-plugins", "enable", "photos", "--path", "/gallery"]);
        assert_eq!(
            cli.command,
            Command::Enable {
                plugin_id: "photos".into(),
                path: Some("/gallery".into())
            }
        );
        assert_eq!(cli.config_dir, PathBuf::from("./config"));
    }

    #[tokio::test]
    async fn test_validate_builtin_plugins() {
        let outcome = run(&Command::Validate { plugin_id: None }, &manager(builtin_catalog()))
            .await
            .unwrap();
        assert!(outcome.success, "{:?}", outcome.lines);
        assert!(outcome.lines.iter().any(|l| l.starts_with("✓ concerts")));
        assert!(outcome.lines.iter().any(|l| l.starts_with("✓ photos")));
    }

    #[tokio::test]
    async fn test_validate_reports_broken_module() {
        let catalog = PluginCatalog::new().module("broken", || async {
            Err::<PluginDefinition, _>(encore_plugin_api::PluginError::Load("missing asset".into()))
        });
        let outcome = run(&Command::Validate { plugin_id: None }, &manager(catalog)).await.unwrap();
        assert!(!outcome.success);
        assert!(outcome.lines[0].contains("missing asset"));

        let err = run(
            &Command::Validate {
                plugin_id: Some("nope".into()),
            },
            &manager(PluginCatalog::new()),
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_enable_disable_and_list() {
        let manager = manager(builtin_catalog());
        let enable = Command::Enable {
            plugin_id: "concerts".into(),
            path: Some("/live".into()),
        };
        let outcome = run(&enable, &manager).await.unwrap();
        assert_eq!(outcome.lines, vec!["Enabled concerts at /live"]);

        let listed = run(&Command::List, &manager).await.unwrap();
        assert!(listed.lines[0].contains("enabled"));
        assert!(listed.lines[0].ends_with("/live"));

        run(&Command::Disable { plugin_id: "concerts".into() }, &manager)
            .await
            .unwrap();
        assert!(!manager.state_store().is_enabled("concerts").await);
    }

    #[tokio::test]
    async fn test_settings_requires_object() {
        let manager = manager(builtin_catalog());
        let settings = |json: &str| Command::Settings {
            plugin_id: "photos".into(),
            json: json.into(),
        };

        assert!(run(&settings("[1, 2]"), &manager).await.is_err());
        assert!(run(&settings("{not json"), &manager).await.is_err());
        run(&settings(r#"{"albumsPerPage": 24}"#), &manager).await.unwrap();

        let instance = manager.instance("photos").await.unwrap();
        assert_eq!(instance.settings().unwrap()["albumsPerPage"], 24);
    }
}
