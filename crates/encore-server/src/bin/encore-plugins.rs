//! Plugin operations against the configured database and built-in catalog.
//!
//! ```text
//! encore-plugins list
//! encore-plugins validate [ID]
//! encore-plugins enable ID [--path /custom]
//! encore-plugins disable ID
//! encore-plugins settings ID '{"key": "value"}'
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use encore_config::ConfigLoader;
use encore_server::cli::{self, Cli};
use encore_server::AppBuilder;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = ConfigLoader::new(&args.config_dir)
        .with_context(|| format!("failed to load configuration from {}", args.config_dir.display()))?
        .get()
        .await;

    let app = AppBuilder::new()
        .with_config(config)
        .build()
        .await
        .context("failed to open the plugin state database")?;

    let result = cli::run(&args.command, &app.manager).await;
    app.close().await;

    let outcome = result?;
    for line in &outcome.lines {
        println!("{line}");
    }
    Ok(if outcome.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
