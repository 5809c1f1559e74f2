//! # Encore Server
//!
//! Loads configuration, opens the plugin state database, loads the built-in
//! plugins and serves the site, admin and plugin API surfaces.

use encore_config::{AppConfig, ConfigLoader, ObservabilityConfig};
use encore_core::EncoreResult;
use encore_server::{startup, AppBuilder};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match load_config().await {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };
    init_logging(&config.observability);

    startup::print_banner();
    info!("Starting Encore server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn load_config() -> EncoreResult<AppConfig> {
    let loader = ConfigLoader::from_default_location()?;
    Ok(loader.get().await)
}

async fn run(config: AppConfig) -> EncoreResult<()> {
    let app = AppBuilder::new().with_config(config).build().await?;
    startup::print_startup_info(&app.config);
    app.serve(shutdown_signal()).await
}

fn init_logging(observability: &ObservabilityConfig) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},encore=debug,tower_http=debug",
            observability.log_level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if observability.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
