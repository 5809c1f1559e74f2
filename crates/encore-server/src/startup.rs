//! Server startup output.

use encore_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r"
    ______
   / ____/___  _________  ________
  / __/ / __ \/ ___/ __ \/ ___/ _ \
 / /___/ / / / /__/ /_/ / /  /  __/
/_____/_/ /_/\___/\____/_/   \___/

            Plugin CMS
    ");
}

/// Prints where the server can be reached.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let base = format!("http://{}", config.server.addr());
    info!("{}", separator);
    info!("Site:      {}/", base);
    info!("Admin API: {}/api/admin/plugins", base);
    info!("Plugins:   {}/api/p/{{plugin_id}}", base);
    info!("Health:    {}/health", base);
    info!("API Docs:  {}/api-docs/openapi.json", base);
    if config.plugins.allow_reload {
        info!("Reload:    POST {}/api/admin/plugins/reload", base);
    }
    info!("{}", separator);
}
