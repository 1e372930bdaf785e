//! relayd - relay daemon for named text-chat clients.

use relayd::Server;
use relayd::config::{Config, DEFAULT_CONFIG_PATH};
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Use the path given on the command line, else `config.toml` if present,
/// else built-in defaults.
fn load_config() -> anyhow::Result<Config> {
    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => DEFAULT_CONFIG_PATH.to_string(),
        None => {
            info!("No config file, using defaults");
            return Ok(Config::default());
        }
    };

    let config = Config::load(&path).map_err(|e| {
        error!(path = %path, error = %e, "Failed to load config");
        e
    })?;
    info!(path = %path, "Loaded config");
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config = load_config()?;

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        "Starting relayd"
    );

    let server = Server::bind(&config).await?;

    tokio::select! {
        result = server.run() => result?,
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutting down");
        }
    }

    Ok(())
}
