use vpn_client::error::VpnClientError;
use vpn_client::logger::initialize as LoggerInitialize;
use vpn_client::session;

use vpn_client_core::config::{ClientConfig, default_config_dir};

use common::ErrorLocation;

use std::fs::create_dir_all;
use std::panic::Location;

use log::{info, warn};
use tokio::sync::watch;

const LOG_DIR_NAME: &str = "logs";

#[tokio::main]
async fn main() -> Result<(), VpnClientError> {
    // .env is optional
    let _ = dotenvy::dotenv();

    let config_dir = default_config_dir().map_err(|e| VpnClientError::Config {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let mut config = ClientConfig::load(&config_dir).map_err(|e| VpnClientError::Config {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;
    config
        .apply_env_overrides()
        .map_err(|e| VpnClientError::Config {
            message: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

    let log_dir = config_dir.join(LOG_DIR_NAME);
    create_dir_all(&log_dir).map_err(|e| VpnClientError::Client {
        message: format!("Failed to create log directory: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })?;

    // Initialize logger FIRST
    LoggerInitialize(&log_dir, config.logging.effective_level().into())?;

    info!("VPN client starting");
    info!("Config directory: {}", config_dir.display());
    info!("Service endpoint: {}", config.daemon.ipc_url);

    let (shutdown_tx, shutdown) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Interrupt received, shutting down"),
            Err(e) => warn!("Failed to listen for interrupt: {e}"),
        }
        let _ = shutdown_tx.send(true);
    });

    session::run(&config, shutdown).await?;

    info!("VPN client stopped");
    Ok(())
}
