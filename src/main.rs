//! Warden server: loads configuration, wires the application and runs the
//! background worker until interrupted.

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use warden::App;
use warden_core::config::AppConfig;
use warden_core::error::AppError;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("WARDEN_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("WARDEN_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Warden");

    let app = App::build(config).await?;

    if !app.config.worker.enabled {
        tracing::warn!("Worker disabled; queued e-mail will not be delivered");
        wait_for_shutdown().await;
        return Ok(());
    }

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let worker = app.worker.clone();
    let handle = tokio::spawn(async move { worker.run(cancel_rx).await });

    wait_for_shutdown().await;
    tracing::info!("Shutdown signal received");

    let _ = cancel_tx.send(true);
    handle
        .await
        .map_err(|e| AppError::internal(format!("Worker task failed: {e}")))?;

    if let Some(pool) = &app.stores.pool {
        pool.close().await;
    }
    tracing::info!("Warden stopped");
    Ok(())
}

async fn wait_for_shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
