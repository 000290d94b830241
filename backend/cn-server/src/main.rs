use cn_server::{build_notifier, logger};

use std::error::Error;

use log::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load and validate configuration
    let config = cn_config::Config::load()?;
    config.validate()?;

    // Initialize logger (before any other logging)
    let log_file_path = config.log_file_path()?;
    if let Some(parent) = log_file_path.as_ref().and_then(|path| path.parent()) {
        std::fs::create_dir_all(parent)?;
    }
    logger::initialize(config.logging.level, log_file_path, config.logging.colored)?;

    info!("Starting cn-server v{}", env!("CARGO_PKG_VERSION"));
    config.log_summary();

    let notifier = build_notifier(&config).await?;

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received SIGINT (Ctrl+C), shutting down"),
        Err(e) => error!("Failed to listen for SIGINT: {}", e),
    }

    let closed = notifier.shutdown();
    info!("Closed {closed} subscriptions, goodbye");

    Ok(())
}
