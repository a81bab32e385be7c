//! Drowsiness Monitor - Main Entry Point
//!
//! Usage: `drowsy-monitor [CONFIG_PATH]`

use api::{init_logging, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let config = AppConfig::load(config_path.as_deref())?;

    init_logging(&config.logging)?;

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Detection config: {:?}", config.detection);

    run_server(config).await
}
