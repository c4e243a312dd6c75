//! # Social-Mesh
//!
//! Entry point: telemetry, configuration, runtime, Ctrl+C.

use anyhow::{Context, Result};
use social_runtime::{load_config, SocialRuntime};
use social_telemetry::{init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = load_config().context("Failed to load configuration")?;
    info!(
        default_timeout_ms = config.bus.default_timeout_ms,
        channel_capacity = config.bus.channel_capacity,
        "Configuration loaded"
    );

    let runtime = SocialRuntime::new(config).context("Failed to build runtime")?;
    runtime.start()?;

    info!("Social-Mesh is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    Ok(())
}
