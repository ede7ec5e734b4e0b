//! EstateChain gateway server.

use anyhow::Context;
use estate_telemetry::{init_telemetry, TelemetryConfig};
use gateway_runtime::RuntimeConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = RuntimeConfig::from_env().context("Invalid configuration")?;
    let runtime = gateway_runtime::build(&config).context("Failed to wire the gateway")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "Gateway listening");

    let router = runtime.router.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    runtime.shutdown().context("Shutdown failed")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for ctrl-c");
        return;
    }
    info!("Shutdown signal received");
}
