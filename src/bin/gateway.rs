//! Gateway service.
//!
//! Reads its configuration from the environment, fetches colors from the
//! colorteller at `COLOR_TELLER_ENDPOINT` and serves rolling color stats.

use colorapp::config::loader::load_gateway_config;
use colorapp::lifecycle::signals::wait_for_signal;
use colorapp::observability::{logging, metrics};
use colorapp::{GatewayServer, Shutdown};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    tracing::info!("gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match load_gateway_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        color_teller = %config.color_teller_endpoint,
        port = config.port,
        upstream_timeout_ms = config.timeouts.upstream_ms,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    metrics::init_from_config(config.observability.metrics_address.as_deref());

    let listener = TcpListener::bind(&config.bind_addresses()[..]).await?;
    let server = GatewayServer::new(config)?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
