//! Colorteller service.
//!
//! Answers `GET /` with `COLOR`, optionally delayed by `TEST_RESPONSE_DELAY`
//! milliseconds and failing every `TEST_PERIODIC_ERROR` requests.

use colorapp::config::loader::load_color_teller_config;
use colorapp::lifecycle::signals::wait_for_signal;
use colorapp::observability::{logging, metrics};
use colorapp::{ColorTellerServer, Shutdown};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let config = match load_color_teller_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    tracing::info!(
        color = %config.color,
        port = config.port,
        "colorteller v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    metrics::init_from_config(config.observability.metrics_address.as_deref());

    let listener = TcpListener::bind(&config.bind_addresses()[..]).await?;
    let server = ColorTellerServer::new(config);

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
