//! Colorteller HTTP server.
//!
//! Answers every non-ping GET with the configured color, subject to the
//! configured faults. `/ping` bypasses fault injection entirely.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::ColorTellerConfig;
use crate::faults::{FaultInjector, Outcome};
use crate::http::request::{propagate_request_id_layer, request_id_str, request_span, set_request_id_layer};
use crate::lifecycle::shutdown;
use crate::observability::metrics;

const SERVICE: &str = "colorteller";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct ColorTellerState {
    color: Arc<str>,
    faults: Arc<FaultInjector>,
}

impl ColorTellerState {
    pub fn new(color: &str, faults: FaultInjector) -> Self {
        Self {
            color: Arc::from(color),
            faults: Arc::new(faults),
        }
    }
}

/// HTTP server for the colorteller.
pub struct ColorTellerServer {
    router: Router,
    config: ColorTellerConfig,
}

impl ColorTellerServer {
    pub fn new(config: ColorTellerConfig) -> Self {
        let state = ColorTellerState::new(&config.color, FaultInjector::from_config(&config));
        Self {
            router: build_router(state),
            config,
        }
    }

    /// Run until the shutdown receiver fires.
    pub async fn run(self, listener: TcpListener, shutdown_rx: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, color = %self.config.color, "Colorteller listening");
        if self.config.response_delay_ms > 0 {
            tracing::info!(delay_ms = self.config.response_delay_ms, "Response delays enabled");
        }
        if self.config.periodic_error > 0 {
            tracing::info!(period = self.config.periodic_error, "Periodic errors enabled");
        }

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("Colorteller stopped");
        Ok(())
    }
}

/// Build the colorteller router.
pub fn build_router(state: ColorTellerState) -> Router {
    Router::new()
        .route("/", get(color_handler))
        .route("/ping", get(ping_handler))
        .fallback(color_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}

async fn color_handler(State(state): State<ColorTellerState>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let rid = request_id_str(&headers);
    tracing::info!(request_id = %rid, color = %state.color, "Color requested");

    let response = match state.faults.inject().await {
        Outcome::Respond => (StatusCode::OK, state.color.to_string()).into_response(),
        Outcome::Fail(tick) => {
            tracing::warn!(
                request_id = %rid,
                color = %state.color,
                period = tick.period,
                counter = tick.counter,
                "Sending injected 500"
            );
            let body = format!(
                "periodic error (expected) for color {}: period={} counter={}, sending HTTP 500",
                state.color, tick.period, tick.counter
            );
            (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
        }
    };

    metrics::record_request(SERVICE, "/", response.status().as_u16(), start);
    response
}

async fn ping_handler() -> StatusCode {
    tracing::debug!("Responding to ping");
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    async fn get(router: &Router, path: &str) -> (StatusCode, String) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_returns_configured_color() {
        let router = build_router(ColorTellerState::new("blue", FaultInjector::default()));
        assert_eq!(get(&router, "/").await, (StatusCode::OK, "blue".to_string()));
        assert_eq!(get(&router, "/any/path").await, (StatusCode::OK, "blue".to_string()));
    }

    #[tokio::test]
    async fn test_periodic_error_sequence() {
        let router = build_router(ColorTellerState::new("blue", FaultInjector::new(Duration::ZERO, 3)));

        let statuses = {
            let mut statuses = Vec::new();
            for _ in 0..4 {
                statuses.push(get(&router, "/").await);
            }
            statuses
        };

        assert_eq!(statuses[0], (StatusCode::OK, "blue".to_string()));
        assert_eq!(statuses[1], (StatusCode::OK, "blue".to_string()));
        assert_eq!(statuses[2].0, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(statuses[2].1.contains("periodic error"));
        assert!(statuses[2].1.contains("counter=3"));
        assert_eq!(statuses[3], (StatusCode::OK, "blue".to_string()));
    }

    #[tokio::test]
    async fn test_ping_ignores_faults() {
        let router = build_router(ColorTellerState::new("blue", FaultInjector::new(Duration::from_secs(10), 1)));
        let (status, body) = tokio::time::timeout(Duration::from_secs(1), get(&router, "/ping"))
            .await
            .expect("ping must not be delayed");
        assert_eq!(status, StatusCode::OK);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_server_serves_configured_color() {
        let config = ColorTellerConfig {
            color: "purple".into(),
            ..ColorTellerConfig::default()
        };
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = crate::lifecycle::Shutdown::new();
        let handle = tokio::spawn(ColorTellerServer::new(config).run(listener, shutdown.subscribe()));

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let response = client.get(format!("http://{addr}/")).send().await.unwrap();
        assert_eq!(response.text().await.unwrap(), "purple");

        shutdown.trigger();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_delay_is_observable() {
        let router = build_router(ColorTellerState::new("red", FaultInjector::new(Duration::from_millis(80), 0)));
        let start = Instant::now();
        let (status, _) = get(&router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}
