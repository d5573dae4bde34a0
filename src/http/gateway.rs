//! Gateway HTTP server.
//!
//! # Responsibilities
//! - Route `/color`, `/stats`, the two clear aliases and `/ping`
//! - Fetch from the colorteller and record only validated successes
//! - Compute ratio reports from the rolling history
//! - Wire up middleware (request id, tracing, request timeout)
//!
//! # Routes
//! | Path                           | Effect                                          |
//! |--------------------------------|-------------------------------------------------|
//! | `GET /color`                   | fetch, record, return color + ratios            |
//! | `GET /stats`                   | return ratios only                              |
//! | `GET /color/clear`, `/stats/clear` | reset history, return `cleared`             |
//! | `GET /ping`                    | 200, empty body                                 |

use axum::{
    extract::State,
    http::{header, uri::InvalidUri, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::GatewayConfig;
use crate::http::request::{
    propagate_request_id_layer, request_id, request_id_str, request_span, set_request_id_layer,
};
use crate::http::response::{ColorResponse, DegradedColorResponse, CLEARED_BODY, INTERNAL_ERROR_BODY};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::stats::{Color, ColorStats};
use crate::upstream::{ColorSource, HttpColorTeller};

const SERVICE: &str = "gateway";

/// Application state injected into handlers.
pub struct GatewayState<S> {
    source: Arc<S>,
    stats: Arc<ColorStats>,
}

impl<S> Clone for GatewayState<S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            stats: self.stats.clone(),
        }
    }
}

impl<S: ColorSource> GatewayState<S> {
    /// State with a fresh, empty history.
    pub fn new(source: S) -> Self {
        Self::with_stats(source, Arc::new(ColorStats::new()))
    }

    pub fn with_stats(source: S, stats: Arc<ColorStats>) -> Self {
        Self {
            source: Arc::new(source),
            stats,
        }
    }

    pub fn stats(&self) -> &Arc<ColorStats> {
        &self.stats
    }
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
    stats: Arc<ColorStats>,
}

impl GatewayServer {
    /// Create a gateway talking to the configured colorteller.
    pub fn new(config: GatewayConfig) -> Result<Self, InvalidUri> {
        let source = HttpColorTeller::from_config(&config)?;
        Ok(Self::with_source(config, source))
    }

    /// Create a gateway over an arbitrary color source.
    pub fn with_source<S: ColorSource>(config: GatewayConfig, source: S) -> Self {
        let state = GatewayState::new(source);
        let stats = state.stats().clone();
        let router = build_router(state, Duration::from_secs(config.timeouts.request_secs));
        Self { router, config, stats }
    }

    /// Shared handle on the rolling history.
    pub fn stats(&self) -> Arc<ColorStats> {
        self.stats.clone()
    }

    /// Run until the shutdown receiver fires, draining in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown_rx: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            color_teller = %self.config.color_teller_endpoint,
            "Gateway listening"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Build the gateway router with all middleware layers.
#[allow(deprecated)]
pub fn build_router<S: ColorSource>(state: GatewayState<S>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/color", get(color_handler::<S>))
        .route("/color/clear", get(clear_handler::<S>))
        .route("/stats", get(stats_handler::<S>))
        .route("/stats/clear", get(clear_handler::<S>))
        .route("/ping", get(ping_handler))
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<axum::body::Body>))
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}

/// Fetch a color, record it and answer with the updated ratios.
///
/// Failures are answered with a fixed 500 and never reach the history.
async fn color_handler<S: ColorSource>(State(state): State<GatewayState<S>>, headers: HeaderMap) -> Response {
    let start = Instant::now();
    let rid = request_id_str(&headers);
    let endpoint = state.source.endpoint();

    tracing::info!(request_id = %rid, endpoint = %endpoint, "Fetching color");

    let color = match state.source.fetch(request_id(&headers)).await {
        Ok(color) => color,
        Err(e) => {
            tracing::error!(request_id = %rid, endpoint = %endpoint, error = %e, "Failed to fetch color");
            metrics::record_fetch(e.outcome());
            metrics::record_request(SERVICE, "/color", 500, start);
            return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response();
        }
    };

    metrics::record_fetch("success");
    tracing::info!(request_id = %rid, color = %color, "Fetched color");

    let snapshot = state.stats.record_and_snapshot(color.clone());
    metrics::record_history_entries(snapshot.len());

    let body = ColorResponse::fetched(color.clone(), snapshot.ratios());
    let response = color_json(color, &body, rid);

    metrics::record_request(SERVICE, "/color", 200, start);
    response
}

/// Encode a `/color` answer, degrading to `{"color", "error"}` when the body
/// cannot be encoded.
///
/// A `ColorResponse` always encodes (string keys, `f64` values), so only
/// other bodies reach the degraded arm.
fn color_json<B: Serialize>(color: Color, body: &B, rid: &str) -> Response {
    match serde_json::to_string(body) {
        Ok(json) => {
            tracing::debug!(request_id = %rid, response = %json, "Sending response");
            ([(header::CONTENT_TYPE, "application/json")], json).into_response()
        }
        Err(e) => {
            tracing::error!(request_id = %rid, error = %e, "Failed to serialize color stats");
            Json(DegradedColorResponse {
                color,
                error: e.to_string(),
            })
            .into_response()
        }
    }
}

async fn stats_handler<S: ColorSource>(State(state): State<GatewayState<S>>) -> Json<ColorResponse> {
    let start = Instant::now();
    let report = state.stats.ratios();
    metrics::record_request(SERVICE, "/stats", 200, start);
    Json(ColorResponse::stats_only(report))
}

async fn clear_handler<S: ColorSource>(State(state): State<GatewayState<S>>, headers: HeaderMap) -> &'static str {
    let start = Instant::now();
    state.stats.clear();
    metrics::record_history_entries(0);
    tracing::info!(request_id = %request_id_str(&headers), "Cleared color stats");
    metrics::record_request(SERVICE, "/clear", 200, start);
    CLEARED_BODY
}

async fn ping_handler() -> StatusCode {
    tracing::debug!("Responding to ping");
    StatusCode::OK
}
