//! Upstream (colorteller) access for the gateway.
//!
//! # Data Flow
//! ```text
//! /color handler
//!     → ColorSource::fetch (trait seam; HttpColorTeller in production)
//!         → client.rs (GET http://<endpoint>, deadline, body cap)
//!         → classify.rs (status >= 400 / blank body → FetchError)
//!     → Ok(Color) recorded by the gateway, Err(FetchError) logged and mapped to 500
//! ```
//!
//! # Design Decisions
//! - The gateway only sees `Result<Color, FetchError>`; no raw responses leak out
//! - Dropping the fetch future aborts the outbound request

pub mod classify;
pub mod client;

use axum::http::{HeaderValue, StatusCode};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use crate::stats::Color;

pub use classify::classify;
pub use client::HttpColorTeller;

/// Errors that can occur while fetching a color.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The outbound request could not be constructed.
    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    /// Connection or protocol failure.
    #[error("transport error: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    /// No complete response within the deadline.
    #[error("upstream timed out after {0:?}")]
    Timeout(Duration),

    /// The colorteller answered with an error status.
    #[error("upstream responded with {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The colorteller answered with a blank body.
    #[error("empty response from colorteller")]
    EmptyBody,

    /// Reading the response body failed or exceeded the size cap.
    #[error("failed to read upstream body: {0}")]
    Body(#[from] axum::Error),
}

impl FetchError {
    /// Short label used for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            FetchError::Request(_) => "request",
            FetchError::Transport(_) => "transport",
            FetchError::Timeout(_) => "timeout",
            FetchError::Status { .. } => "status",
            FetchError::EmptyBody => "empty",
            FetchError::Body(_) => "body",
        }
    }
}

/// Something the gateway can fetch colors from.
pub trait ColorSource: Send + Sync + 'static {
    /// Human-readable location, for logs.
    fn endpoint(&self) -> &str;

    /// Fetch one color, forwarding the caller's request id when present.
    fn fetch(&self, request_id: Option<HeaderValue>) -> impl Future<Output = Result<Color, FetchError>> + Send;
}
