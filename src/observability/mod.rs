//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Both services produce:
//!     → logging.rs (structured tracing events, request ids as fields)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer, RUST_LOG filtering)
//!     → Metrics endpoint (Prometheus scrape, when METRICS_ADDRESS is set)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the gateway to the colorteller via x-request-id
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
