//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway (gateway.rs):
//!     TCP connection
//!     → request.rs (x-request-id, request span)
//!     → /color → upstream::ColorSource::fetch → stats::ColorStats::record_and_snapshot
//!     → response.rs (ColorResponse JSON, fixed failure bodies)
//!
//! Colorteller (colorteller.rs):
//!     TCP connection
//!     → request.rs
//!     → faults::FaultInjector::inject
//!     → plain-text color or injected 500
//! ```

pub mod colorteller;
pub mod gateway;
pub mod request;
pub mod response;

pub use colorteller::ColorTellerServer;
pub use gateway::{GatewayServer, GatewayState};
pub use request::X_REQUEST_ID;
