//! Color gateway and fault-injectable colorteller.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                   GATEWAY                    │
//!   GET /color         │  ┌─────────┐   ┌──────────┐   ┌───────────┐  │     GET /
//!  ────────────────────┼─▶│  http   │──▶│ upstream │───┼───────────┼──┼──────────────▶ COLORTELLER
//!                      │  │ gateway │   │  fetch   │◀──┼───────────┼──┼─────────────── (faults:
//!                      │  └────┬────┘   └──────────┘   │           │  │  delay, periodic 500)
//!                      │       │ success only          │           │  │
//!                      │       ▼                       │           │  │
//!   GET /stats         │  ┌──────────────────────┐     │           │  │
//!  ────────────────────┼─▶│ stats: rolling window │    │           │  │
//!   GET /color/clear   │  │ (1000 slots) + ratios │    │           │  │
//!  ────────────────────┼─▶└──────────────────────┘     │           │  │
//!                      │                               └───────────┘  │
//!                      │  config · observability · lifecycle          │
//!                      └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod stats;
pub mod upstream;

// Colorteller
pub mod faults;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::{ColorTellerConfig, GatewayConfig};
pub use http::{ColorTellerServer, GatewayServer};
pub use lifecycle::Shutdown;
pub use stats::{Color, ColorStats, RatioReport};
