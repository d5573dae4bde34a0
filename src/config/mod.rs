//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → loader.rs (read variables, parse numbers)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig / ColorTellerConfig (validated, immutable)
//!     → moved into the server at construction
//! ```
//!
//! # Design Decisions
//! - Read once at startup; handlers never consult the environment
//! - Loading goes through a lookup function so tests avoid `std::env::set_var`
//! - Validation separates parsing from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::ConfigError;
pub use schema::{ColorTellerConfig, GatewayConfig, ObservabilityConfig, TimeoutConfig};
