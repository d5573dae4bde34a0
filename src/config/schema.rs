//! Configuration schema definitions.
//!
//! Both services share the listener, timeout and observability sections;
//! service-specific fields live on the root structs.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

/// Default listen port for both services.
pub const DEFAULT_PORT: u16 = 8080;

/// Color returned by a colorteller with no `COLOR` set.
pub const DEFAULT_COLOR: &str = "black";

/// Listen addresses for `port`, in bind order.
///
/// The IPv6 wildcard comes first and accepts IPv4 clients on dual-stack
/// hosts. The IPv4 wildcard is the fallback where IPv6 is unavailable.
pub fn listen_addresses(port: u16) -> [SocketAddr; 2] {
    [
        SocketAddr::from((Ipv6Addr::UNSPECIFIED, port)),
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)),
    ]
}

/// Root configuration for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Colorteller address without scheme (e.g., "colorteller:8080").
    pub color_teller_endpoint: String,

    /// Listen port.
    pub port: u16,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Create a config for the given endpoint with default settings.
    pub fn new(color_teller_endpoint: impl Into<String>) -> Self {
        Self {
            color_teller_endpoint: color_teller_endpoint.into(),
            port: DEFAULT_PORT,
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }

    /// Full URL the gateway fetches colors from.
    pub fn color_teller_url(&self) -> String {
        format!("http://{}", self.color_teller_endpoint)
    }

    pub fn bind_addresses(&self) -> [SocketAddr; 2] {
        listen_addresses(self.port)
    }
}

/// Root configuration for the colorteller.
#[derive(Debug, Clone)]
pub struct ColorTellerConfig {
    /// Color returned on every successful invocation.
    pub color: String,

    /// Listen port.
    pub port: u16,

    /// Delay applied before every response, in milliseconds (0 = none).
    pub response_delay_ms: u64,

    /// Fail every Nth invocation with a 500 (0 = never).
    pub periodic_error: u32,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ColorTellerConfig {
    pub fn bind_addresses(&self) -> [SocketAddr; 2] {
        listen_addresses(self.port)
    }
}

impl Default for ColorTellerConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            port: DEFAULT_PORT,
            response_delay_ms: 0,
            periodic_error: 0,
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Timeout configuration for the gateway.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Deadline for one colorteller fetch, in milliseconds.
    pub upstream_ms: u64,

    /// Deadline for one inbound request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_ms: 5_000,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Prometheus scrape endpoint bind address; disabled when unset.
    pub metrics_address: Option<String>,
}
