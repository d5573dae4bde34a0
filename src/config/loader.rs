//! Configuration loading from the process environment.

use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

use crate::config::schema::{ColorTellerConfig, GatewayConfig, ObservabilityConfig, DEFAULT_COLOR, DEFAULT_PORT};
use crate::config::validation::{validate_gateway_config, ValidationError};

pub const COLOR_TELLER_ENDPOINT: &str = "COLOR_TELLER_ENDPOINT";
pub const SERVER_PORT: &str = "SERVER_PORT";
pub const UPSTREAM_TIMEOUT_MS: &str = "UPSTREAM_TIMEOUT_MS";
pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
pub const METRICS_ADDRESS: &str = "METRICS_ADDRESS";
pub const COLOR: &str = "COLOR";
pub const TEST_RESPONSE_DELAY: &str = "TEST_RESPONSE_DELAY";
pub const TEST_PERIODIC_ERROR: &str = "TEST_PERIODIC_ERROR";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid {var} ({value:?}): {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// Parsed values failed semantic checks.
    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load the gateway configuration from the process environment.
pub fn load_gateway_config() -> Result<GatewayConfig, ConfigError> {
    gateway_config_from(|var| std::env::var(var).ok())
}

/// Load the colorteller configuration from the process environment.
pub fn load_color_teller_config() -> Result<ColorTellerConfig, ConfigError> {
    color_teller_config_from(|var| std::env::var(var).ok())
}

/// Build and validate a gateway configuration from a variable lookup.
pub fn gateway_config_from<F>(lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let endpoint = non_blank(&lookup, COLOR_TELLER_ENDPOINT).ok_or(ConfigError::Missing(COLOR_TELLER_ENDPOINT))?;

    let mut config = GatewayConfig::new(endpoint);
    config.port = parse_var(&lookup, SERVER_PORT, DEFAULT_PORT)?;
    config.timeouts.upstream_ms = parse_var(&lookup, UPSTREAM_TIMEOUT_MS, config.timeouts.upstream_ms)?;
    config.timeouts.request_secs = parse_var(&lookup, REQUEST_TIMEOUT_SECS, config.timeouts.request_secs)?;
    config.observability = observability_from(&lookup);

    validate_gateway_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a colorteller configuration from a variable lookup.
///
/// Unparseable fault settings are logged and disable the fault.
pub fn color_teller_config_from<F>(lookup: F) -> Result<ColorTellerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(ColorTellerConfig {
        color: non_blank(&lookup, COLOR).unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        port: parse_var(&lookup, SERVER_PORT, DEFAULT_PORT)?,
        response_delay_ms: parse_or_disable(&lookup, TEST_RESPONSE_DELAY),
        periodic_error: parse_or_disable(&lookup, TEST_PERIODIC_ERROR),
        observability: observability_from(&lookup),
    })
}

fn observability_from<F>(lookup: &F) -> ObservabilityConfig
where
    F: Fn(&str) -> Option<String>,
{
    ObservabilityConfig {
        metrics_address: non_blank(lookup, METRICS_ADDRESS),
    }
}

fn non_blank<F>(lookup: &F, var: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match non_blank(lookup, var) {
        Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_or_disable<F, T>(lookup: &F, var: &'static str) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Default,
    T::Err: Display,
{
    parse_var(lookup, var, T::default()).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to parse fault setting, leaving it disabled");
        T::default()
    })
}
