//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (parsing is done by the loader)
//! - Check the colorteller endpoint forms a usable HTTP URL
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidEndpoint { endpoint: String, reason: String },
    ZeroTimeout(&'static str),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidEndpoint { endpoint, reason } => {
                write!(f, "invalid colorteller endpoint {:?}: {}", endpoint, reason)
            }
            ValidationError::ZeroTimeout(name) => write!(f, "{} must be greater than zero", name),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a gateway configuration.
pub fn validate_gateway_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.color_teller_url()) {
        Ok(url) if url.host_str().map_or(true, str::is_empty) => {
            errors.push(ValidationError::InvalidEndpoint {
                endpoint: config.color_teller_endpoint.clone(),
                reason: "missing host".to_string(),
            });
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidEndpoint {
            endpoint: config.color_teller_endpoint.clone(),
            reason: e.to_string(),
        }),
    }

    if config.timeouts.upstream_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream timeout"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request timeout"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
