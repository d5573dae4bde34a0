//! Gateway response bodies.
//!
//! # Design Decisions
//! - `color` is omitted when unset; `stats` is omitted only when unset, so an
//!   empty history still serializes as `"stats": {}`
//! - Failure bodies are fixed strings; internal error text stays in the logs

use serde::Serialize;

use crate::stats::{Color, RatioReport};

/// Body returned for any failed color fetch.
pub const INTERNAL_ERROR_BODY: &str = "500 - Internal Error";

/// Body returned after the history is cleared.
pub const CLEARED_BODY: &str = "cleared";

/// JSON body for `/color` and `/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<RatioReport>,
}

impl ColorResponse {
    /// A fetched color together with the ratios after recording it.
    pub fn fetched(color: Color, stats: RatioReport) -> Self {
        Self {
            color: Some(color),
            stats: Some(stats),
        }
    }

    /// Current ratios only.
    pub fn stats_only(stats: RatioReport) -> Self {
        Self {
            color: None,
            stats: Some(stats),
        }
    }
}

/// Returned instead of [`ColorResponse`] when the stats could not be serialized.
#[derive(Debug, Clone, Serialize)]
pub struct DegradedColorResponse {
    pub color: Color,
    pub error: String,
}
