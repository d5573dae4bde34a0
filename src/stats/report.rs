//! Per-color ratio computation.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::stats::history::Color;

/// Fraction of non-empty history slots held by each distinct color.
///
/// Each fraction is rounded independently to two decimals (half away from
/// zero), so the values need not sum to exactly 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RatioReport(BTreeMap<Color, f64>);

impl RatioReport {
    /// Count every non-empty slot in a single pass and derive the ratios.
    ///
    /// An all-empty input yields an empty report.
    pub fn from_slots<'a, I>(slots: I) -> Self
    where
        I: IntoIterator<Item = &'a Option<Color>>,
    {
        let mut counts: HashMap<&Color, usize> = HashMap::new();
        let mut total = 0usize;
        for color in slots.into_iter().flatten() {
            *counts.entry(color).or_default() += 1;
            total += 1;
        }

        if total == 0 {
            return Self::default();
        }

        let ratios = counts
            .into_iter()
            .map(|(color, count)| (color.clone(), round_ratio(count as f64 / total as f64)))
            .collect();
        Self(ratios)
    }

    pub fn get(&self, color: &str) -> Option<f64> {
        self.0.get(color).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Color, f64)> {
        self.0.iter().map(|(color, ratio)| (color, *ratio))
    }
}

/// Round to two decimals, ties away from zero.
pub fn round_ratio(ratio: f64) -> f64 {
    (ratio * 100.0).round() / 100.0
}
