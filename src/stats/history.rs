//! Rolling history of observed colors.
//!
//! # Responsibilities
//! - Hold the last `HISTORY_CAPACITY` successful results in a ring buffer
//! - Serialize concurrent `record`, `snapshot` and `clear` through one mutex
//! - Hand out owned snapshots so ratio counting never holds the lock

use serde::Serialize;
use std::borrow::Borrow;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::stats::report::RatioReport;

/// Number of results retained by the gateway.
pub const HISTORY_CAPACITY: usize = 1000;

/// A color label produced by the colorteller.
///
/// Only compared for equality; the gateway never interprets its content.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(Arc<str>);

impl Color {
    /// Build a color from a raw upstream body.
    ///
    /// Surrounding whitespace is trimmed; a blank body yields `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(Arc::from(trimmed)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Color {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Fixed-capacity ring buffer with overwrite-on-wrap semantics.
///
/// Unwritten slots are `None`. Not synchronized; see [`ColorStats`].
#[derive(Debug, Clone)]
pub struct RollingWindow<T, const N: usize> {
    slots: [Option<T>; N],
    cursor: usize,
}

impl<T, const N: usize> RollingWindow<T, N> {
    const NON_ZERO: () = assert!(N > 0, "rolling window capacity must be non-zero");

    /// Create an empty window with the cursor at slot 0.
    pub fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_ZERO;
        Self {
            slots: std::array::from_fn(|_| None),
            cursor: 0,
        }
    }

    /// Write `value` at the cursor and advance it, wrapping at `N`.
    pub fn push(&mut self, value: T) {
        self.slots[self.cursor] = Some(value);
        self.cursor = (self.cursor + 1) % N;
    }

    /// Empty every slot and rewind the cursor.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.cursor = 0;
    }

    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of written (non-empty) slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}

impl<T, const N: usize> Default for RollingWindow<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable copy of the history taken inside the critical section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySnapshot {
    slots: Vec<Option<Color>>,
    cursor: usize,
}

impl HistorySnapshot {
    pub fn slots(&self) -> &[Option<Color>] {
        &self.slots
    }

    /// Write position at the time of the snapshot.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of non-empty slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Count occurrences of `color` among the non-empty slots.
    pub fn count_of(&self, color: &str) -> usize {
        self.colors().filter(|c| c.as_str() == color).count()
    }

    /// Iterate the recorded colors in slot order, skipping empty slots.
    pub fn colors(&self) -> impl Iterator<Item = &Color> {
        self.slots.iter().flatten()
    }

    /// Compute the per-color ratio report for this snapshot.
    pub fn ratios(&self) -> RatioReport {
        RatioReport::from_slots(&self.slots)
    }
}

impl<const N: usize> From<&RollingWindow<Color, N>> for HistorySnapshot {
    fn from(window: &RollingWindow<Color, N>) -> Self {
        Self {
            slots: window.slots().to_vec(),
            cursor: window.cursor(),
        }
    }
}

/// Thread-safe color history shared by all gateway request handlers.
///
/// Every operation takes the same mutex, so an append and its cursor
/// advance are indivisible with respect to snapshots and clears.
#[derive(Debug)]
pub struct ColorStats<const N: usize = HISTORY_CAPACITY> {
    window: Mutex<RollingWindow<Color, N>>,
}

impl<const N: usize> ColorStats<N> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            window: Mutex::new(RollingWindow::new()),
        }
    }

    // Critical sections never panic mid-update, so a poisoned guard
    // still protects a consistent window.
    fn lock(&self) -> MutexGuard<'_, RollingWindow<Color, N>> {
        self.window.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a color, overwriting the oldest entry once full.
    pub fn record(&self, color: Color) {
        self.lock().push(color);
    }

    /// Append a color and copy the resulting history in one critical section.
    pub fn record_and_snapshot(&self, color: Color) -> HistorySnapshot {
        let mut window = self.lock();
        window.push(color);
        HistorySnapshot::from(&*window)
    }

    /// Copy the current history.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot::from(&*self.lock())
    }

    /// Ratio report over the current history.
    pub fn ratios(&self) -> RatioReport {
        self.snapshot().ratios()
    }

    /// Empty the history and rewind the cursor.
    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl<const N: usize> Default for ColorStats<N> {
    fn default() -> Self {
        Self::new()
    }
}
