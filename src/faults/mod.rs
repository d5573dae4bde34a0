//! Fault injection for the colorteller.
//!
//! # Data Flow
//! ```text
//! GET / on the colorteller
//!     → FaultInjector::inject
//!         → optional sleep (TEST_RESPONSE_DELAY ms)
//!         → PeriodicError::tick (shared atomic counter)
//!     → Outcome::Respond  → 200 with the configured color
//!     → Outcome::Fail     → 500 with a diagnostic body
//! ```
//!
//! # Design Decisions
//! - Counter is owned by the injector, not a process global
//! - Counter update is a single atomic read-modify-write, so concurrent
//!   invocations each observe a distinct position in the period

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use crate::config::ColorTellerConfig;
use crate::observability::metrics;

/// Position of one invocation within the error period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Configured error period.
    pub period: u32,
    /// Counter value after this invocation's increment (1..=period).
    pub counter: u32,
    /// Whether this invocation must fail.
    pub fail: bool,
}

/// Deterministic "fail every Nth call" generator.
#[derive(Debug)]
pub struct PeriodicError {
    period: u32,
    counter: AtomicU32,
}

impl PeriodicError {
    /// Create a generator failing every `period` invocations.
    ///
    /// Returns `None` for a period of zero (disabled).
    pub fn new(period: u32) -> Option<Self> {
        (period > 0).then(|| Self {
            period,
            counter: AtomicU32::new(0),
        })
    }

    pub fn period(&self) -> u32 {
        self.period
    }

    /// Count one invocation.
    ///
    /// The counter wraps back to 1 on the call after it reaches the period;
    /// the call that makes it equal to the period fails.
    pub fn tick(&self) -> Tick {
        let period = self.period;
        let advance = |c: u32| if c >= period { 1 } else { c + 1 };
        // The closure always returns Some, so both arms carry the previous value.
        let previous = match self
            .counter
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some(advance(c)))
        {
            Ok(prev) | Err(prev) => prev,
        };
        let counter = advance(previous);
        Tick {
            period,
            counter,
            fail: counter == period,
        }
    }
}

/// What the colorteller should answer for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Respond,
    Fail(Tick),
}

/// Response delay plus optional periodic error.
#[derive(Debug, Default)]
pub struct FaultInjector {
    delay: Duration,
    periodic: Option<PeriodicError>,
}

impl FaultInjector {
    pub fn new(delay: Duration, periodic_error: u32) -> Self {
        Self {
            delay,
            periodic: PeriodicError::new(periodic_error),
        }
    }

    pub fn from_config(config: &ColorTellerConfig) -> Self {
        Self::new(
            Duration::from_millis(config.response_delay_ms),
            config.periodic_error,
        )
    }

    pub fn periodic_error(&self) -> Option<u32> {
        self.periodic.as_ref().map(PeriodicError::period)
    }

    /// Apply the configured faults to one invocation.
    ///
    /// Suspends the caller for the full delay before deciding the outcome.
    pub async fn inject(&self) -> Outcome {
        if !self.delay.is_zero() {
            tracing::debug!(delay_ms = self.delay.as_millis() as u64, "Delaying response");
            metrics::record_injected_fault("delay");
            tokio::time::sleep(self.delay).await;
        }

        match &self.periodic {
            Some(periodic) => {
                let tick = periodic.tick();
                tracing::debug!(counter = tick.counter, period = periodic.period(), "Periodic error counter");
                if tick.fail {
                    metrics::record_injected_fault("periodic_error");
                    Outcome::Fail(tick)
                } else {
                    Outcome::Respond
                }
            }
            None => Outcome::Respond,
        }
    }
}
