//! Traffic statistics subsystem.
//!
//! # Data Flow
//! ```text
//! Successful upstream fetch
//!     → history.rs (ColorStats::record, ring buffer append under mutex)
//!     → HistorySnapshot (owned copy, lock released)
//!     → report.rs (count per color, divide, round to 2 decimals)
//!     → RatioReport (serialized into /color and /stats responses)
//!
//! Clear request
//!     → history.rs (ColorStats::clear, all slots emptied, cursor to 0)
//! ```
//!
//! # Design Decisions
//! - Only validated successes reach `record`; failures never touch the window
//! - Lock is held for the copy only, the counting pass runs outside it
//! - Capacity is a const generic so tests can exercise wraparound cheaply

pub mod history;
pub mod report;

pub use history::{Color, ColorStats, HistorySnapshot, RollingWindow, HISTORY_CAPACITY};
pub use report::RatioReport;
