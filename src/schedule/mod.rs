//! Layer timing and cascade bookkeeping.
//!
//! This module provides:
//! - Period-aligned emission delays for each layer
//! - A clock abstraction for the driver's blocking waits
//! - The per-layer energy accumulator

pub mod clock;
pub mod scheduler;
pub mod statistics;

pub use clock::{Clock, SystemClock};
pub use scheduler::LayerScheduler;
pub use statistics::CascadeStatistics;
