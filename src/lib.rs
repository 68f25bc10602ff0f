//! Resonance Cascade
//!
//! Layered resonance field generator with period-aligned layer scheduling.
//!
//! # Features
//!
//! - Closed-form energy decay `E(d) = e^{-αd}` across a fixed number of layers
//! - Per-pixel spatial and temporal resonance rendered into RGBA frames
//! - Row-parallel rendering via rayon (`parallel` feature, on by default)
//! - Emission delays aligned to a rotating set of microsecond periods
//! - Pluggable frame sinks (memory, PNG files, display pump thread)
//! - Cancellable cascade driver with a serialisable end-of-run report

pub mod params;
pub mod pipeline;
pub mod schedule;
pub mod signal;
pub mod sink;

// Re-export commonly used types
pub use params::{ConfigError, ResonanceParameters};
pub use pipeline::{
    cascade_factor, run_cascade, theoretical_cascade_sum, CancellationToken, CascadeConfig,
    CascadeDriver, CascadeError, CascadeReport, CascadeState, CompletionHook,
};
pub use schedule::{CascadeStatistics, Clock, LayerScheduler, SystemClock};
pub use signal::{derive_pixel, Pixel, PixelBuffer, ResonanceGenerator};
pub use sink::{
    spawn_display_pump, ChannelSink, DisplayPump, ImageSink, LayerFrame, LayerSink, MemorySink,
    NullSink, SinkError,
};
