//! Period-aligned layer scheduling.
//!
//! Each layer picks one of a small set of periods round-robin and waits until
//! the clock reaches the next multiple of that period.

use std::sync::Arc;
use std::time::Duration;

use super::clock::{Clock, SystemClock};
use crate::params::{ConfigError, ResonanceParameters};

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Computes how long to wait before emitting a layer.
#[derive(Clone)]
pub struct LayerScheduler {
    periods: Vec<u64>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for LayerScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerScheduler")
            .field("periods", &self.periods)
            .finish_non_exhaustive()
    }
}

impl LayerScheduler {
    /// Scheduler on the system clock.
    pub fn new(params: &ResonanceParameters) -> Result<Self, ConfigError> {
        Self::with_clock(params, Arc::new(SystemClock))
    }

    /// Scheduler on a caller-supplied clock.
    pub fn with_clock(
        params: &ResonanceParameters,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            periods: params.alignment_periods.clone(),
            clock,
        })
    }

    pub fn periods(&self) -> &[u64] {
        &self.periods
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Alignment period (microseconds) used by `layer`.
    pub fn period_for(&self, layer: u32) -> u64 {
        self.periods[layer as usize % self.periods.len()]
    }

    /// Microseconds from `now_micros` to the next multiple of the layer's period.
    ///
    /// Zero when `now_micros` is already a multiple.
    pub fn alignment_wait_micros(&self, layer: u32, now_micros: u64) -> u64 {
        let period = self.period_for(layer);
        (period - now_micros % period) % period
    }

    /// Delay in seconds before emitting `layer`, given the current time.
    ///
    /// Always in `[0, period / 1e6)`.
    pub fn next_alignment_delay(&self, layer: u32, now_micros: u64) -> f64 {
        self.alignment_wait_micros(layer, now_micros) as f64 / MICROS_PER_SECOND
    }

    /// Delay before emitting `layer`, measured against the scheduler's clock.
    pub fn next_alignment_wait(&self, layer: u32) -> Duration {
        let now = self.clock.now_micros();
        Duration::from_micros(self.alignment_wait_micros(layer, now))
    }
}
