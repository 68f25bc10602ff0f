//! Resonance parameters shared by the generator and the scheduler.

use serde::{Deserialize, Serialize};

/// Reference decay coefficient.
pub const DEFAULT_ALPHA: f64 = 0.0302011;
/// Reference layer count.
pub const DEFAULT_LAYERS: u32 = 33;
/// Reference alignment periods in microseconds. Primes, so that no two
/// periods line up often.
pub const DEFAULT_ALIGNMENT_PERIODS: [u64; 5] = [10007, 10009, 10037, 10039, 10061];

/// Immutable generator/scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResonanceParameters {
    /// Decay coefficient α. Must be finite and positive.
    pub alpha: f64,
    /// Number of layers in the cascade.
    pub layers: u32,
    /// Alignment periods in microseconds, selected round-robin by layer.
    pub alignment_periods: Vec<u64>,
}

impl Default for ResonanceParameters {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            layers: DEFAULT_LAYERS,
            alignment_periods: DEFAULT_ALIGNMENT_PERIODS.to_vec(),
        }
    }
}

impl ResonanceParameters {
    /// Reject parameters no layer could run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(ConfigError::NonPositiveAlpha(self.alpha));
        }
        if self.layers == 0 {
            return Err(ConfigError::NoLayers);
        }
        if self.alignment_periods.is_empty() {
            return Err(ConfigError::EmptyAlignmentPeriods);
        }
        if let Some(index) = self.alignment_periods.iter().position(|&p| p == 0) {
            return Err(ConfigError::ZeroAlignmentPeriod { index });
        }
        Ok(())
    }

    /// Spatial wavelength in pixels (`1 / α`).
    pub fn wavelength(&self) -> f64 {
        1.0 / self.alpha
    }
}

/// Invalid configuration, detected before any layer runs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Decay coefficient must be finite and > 0, got {0}")]
    NonPositiveAlpha(f64),
    #[error("Layer count must be at least 1")]
    NoLayers,
    #[error("At least one alignment period is required")]
    EmptyAlignmentPeriods,
    #[error("Alignment period at index {index} is zero")]
    ZeroAlignmentPeriod { index: usize },
    #[error("Frame size must be non-zero, got {width}x{height}")]
    EmptyFrame { width: u32, height: u32 },
}
