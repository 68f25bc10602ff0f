//! Resonance field generation.
//!
//! This module provides:
//! - Closed-form layer energy decay
//! - Per-pixel spatial/temporal resonance
//! - Byte derivation with per-layer parity masking
//! - Full-frame RGBA buffers (row-parallel with the `parallel` feature)

pub mod buffer;
pub mod generator;

pub use buffer::{Pixel, PixelBuffer};
pub use generator::{derive_pixel, parity_mask, ResonanceGenerator};
