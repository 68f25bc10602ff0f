//! Layer energy, pixel resonance and frame rendering.
//!
//! Energy decays as `E(d) = e^{-αd}` across layers. Each pixel modulates that
//! energy with a spatial sine of wavelength `1/α` along the `x + y` diagonal
//! and a temporal sine that completes one period over the whole cascade.

use std::f64::consts::PI;

use super::buffer::{Pixel, PixelBuffer};
use crate::params::{ConfigError, ResonanceParameters};

/// Mask applied to even layers.
const EVEN_LAYER_MASK: u8 = 0xAA;
/// Mask applied to odd layers.
const ODD_LAYER_MASK: u8 = 0x55;

const SPATIAL_DEPTH: f64 = 0.3;
const TEMPORAL_DEPTH: f64 = 0.2;

/// Stateless resonance field generator.
///
/// All methods are pure functions of their arguments and the parameters the
/// generator was built with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResonanceGenerator {
    alpha: f64,
    layers: u32,
    wavelength: f64,
}

impl ResonanceGenerator {
    /// Create a generator, validating the parameters first.
    pub fn new(params: &ResonanceParameters) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            alpha: params.alpha,
            layers: params.layers,
            wavelength: params.wavelength(),
        })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn layers(&self) -> u32 {
        self.layers
    }

    /// Base energy of a layer: `exp(-α * layer)`.
    pub fn layer_energy(&self, layer: u32) -> f64 {
        (-self.alpha * layer as f64).exp()
    }

    /// Combined resonance of one pixel in one layer.
    pub fn pixel_resonance(&self, layer: u32, x: u32, y: u32) -> f64 {
        let base = self.layer_energy(layer);
        let diagonal = x as f64 + y as f64;
        let spatial = (2.0 * PI * diagonal / self.wavelength).sin();
        let temporal = (2.0 * PI * layer as f64 / self.layers as f64).sin();

        base * (1.0 + SPATIAL_DEPTH * spatial) * (1.0 + TEMPORAL_DEPTH * temporal)
    }

    /// Render a full `width × height` frame for `layer`.
    #[cfg(feature = "parallel")]
    pub fn render_layer_buffer(&self, layer: u32, width: u32, height: u32) -> PixelBuffer {
        use rayon::prelude::*;

        let mut buffer = PixelBuffer::new(width, height);
        buffer
            .par_rows_mut()
            .enumerate()
            .for_each(|(y, row)| self.render_row(layer, y as u32, row));
        buffer
    }

    /// Render a full `width × height` frame for `layer`.
    #[cfg(not(feature = "parallel"))]
    pub fn render_layer_buffer(&self, layer: u32, width: u32, height: u32) -> PixelBuffer {
        self.render_layer_buffer_sequential(layer, width, height)
    }

    /// Single-threaded rendering. Produces the same buffer as
    /// [`render_layer_buffer`](Self::render_layer_buffer).
    pub fn render_layer_buffer_sequential(
        &self,
        layer: u32,
        width: u32,
        height: u32,
    ) -> PixelBuffer {
        let mut buffer = PixelBuffer::new(width, height);
        for (y, row) in buffer.rows_mut().enumerate() {
            self.render_row(layer, y as u32, row);
        }
        buffer
    }

    fn render_row(&self, layer: u32, y: u32, row: &mut [Pixel]) {
        for (x, pixel) in row.iter_mut().enumerate() {
            let resonance = self.pixel_resonance(layer, x as u32, y);
            *pixel = derive_pixel(resonance, layer);
        }
    }
}

/// XOR mask for a layer: `0xAA` on even layers, `0x55` on odd ones.
pub fn parity_mask(layer: u32) -> u8 {
    if layer % 2 == 0 {
        EVEN_LAYER_MASK
    } else {
        ODD_LAYER_MASK
    }
}

/// Derive the RGBA bytes for a resonance value.
///
/// Channels are `floor(255 * v) mod 256` (Euclidean, so negatives wrap into
/// `0..=255`) for `v` in `{res, sin(res·π), cos(res·π)}`, then XOR-ed with the
/// layer's [`parity_mask`]. Alpha is always opaque.
pub fn derive_pixel(resonance: f64, layer: u32) -> Pixel {
    let mask = parity_mask(layer);
    let r = to_byte(255.0 * resonance);
    let g = to_byte(255.0 * (resonance * PI).sin());
    let b = to_byte(255.0 * (resonance * PI).cos());

    Pixel::new(r ^ mask, g ^ mask, b ^ mask, 255)
}

#[inline]
fn to_byte(value: f64) -> u8 {
    // `as` saturates NaN/inf, so this never panics
    (value.floor() as i64).rem_euclid(256) as u8
}
