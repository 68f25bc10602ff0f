//! Per-layer energy accumulator for one cascade run.

use serde::{Deserialize, Serialize};

/// Energy recorded for each completed layer, plus the running total.
///
/// Entries start at zero and are written at most once, by the cascade driver,
/// after the layer's frame reached the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeStatistics {
    layer_energies: Vec<f64>,
    recorded: Vec<bool>,
    total_energy: f64,
}

impl CascadeStatistics {
    pub fn new(layers: u32) -> Self {
        Self {
            layer_energies: vec![0.0; layers as usize],
            recorded: vec![false; layers as usize],
            total_energy: 0.0,
        }
    }

    /// Record the energy of a completed layer.
    ///
    /// Returns `false` (and changes nothing) if the layer is out of range or
    /// was already recorded.
    pub(crate) fn record(&mut self, layer: u32, energy: f64) -> bool {
        let index = layer as usize;
        match self.recorded.get(index) {
            Some(false) => {
                self.recorded[index] = true;
                self.layer_energies[index] = energy;
                self.total_energy += energy;
                true
            }
            _ => false,
        }
    }

    pub fn layer_count(&self) -> usize {
        self.layer_energies.len()
    }

    pub fn layer_energies(&self) -> &[f64] {
        &self.layer_energies
    }

    /// Recorded energy of `layer`; zero if it never completed.
    pub fn layer_energy(&self, layer: u32) -> f64 {
        self.layer_energies
            .get(layer as usize)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_recorded(&self, layer: u32) -> bool {
        self.recorded.get(layer as usize).copied().unwrap_or(false)
    }

    /// Number of layers recorded so far.
    pub fn recorded_count(&self) -> usize {
        self.recorded.iter().filter(|&&r| r).count()
    }

    pub fn total_energy(&self) -> f64 {
        self.total_energy
    }
}
