//! End-of-run summary.

use serde::Serialize;

use super::CascadeState;
use crate::params::ResonanceParameters;
use crate::schedule::CascadeStatistics;

/// Discrete cascade sum `Σ_{d=0}^{L-1} e^{-αd}`: the total energy of a run
/// where every layer succeeds.
pub fn theoretical_cascade_sum(params: &ResonanceParameters) -> f64 {
    (0..params.layers)
        .map(|d| (-params.alpha * d as f64).exp())
        .sum()
}

/// Continuous cascade factor `∫₀^L e^{-αd} dd = (1 - e^{-αL}) / α`.
pub fn cascade_factor(params: &ResonanceParameters) -> f64 {
    (1.0 - (-params.alpha * params.layers as f64).exp()) / params.alpha
}

/// Summary of a finished (or cancelled) cascade.
#[derive(Debug, Clone, Serialize)]
pub struct CascadeReport {
    pub params: ResonanceParameters,
    pub final_state: CascadeState,
    pub statistics: CascadeStatistics,
    /// Layers whose frame reached the sink, in order.
    pub successful_layers: Vec<u32>,
    /// Layers whose sink delivery failed, in order.
    pub failed_layers: Vec<u32>,
    /// Successful layers over configured layers.
    pub success_rate: f64,
    pub theoretical_sum: f64,
    pub cascade_factor: f64,
    /// Recorded total energy over the continuous cascade factor.
    pub efficiency: f64,
    pub completion_invoked: bool,
}

impl CascadeReport {
    pub(crate) fn new(
        params: &ResonanceParameters,
        final_state: CascadeState,
        statistics: CascadeStatistics,
        successful_layers: Vec<u32>,
        failed_layers: Vec<u32>,
        completion_invoked: bool,
    ) -> Self {
        let success_rate = successful_layers.len() as f64 / params.layers as f64;
        let factor = cascade_factor(params);
        let efficiency = statistics.total_energy() / factor;

        Self {
            params: params.clone(),
            final_state,
            statistics,
            successful_layers,
            failed_layers,
            success_rate,
            theoretical_sum: theoretical_cascade_sum(params),
            cascade_factor: factor,
            efficiency,
            completion_invoked,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.final_state == CascadeState::Completed && self.failed_layers.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
