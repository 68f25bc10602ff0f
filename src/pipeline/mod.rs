//! Cascade driver: walks every layer in order, renders it, hands it to a
//! sink and accumulates the energy statistics.

mod report;

pub use report::{cascade_factor, theoretical_cascade_sum, CascadeReport};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::params::{ConfigError, ResonanceParameters};
use crate::schedule::{CascadeStatistics, Clock, LayerScheduler, SystemClock};
use crate::signal::ResonanceGenerator;
use crate::sink::LayerSink;

/// Cascade configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub params: ResonanceParameters,
    pub width: u32,
    pub height: u32,
    /// Pause after each layer except the last, in milliseconds.
    pub settle_delay_ms: u64,
    /// Wait for each layer's alignment period before rendering it.
    pub align_timing: bool,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            params: ResonanceParameters::default(),
            width: 640,
            height: 480,
            settle_delay_ms: 10,
            align_timing: true,
        }
    }
}

impl CascadeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyFrame {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Errors that can occur when running a cascade.
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("Cascade has already been run")]
    AlreadyRun,
}

/// Lifecycle of a [`CascadeDriver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeState {
    NotStarted,
    Running { layer: u32 },
    Completed,
    /// Stopped by a [`CancellationToken`] before `at_layer` started.
    Cancelled { at_layer: u32 },
}

/// Cooperative cancellation flag, checked between layers.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Callback run once after the final layer reached the sink.
///
/// The cascade attaches no meaning to the payload; it is passed through as is.
pub struct CompletionHook {
    payload: Vec<u8>,
    callback: Box<dyn FnOnce(&[u8]) + Send>,
}

impl CompletionHook {
    pub fn new<F>(payload: Vec<u8>, callback: F) -> Self
    where
        F: FnOnce(&[u8]) + Send + 'static,
    {
        Self {
            payload,
            callback: Box::new(callback),
        }
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    fn invoke(self) {
        (self.callback)(&self.payload);
    }
}

impl std::fmt::Debug for CompletionHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionHook")
            .field("payload_len", &self.payload.len())
            .finish_non_exhaustive()
    }
}

/// Runs one cascade over all configured layers.
#[derive(Debug)]
pub struct CascadeDriver {
    config: CascadeConfig,
    generator: ResonanceGenerator,
    scheduler: LayerScheduler,
    statistics: CascadeStatistics,
    state: CascadeState,
}

impl CascadeDriver {
    /// Validate `config` and build a driver on the system clock.
    pub fn new(config: CascadeConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Validate `config` and build a driver whose waits go through `clock`.
    pub fn with_clock(config: CascadeConfig, clock: Arc<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = ResonanceGenerator::new(&config.params)?;
        let scheduler = LayerScheduler::with_clock(&config.params, clock)?;
        let statistics = CascadeStatistics::new(config.params.layers);

        Ok(Self {
            config,
            generator,
            scheduler,
            statistics,
            state: CascadeState::NotStarted,
        })
    }

    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }

    pub fn generator(&self) -> &ResonanceGenerator {
        &self.generator
    }

    pub fn scheduler(&self) -> &LayerScheduler {
        &self.scheduler
    }

    pub fn statistics(&self) -> &CascadeStatistics {
        &self.statistics
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    /// Run every layer in order.
    ///
    /// A sink failure is logged and the layer skipped; it never aborts the
    /// cascade. `completion` runs at most once, after the final layer was
    /// delivered successfully. `cancel` is checked before each layer.
    pub fn run(
        &mut self,
        sink: &mut dyn LayerSink,
        completion: Option<CompletionHook>,
        cancel: Option<&CancellationToken>,
    ) -> Result<CascadeReport, CascadeError> {
        if self.state != CascadeState::NotStarted {
            return Err(CascadeError::AlreadyRun);
        }

        let layers = self.config.params.layers;
        let last_layer = layers - 1;
        let (width, height) = (self.config.width, self.config.height);
        let clock = Arc::clone(self.scheduler.clock());
        let settle = self.config.settle_delay();

        log::info!(
            "Starting {}-layer cascade at {}x{} (alpha = {})",
            layers,
            width,
            height,
            self.config.params.alpha
        );

        let mut completion = completion;
        let mut completion_invoked = false;
        let mut successful_layers = Vec::with_capacity(layers as usize);
        let mut failed_layers = Vec::new();

        for layer in 0..layers {
            if cancel.is_some_and(CancellationToken::is_cancelled) {
                log::warn!("Cascade cancelled before layer {}", layer);
                self.state = CascadeState::Cancelled { at_layer: layer };
                break;
            }
            self.state = CascadeState::Running { layer };

            let energy = self.generator.layer_energy(layer);
            if self.config.align_timing {
                let wait = self.scheduler.next_alignment_wait(layer);
                log::debug!(
                    "Layer {}: energy {:.6}, period {}us, delay {:.2}ms",
                    layer,
                    energy,
                    self.scheduler.period_for(layer),
                    wait.as_secs_f64() * 1000.0
                );
                clock.sleep(wait);
            }

            let buffer = self.generator.render_layer_buffer(layer, width, height);

            match sink.deliver(layer, &buffer) {
                Ok(()) => {
                    self.statistics.record(layer, energy);
                    successful_layers.push(layer);

                    if layer == last_layer {
                        if let Some(hook) = completion.take() {
                            log::debug!("Invoking completion hook ({} bytes)", hook.payload().len());
                            hook.invoke();
                            completion_invoked = true;
                        }
                    }
                }
                Err(err) => {
                    log::warn!("Layer {} failed: {}", layer, err);
                    failed_layers.push(layer);
                }
            }

            if layer != last_layer {
                clock.sleep(settle);
            }
        }

        if !matches!(self.state, CascadeState::Cancelled { .. }) {
            self.state = CascadeState::Completed;
        }

        let report = CascadeReport::new(
            &self.config.params,
            self.state,
            self.statistics.clone(),
            successful_layers,
            failed_layers,
            completion_invoked,
        );

        log::info!(
            "Cascade finished: {}/{} layers, energy {:.6} of {:.6} ({:.1}%)",
            report.successful_layers.len(),
            layers,
            report.statistics.total_energy(),
            report.cascade_factor,
            report.efficiency * 100.0
        );

        Ok(report)
    }
}

/// Build a driver from `config` and run it on the system clock.
pub fn run_cascade(
    config: CascadeConfig,
    sink: &mut dyn LayerSink,
    completion: Option<CompletionHook>,
) -> Result<CascadeReport, CascadeError> {
    let mut driver = CascadeDriver::new(config)?;
    driver.run(sink, completion, None)
}
