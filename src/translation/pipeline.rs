/*!
 * Ordered layer pipeline.
 *
 * Runs the configured layers in definition order over a shared context.
 * A failing layer is recorded and skipped over, never fatal: the text
 * simply carries forward unchanged. Panics are caught and converted into
 * layer failures so one bad rule set cannot take the engine down.
 */

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use log::{debug, warn};
use parking_lot::Mutex;

use crate::errors::PipelineError;
use crate::translation::context::TranslationContext;
use crate::translation::layers::TranslationLayer;
use crate::translation::result::{LayerDebugInfo, LayerResult};

/// Lifecycle of a pipeline instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Never executed
    Idle,
    /// An execution is in flight
    Processing,
    /// Last execution finished, possibly with recorded layer failures
    Completed,
    /// Last execution caught a layer panic
    Error,
}

impl PipelineState {
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Idle => "idle".to_string(),
            Self::Processing => "processing".to_string(),
            Self::Completed => "completed".to_string(),
            Self::Error => "error".to_string(),
        }
    }
}

impl std::fmt::Display for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

/// Counters accumulated across executions of one pipeline instance
#[derive(Debug, Clone, Default)]
pub struct PipelineStatistics {
    /// Completed executions
    pub executions: u64,

    /// Layers actually run (skipped layers excluded)
    pub layer_runs: u64,

    /// Layers that failed or panicked
    pub layer_failures: u64,

    /// Wall time across all executions
    pub total_processing_time_ms: u64,
}

impl PipelineStatistics {
    /// Average wall time per execution
    pub fn average_processing_time_ms(&self) -> f64 {
        if self.executions == 0 {
            0.0
        } else {
            self.total_processing_time_ms as f64 / self.executions as f64
        }
    }
}

/// Outcome of one pipeline execution
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// Final text after the last layer that ran
    pub text: String,

    /// Per-layer records in pipeline order, skipped layers included
    pub layers: Vec<LayerDebugInfo>,

    /// Aggregate confidence of the run, 0.0 to 1.0
    pub confidence: f64,

    /// Wall time of the run
    pub duration_ms: u64,
}

impl PipelineRun {
    /// Layers that ran, excluding skipped ones
    pub fn layers_executed(&self) -> usize {
        self.layers.iter().filter(|l| !l.skipped).count()
    }

    /// Whether any layer failed or panicked
    pub fn has_failures(&self) -> bool {
        self.layers.iter().any(|l| l.has_error())
    }
}

/// Ordered sequence of translation layers over a shared context
pub struct TranslationPipeline {
    /// Layers in execution order
    layers: Vec<Arc<dyn TranslationLayer>>,

    /// Current lifecycle state
    state: Mutex<PipelineState>,

    /// Counters across executions
    statistics: Mutex<PipelineStatistics>,
}

impl TranslationPipeline {
    /// Create an empty pipeline
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            state: Mutex::new(PipelineState::Idle),
            statistics: Mutex::new(PipelineStatistics::default()),
        }
    }

    /// Append a layer to the execution order
    pub fn with_layer(mut self, layer: Arc<dyn TranslationLayer>) -> Self {
        self.layers.push(layer);
        self
    }

    /// Number of configured layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Names of the configured layers, in execution order
    pub fn layer_names(&self) -> Vec<String> {
        self.layers.iter().map(|l| l.name().to_string()).collect()
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        *self.state.lock()
    }

    /// Snapshot of the accumulated counters
    pub fn statistics(&self) -> PipelineStatistics {
        self.statistics.lock().clone()
    }

    /// Run every applicable layer over the text
    ///
    /// The only error is a concurrent execution on the same instance; all
    /// layer failures are recorded in the returned run instead. The
    /// context's time budget is checked between layers, and layers past an
    /// exhausted budget are recorded as skipped.
    pub async fn execute(
        &self,
        text: &str,
        context: &mut TranslationContext,
    ) -> Result<PipelineRun, PipelineError> {
        {
            let mut state = self.state.lock();
            if *state == PipelineState::Processing {
                return Err(PipelineError::AlreadyProcessing);
            }
            *state = PipelineState::Processing;
        }

        let started = Instant::now();
        let budget_ms = context.max_processing_time_ms;
        let mut layer_records: Vec<LayerDebugInfo> = Vec::with_capacity(self.layers.len());
        let mut explicit_confidences: Vec<f64> = Vec::new();
        let mut executed = 0u64;
        let mut failures = 0u64;
        let mut successes = 0u64;
        let mut panicked = false;
        let mut budget_exhausted = false;

        for layer in &self.layers {
            if budget_exhausted
                || (budget_ms > 0 && started.elapsed().as_millis() as u64 >= budget_ms)
            {
                budget_exhausted = true;
                debug!("Skipping layer '{}': time budget exhausted", layer.name());
                layer_records.push(LayerDebugInfo::skipped(
                    layer.name(),
                    "time budget exhausted",
                ));
                continue;
            }

            let current = context.current_text(text).to_string();
            if !layer.can_handle(&current, context) {
                debug!("Skipping layer '{}': not applicable", layer.name());
                layer_records.push(LayerDebugInfo::skipped(layer.name(), "not applicable"));
                continue;
            }

            // Snapshots let a caught panic roll the context back to a
            // consistent state
            let text_before = context.translated_text.clone();
            let tokens_before = context.tokens.clone();

            let result = match AssertUnwindSafe(layer.process(&current, context))
                .catch_unwind()
                .await
            {
                Ok(result) => result,
                Err(panic) => {
                    panicked = true;
                    context.translated_text = text_before;
                    context.tokens = tokens_before;
                    LayerResult::failure(
                        &current,
                        &format!("layer panicked: {}", panic_message(panic.as_ref())),
                        0,
                    )
                }
            };

            executed += 1;
            if result.success {
                successes += 1;
                debug!(
                    "Layer '{}' completed in {}ms: {}",
                    layer.name(),
                    result.processing_time_ms,
                    result.summary
                );
            } else {
                failures += 1;
                warn!(
                    "Layer '{}' failed, continuing with unchanged text: {}",
                    layer.name(),
                    result.error_message.as_deref().unwrap_or("unknown error")
                );
            }

            if let Some(confidence) = result.confidence {
                explicit_confidences.push(confidence);
            }
            layer_records.push(LayerDebugInfo::from_result(layer.name(), &result));
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        let confidence = aggregate_confidence(executed, successes, &explicit_confidences);
        let final_text = context.current_text(text).to_string();

        {
            let mut statistics = self.statistics.lock();
            statistics.executions += 1;
            statistics.layer_runs += executed;
            statistics.layer_failures += failures;
            statistics.total_processing_time_ms += duration_ms;
        }

        *self.state.lock() = if panicked {
            PipelineState::Error
        } else {
            PipelineState::Completed
        };

        Ok(PipelineRun {
            text: final_text,
            layers: layer_records,
            confidence,
            duration_ms,
        })
    }
}

impl Default for TranslationPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Success ratio scaled by the mean of the explicit layer confidences
///
/// A run with no executed layers changed nothing and is fully trusted.
fn aggregate_confidence(executed: u64, successes: u64, explicit: &[f64]) -> f64 {
    if executed == 0 {
        return 1.0;
    }

    let success_ratio = successes as f64 / executed as f64;
    let base = if explicit.is_empty() {
        1.0
    } else {
        explicit.iter().sum::<f64>() / explicit.len() as f64
    };

    (success_ratio * base).clamp(0.0, 1.0)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
