/*!
 * Result types produced by layers and by the pipeline.
 *
 * `LayerResult` is what a single layer returns, `LayerDebugInfo` is the
 * per-layer record kept on the final result, and `TranslationResult` is the
 * outcome of a full pipeline run. Results serialize with camelCase field
 * names and round-trip through `serde_json::Value`.
 */

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Snapshot of cache effectiveness counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetrics {
    /// Word cache hits
    pub word_hits: u64,

    /// Word cache misses
    pub word_misses: u64,

    /// Phrase cache hits
    pub phrase_hits: u64,

    /// Phrase cache misses
    pub phrase_misses: u64,

    /// Estimated repository latency avoided, in milliseconds
    pub estimated_time_saved_ms: u64,
}

impl CacheMetrics {
    /// Total hits across both caches
    pub fn hits(&self) -> u64 {
        self.word_hits + self.phrase_hits
    }

    /// Total misses across both caches
    pub fn misses(&self) -> u64 {
        self.word_misses + self.phrase_misses
    }

    /// Hit rate across both caches, 0.0 when nothing was looked up
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits() + self.misses();
        if total > 0 {
            self.hits() as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Outcome of a single layer invocation
#[derive(Debug, Clone, PartialEq)]
pub struct LayerResult {
    /// Whether the layer completed its work
    pub success: bool,

    /// Text after this layer ran
    pub processed_text: String,

    /// Items the layer examined (tokens, rules, spans)
    pub items_processed: usize,

    /// Items the layer actually changed
    pub modifications_count: usize,

    /// Wall time spent in the layer
    pub processing_time_ms: u64,

    /// Failure description when `success` is false
    pub error_message: Option<String>,

    /// One-line description of what the layer did
    pub summary: String,

    /// Optional confidence signal in 0.0..=1.0
    pub confidence: Option<f64>,
}

impl LayerResult {
    /// Create a successful layer result
    pub fn success(
        processed_text: &str,
        items_processed: usize,
        modifications_count: usize,
        processing_time_ms: u64,
        summary: &str,
    ) -> Self {
        Self {
            success: true,
            processed_text: processed_text.to_string(),
            items_processed,
            modifications_count,
            processing_time_ms,
            error_message: None,
            summary: summary.to_string(),
            confidence: None,
        }
    }

    /// Create a failed layer result, carrying the text unchanged
    pub fn failure(original_text: &str, error_message: &str, processing_time_ms: u64) -> Self {
        Self {
            success: false,
            processed_text: original_text.to_string(),
            items_processed: 0,
            modifications_count: 0,
            processing_time_ms,
            error_message: Some(error_message.to_string()),
            summary: format!("failed: {}", error_message),
            confidence: None,
        }
    }

    /// Attach an explicit confidence signal (clamped to 0.0..=1.0)
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }
}

/// Per-layer record attached to the final translation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerDebugInfo {
    /// Name of the layer
    pub layer_name: String,

    /// Whether the layer declined the input and was skipped
    pub skipped: bool,

    /// Whether the layer completed its work
    pub is_successful: bool,

    /// Wall time spent in the layer, zero when skipped
    pub processing_time_ms: u64,

    /// Items the layer examined
    pub items_processed: usize,

    /// Items the layer changed
    pub modifications_count: usize,

    /// Failure description when the layer failed
    pub error_message: Option<String>,

    /// One-line description of what the layer did
    pub summary: String,
}

impl LayerDebugInfo {
    /// Record a completed (successful or failed) layer invocation
    pub fn from_result(layer_name: &str, result: &LayerResult) -> Self {
        Self {
            layer_name: layer_name.to_string(),
            skipped: false,
            is_successful: result.success,
            processing_time_ms: result.processing_time_ms,
            items_processed: result.items_processed,
            modifications_count: result.modifications_count,
            error_message: result.error_message.clone(),
            summary: result.summary.clone(),
        }
    }

    /// Record a layer that declined the input
    pub fn skipped(layer_name: &str, reason: &str) -> Self {
        Self {
            layer_name: layer_name.to_string(),
            skipped: true,
            is_successful: true,
            processing_time_ms: 0,
            items_processed: 0,
            modifications_count: 0,
            error_message: None,
            summary: format!("skipped: {}", reason),
        }
    }

    /// Whether this record carries a failure
    pub fn has_error(&self) -> bool {
        !self.is_successful || self.error_message.is_some()
    }
}

/// Final outcome of a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    /// Input text exactly as submitted
    pub original_text: String,

    /// Translated text; equals `original_text` when `has_error` is set
    pub translated_text: String,

    /// Language pair as `"source-target"`
    pub language_pair: String,

    /// Overall confidence in 0.0..=1.0; 0.0 when `has_error` is set
    pub confidence: f64,

    /// Total wall time for the pipeline run
    pub processing_time_ms: u64,

    /// Per-layer records in execution order
    pub layer_results: Vec<LayerDebugInfo>,

    /// Number of layers that actually ran (skipped layers excluded)
    pub layers_processed: usize,

    /// Whether the run failed as a whole
    pub has_error: bool,

    /// Failure description when `has_error` is set
    pub error_message: Option<String>,

    /// Quality score in 0.0..=1.0, computed in quality and detailed modes
    pub quality_score: Option<f64>,

    /// Alternative renderings (e.g. word-by-word when a phrase matched)
    pub alternatives: Vec<String>,

    /// Cache counters at the end of the run
    pub cache_metrics: CacheMetrics,

    /// Request configuration snapshot
    pub context_map: HashMap<String, String>,

    /// Completion time, RFC 3339
    pub timestamp: String,
}

impl TranslationResult {
    /// Create a successful result
    pub fn success(
        original_text: &str,
        translated_text: &str,
        language_pair: &str,
        confidence: f64,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            original_text: original_text.to_string(),
            translated_text: translated_text.to_string(),
            language_pair: language_pair.to_string(),
            confidence: confidence.clamp(0.0, 1.0),
            processing_time_ms,
            layer_results: Vec::new(),
            layers_processed: 0,
            has_error: false,
            error_message: None,
            quality_score: None,
            alternatives: Vec::new(),
            cache_metrics: CacheMetrics::default(),
            context_map: HashMap::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create an error result
    ///
    /// The translated text is the original input and the confidence is 0.0;
    /// those two fields are not caller-controlled on the error path.
    pub fn error(original_text: &str, language_pair: &str, error_message: &str) -> Self {
        Self {
            original_text: original_text.to_string(),
            translated_text: original_text.to_string(),
            language_pair: language_pair.to_string(),
            confidence: 0.0,
            processing_time_ms: 0,
            layer_results: Vec::new(),
            layers_processed: 0,
            has_error: true,
            error_message: Some(error_message.to_string()),
            quality_score: None,
            alternatives: Vec::new(),
            cache_metrics: CacheMetrics::default(),
            context_map: HashMap::new(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attach per-layer records, updating `layers_processed`
    pub fn with_layer_results(mut self, layer_results: Vec<LayerDebugInfo>) -> Self {
        self.layers_processed = layer_results.iter().filter(|r| !r.skipped).count();
        self.layer_results = layer_results;
        self
    }

    /// Attach the total processing time
    pub fn with_processing_time_ms(mut self, processing_time_ms: u64) -> Self {
        self.processing_time_ms = processing_time_ms;
        self
    }

    /// Attach a quality score (clamped to 0.0..=1.0)
    pub fn with_quality_score(mut self, quality_score: f64) -> Self {
        self.quality_score = Some(quality_score.clamp(0.0, 1.0));
        self
    }

    /// Attach alternative renderings
    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Attach a cache counter snapshot
    pub fn with_cache_metrics(mut self, cache_metrics: CacheMetrics) -> Self {
        self.cache_metrics = cache_metrics;
        self
    }

    /// Attach the request configuration snapshot
    pub fn with_context_map(mut self, context_map: HashMap<String, String>) -> Self {
        self.context_map = context_map;
        self
    }

    /// Whether any recorded layer failed
    pub fn has_layer_failures(&self) -> bool {
        self.layer_results.iter().any(|r| r.has_error())
    }

    /// Serialize into a JSON value with camelCase keys
    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).context("Failed to serialize translation result")
    }

    /// Rebuild a result from its JSON value representation
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).context("Failed to deserialize translation result")
    }
}

// Equality and hashing consider the semantic outcome only; bookkeeping
// fields (timing, per-layer records, cache counters, timestamp) differ
// between identical translations.
impl PartialEq for TranslationResult {
    fn eq(&self, other: &Self) -> bool {
        self.original_text == other.original_text
            && self.translated_text == other.translated_text
            && self.language_pair == other.language_pair
            && self.confidence.to_bits() == other.confidence.to_bits()
            && self.has_error == other.has_error
            && self.error_message == other.error_message
            && self.layers_processed == other.layers_processed
    }
}

impl Eq for TranslationResult {}

impl Hash for TranslationResult {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.original_text.hash(state);
        self.translated_text.hash(state);
        self.language_pair.hash(state);
        self.confidence.to_bits().hash(state);
        self.has_error.hash(state);
        self.error_message.hash(state);
        self.layers_processed.hash(state);
    }
}
