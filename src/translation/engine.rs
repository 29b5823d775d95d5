/*!
 * Translation engine lifecycle and request entry points.
 *
 * The engine owns the repositories, the shared cache, and the compiled
 * rule set, and assembles a fresh pipeline for every request so that
 * concurrent translations never contend on pipeline state. Lifecycle and
 * error events are published on broadcast channels; subscribers only see
 * events emitted after they subscribe.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::app_config::EngineConfig;
use crate::errors::EngineError;
use crate::repositories::{
    DictionaryRepository, HistoryRecord, HistoryRepository, InMemoryDictionary, InMemoryHistory,
    InMemoryPhrases, PhraseRepository, SqliteRepository,
};
use crate::translation::cache::CacheManager;
use crate::translation::context::{MetadataValue, TranslationContext, metadata_keys};
use crate::translation::layers::{
    GrammarLayer, PostprocessingLayer, PreprocessingLayer, SubstitutionLayer, WordOrderLayer,
};
use crate::translation::pipeline::TranslationPipeline;
use crate::translation::result::{CacheMetrics, TranslationResult};
use crate::translation::rules::{self, RuleEngine};

/// Capacity of the state and error broadcast channels
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Lifecycle state of a translation engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Created but not initialized
    Uninitialized,
    /// Initialization in flight
    Initializing,
    /// Accepting translation requests
    Ready,
    /// Initialization failed; `initialize` may be retried
    Error,
    /// Terminal state, no further requests accepted
    Disposed,
}

impl EngineState {
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Uninitialized => "uninitialized".to_string(),
            Self::Initializing => "initializing".to_string(),
            Self::Ready => "ready".to_string(),
            Self::Error => "error".to_string(),
            Self::Disposed => "disposed".to_string(),
        }
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for EngineState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "uninitialized" => Ok(Self::Uninitialized),
            "initializing" => Ok(Self::Initializing),
            "ready" => Ok(Self::Ready),
            "error" => Ok(Self::Error),
            "disposed" => Ok(Self::Disposed),
            _ => Err(anyhow!("Invalid engine state: {}", s)),
        }
    }
}

/// Request counters kept by the engine
#[derive(Debug, Clone, Default)]
struct EngineCounters {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    total_processing_time_ms: u64,
}

/// Snapshot of the engine's request counters and cache metrics
#[derive(Debug, Clone, Default)]
pub struct EngineStatistics {
    /// Requests accepted, successful or not
    pub total_requests: u64,

    /// Requests that produced a translation result without an engine error
    pub successful_requests: u64,

    /// Requests that produced an error result
    pub failed_requests: u64,

    /// Wall time across all requests
    pub total_processing_time_ms: u64,

    /// Word and phrase cache counters
    pub cache_metrics: CacheMetrics,
}

impl EngineStatistics {
    /// Average wall time per request
    pub fn average_processing_time_ms(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.total_processing_time_ms as f64 / self.total_requests as f64
        }
    }

    /// Fraction of requests without an error result
    pub fn success_rate(&self) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            self.successful_requests as f64 / self.total_requests as f64
        }
    }
}

/// Offline translation engine over pluggable repositories
pub struct TranslationEngine {
    /// Engine configuration, fixed at construction
    config: EngineConfig,

    /// Word lookups
    dictionary: Arc<dyn DictionaryRepository>,

    /// Phrase lookups
    phrases: Arc<dyn PhraseRepository>,

    /// Translation history sink, absent when recording is disabled
    history: Option<Arc<dyn HistoryRepository>>,

    /// Cache shared by every pipeline this engine assembles
    cache: CacheManager,

    /// Compiled rules, present once initialization succeeds
    rules: RwLock<Option<Arc<RuleEngine>>>,

    /// Warnings collected while loading and compiling rules
    rule_warnings: RwLock<Vec<String>>,

    /// Lifecycle state
    state: RwLock<EngineState>,

    /// Request counters
    counters: Mutex<EngineCounters>,

    /// Lifecycle event publisher
    state_events: broadcast::Sender<EngineState>,

    /// Error event publisher
    error_events: broadcast::Sender<String>,

    /// Identifier for this engine instance, used in logs and diagnostics
    session_id: String,
}

impl TranslationEngine {
    /// Create an engine over explicit repository implementations
    pub fn new(
        config: EngineConfig,
        dictionary: Arc<dyn DictionaryRepository>,
        phrases: Arc<dyn PhraseRepository>,
        history: Option<Arc<dyn HistoryRepository>>,
    ) -> Self {
        let (state_events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (error_events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let cache = CacheManager::new(config.word_cache_size, config.phrase_cache_size);

        Self {
            config,
            dictionary,
            phrases,
            history,
            cache,
            rules: RwLock::new(None),
            rule_warnings: RwLock::new(Vec::new()),
            state: RwLock::new(EngineState::Uninitialized),
            counters: Mutex::new(EngineCounters::default()),
            state_events,
            error_events,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an engine backed by in-memory repositories
    pub fn with_in_memory(config: EngineConfig) -> Self {
        let history: Option<Arc<dyn HistoryRepository>> = if config.record_history {
            Some(Arc::new(InMemoryHistory::new()))
        } else {
            None
        };

        Self::new(
            config,
            Arc::new(InMemoryDictionary::new()),
            Arc::new(InMemoryPhrases::new()),
            history,
        )
    }

    /// Create an engine backed by the default SQLite database
    pub fn with_sqlite(config: EngineConfig) -> Result<Self> {
        let repository = SqliteRepository::new_default()?;
        Ok(Self::with_sqlite_repository(config, repository))
    }

    /// Create an engine over an existing SQLite repository
    pub fn with_sqlite_repository(config: EngineConfig, repository: SqliteRepository) -> Self {
        let history: Option<Arc<dyn HistoryRepository>> = if config.record_history {
            Some(Arc::new(repository.clone()))
        } else {
            None
        };

        Self::new(
            config,
            Arc::new(repository.clone()),
            Arc::new(repository),
            history,
        )
    }

    // ====== Lifecycle Operations ======

    /// Current lifecycle state
    pub fn state(&self) -> EngineState {
        *self.state.read()
    }

    /// Whether the engine accepts translation requests
    pub fn is_ready(&self) -> bool {
        self.state() == EngineState::Ready
    }

    /// Identifier of this engine instance
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Configuration the engine was created with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Subscribe to lifecycle state changes
    pub fn subscribe_state(&self) -> broadcast::Receiver<EngineState> {
        self.state_events.subscribe()
    }

    /// Subscribe to error events
    pub fn subscribe_errors(&self) -> broadcast::Receiver<String> {
        self.error_events.subscribe()
    }

    /// Warnings collected while loading and compiling the rule set
    pub fn rule_warnings(&self) -> Vec<String> {
        self.rule_warnings.read().clone()
    }

    /// Load the rule set and move the engine to `Ready`
    ///
    /// Calling `initialize` on a `Ready` engine is a no-op. A failed
    /// initialization leaves the engine in `Error`, from which another
    /// `initialize` may be attempted.
    pub async fn initialize(&self) -> Result<(), EngineError> {
        {
            let mut state = self.state.write();
            match *state {
                EngineState::Ready => return Ok(()),
                EngineState::Initializing => {
                    return Err(EngineError::InvalidState {
                        expected: "uninitialized".to_string(),
                        current: "initializing".to_string(),
                    });
                }
                EngineState::Disposed => return Err(EngineError::Disposed),
                EngineState::Uninitialized | EngineState::Error => {
                    *state = EngineState::Initializing;
                }
            }
        }
        let _ = self.state_events.send(EngineState::Initializing);

        match self.load_rules() {
            Ok((engine, warnings)) => {
                info!(
                    "Engine {} initialized with {} rule(s), {} warning(s)",
                    self.session_id,
                    engine.len(),
                    warnings.len()
                );
                *self.rules.write() = Some(Arc::new(engine));
                *self.rule_warnings.write() = warnings;
                self.set_state(EngineState::Ready);
                Ok(())
            }
            Err(e) => {
                let message = format!("{:#}", e);
                self.set_state(EngineState::Error);
                self.emit_error(&message);
                Err(EngineError::InitializationFailed(message))
            }
        }
    }

    /// Release the rule set and caches and stop accepting requests
    ///
    /// Terminal and idempotent. In-flight requests run to completion.
    pub fn dispose(&self) {
        {
            let mut state = self.state.write();
            if *state == EngineState::Disposed {
                return;
            }
            *state = EngineState::Disposed;
        }
        let _ = self.state_events.send(EngineState::Disposed);

        *self.rules.write() = None;
        self.cache.clear();
        info!("Engine {} disposed", self.session_id);
    }

    // ====== Translation Operations ======

    /// Translate text between two languages with default settings
    pub async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TranslationResult, EngineError> {
        let context = TranslationContext::new(source_language, target_language);
        self.translate_with_context(text, context).await
    }

    /// Translate text using a caller-built context
    ///
    /// An unsupported language pair produces an error result and an error
    /// event rather than an `Err`; only lifecycle misuse is an `Err`.
    pub async fn translate_with_context(
        &self,
        text: &str,
        mut context: TranslationContext,
    ) -> Result<TranslationResult, EngineError> {
        match self.state() {
            EngineState::Ready => {}
            EngineState::Disposed => return Err(EngineError::Disposed),
            other => {
                return Err(EngineError::InvalidState {
                    expected: "ready".to_string(),
                    current: other.to_lowercase_string(),
                });
            }
        }

        if self.config.debug {
            context.debug_mode = true;
        }
        if let Some(pairs) = &self.config.supported_pairs {
            context = context.with_supported_pairs(pairs.clone());
        }

        let pair = context.language_pair();
        if !context.is_language_pair_supported() {
            let message = EngineError::UnsupportedLanguagePair(pair.clone()).to_string();
            self.emit_error(&message);
            let result = TranslationResult::error(text, &pair, &message);
            self.record_request(&result).await;
            return Ok(result);
        }

        let rules = match self.rules.read().as_ref() {
            Some(rules) => rules.clone(),
            None => {
                return Err(EngineError::InvalidState {
                    expected: "ready".to_string(),
                    current: self.state().to_lowercase_string(),
                });
            }
        };

        let started = Instant::now();
        let pipeline = self.build_pipeline(rules);
        debug!(
            "Engine {} translating {} char(s) for pair {}",
            self.session_id,
            text.chars().count(),
            pair
        );

        let run = match pipeline.execute(text, &mut context).await {
            Ok(run) => run,
            Err(e) => {
                let message = e.to_string();
                self.emit_error(&message);
                let result = TranslationResult::error(text, &pair, &message);
                self.record_request(&result).await;
                return Ok(result);
            }
        };

        if run.has_failures() {
            warn!(
                "Engine {} completed pair {} with {} failed layer(s)",
                self.session_id,
                pair,
                run.layers.iter().filter(|l| l.has_error()).count()
            );
        }

        let mut result = TranslationResult::success(
            text,
            &run.text,
            &pair,
            run.confidence,
            started.elapsed().as_millis() as u64,
        )
        .with_layer_results(run.layers)
        .with_cache_metrics(self.cache.metrics());

        if let Some(MetadataValue::Tokens(alternatives)) =
            context.get_metadata(metadata_keys::ALTERNATIVES)
        {
            result = result.with_alternatives(alternatives.clone());
        }

        if context.is_quality_mode_enabled() {
            result = result.with_quality_score(run.confidence);
        }

        if context.is_debug_enabled() {
            result = result.with_context_map(self.build_context_map(&context));
        }

        self.record_request(&result).await;
        Ok(result)
    }

    /// Translate several texts for one language pair concurrently
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<TranslationResult>, EngineError> {
        let futures = texts
            .iter()
            .map(|text| self.translate(text, source_language, target_language));

        futures::future::join_all(futures).await.into_iter().collect()
    }

    // ====== Maintenance Operations ======

    /// Snapshot of request counters and cache metrics
    pub fn statistics(&self) -> EngineStatistics {
        let counters = self.counters.lock().clone();
        EngineStatistics {
            total_requests: counters.total_requests,
            successful_requests: counters.successful_requests,
            failed_requests: counters.failed_requests,
            total_processing_time_ms: counters.total_processing_time_ms,
            cache_metrics: self.cache.metrics(),
        }
    }

    /// Current word and phrase cache counters
    pub fn cache_metrics(&self) -> CacheMetrics {
        self.cache.metrics()
    }

    /// Empty both caches and reset their counters
    pub fn clear_caches(&self) {
        self.cache.clear();
        info!("Engine {} caches cleared", self.session_id);
    }

    /// Most recent history records for a language pair, newest first
    ///
    /// Returns an empty list when history recording is disabled.
    pub async fn recent_history(
        &self,
        language_pair: &str,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>> {
        match &self.history {
            Some(history) => history.recent(language_pair, limit).await,
            None => Ok(Vec::new()),
        }
    }

    // ====== Internals ======

    /// Read and compile the rule files under the configured data directory
    fn load_rules(&self) -> Result<(RuleEngine, Vec<String>)> {
        let dir = self.config.resolved_data_dir();
        let report = rules::load_dir(&dir)?;
        let engine = RuleEngine::compile(&report.rules);

        let mut warnings = report.warnings;
        warnings.extend(engine.warnings().to_vec());
        Ok((engine, warnings))
    }

    /// Assemble the standard five-layer pipeline for one request
    fn build_pipeline(&self, rules: Arc<RuleEngine>) -> TranslationPipeline {
        TranslationPipeline::new()
            .with_layer(Arc::new(PreprocessingLayer::new()))
            .with_layer(Arc::new(SubstitutionLayer::new(
                self.dictionary.clone(),
                self.phrases.clone(),
                self.cache.clone(),
            )))
            .with_layer(Arc::new(GrammarLayer::new(rules.clone())))
            .with_layer(Arc::new(WordOrderLayer::new(rules.clone())))
            .with_layer(Arc::new(PostprocessingLayer::new(rules)))
    }

    /// Flatten context metadata into the diagnostic map of a debug result
    fn build_context_map(&self, context: &TranslationContext) -> HashMap<String, String> {
        let mut map: HashMap<String, String> = context
            .metadata
            .iter()
            .map(|(key, value)| (key.clone(), metadata_value_string(value)))
            .collect();

        map.insert("sessionId".to_string(), self.session_id.clone());
        map.insert("mode".to_string(), context.mode.to_string());
        map
    }

    /// Update counters and append to history; history failures are logged,
    /// never surfaced
    async fn record_request(&self, result: &TranslationResult) {
        {
            let mut counters = self.counters.lock();
            counters.total_requests += 1;
            if result.has_error {
                counters.failed_requests += 1;
            } else {
                counters.successful_requests += 1;
            }
            counters.total_processing_time_ms += result.processing_time_ms;
        }

        if let Some(history) = &self.history {
            let record = HistoryRecord::from_result(result);
            if let Err(e) = history.record(&record).await {
                warn!("Failed to record translation history: {:#}", e);
            }
        }
    }

    fn set_state(&self, next: EngineState) {
        *self.state.write() = next;
        let _ = self.state_events.send(next);
        debug!("Engine {} state: {}", self.session_id, next);
    }

    fn emit_error(&self, message: &str) {
        warn!("Engine {}: {}", self.session_id, message);
        let _ = self.error_events.send(message.to_string());
    }
}

fn metadata_value_string(value: &MetadataValue) -> String {
    match value {
        MetadataValue::Text(text) => text.clone(),
        MetadataValue::Flag(flag) => flag.to_string(),
        MetadataValue::Number(number) => number.to_string(),
        MetadataValue::Tokens(tokens) => tokens.join(" "),
    }
}
