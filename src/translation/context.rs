/*!
 * Per-request translation context.
 *
 * A `TranslationContext` is created for each translate call and owned by it
 * exclusively. The request configuration (languages, mode, exclusions) is
 * fixed at construction; layers communicate through the mutable parts only:
 * `tokens`, `translated_text`, and the `metadata` bag.
 */

use std::collections::{HashMap, HashSet};

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::language_utils;

/// Keys the built-in layers use in the context metadata bag
pub mod metadata_keys {
    /// Token list produced by pre-processing (`MetadataValue::Tokens`)
    pub const TOKENS: &str = "tokens";

    /// Token count produced by pre-processing (`MetadataValue::Number`)
    pub const TOKEN_COUNT: &str = "token_count";

    /// Alternative renderings, word-by-word first (`MetadataValue::Tokens`)
    pub const ALTERNATIVES: &str = "alternatives";

    /// Rule identifiers applied so far (`MetadataValue::Tokens`)
    pub const APPLIED_RULES: &str = "applied_rules";

    /// Phrases substituted by the dictionary layer (`MetadataValue::Tokens`)
    pub const MATCHED_PHRASES: &str = "matched_phrases";
}

/// Translation processing mode
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMode {
    /// Minimal bookkeeping, no quality scoring
    #[default]
    Fast,
    /// Quality scoring enabled
    Quality,
    /// Quality scoring plus verbose diagnostics
    Detailed,
}

impl TranslationMode {
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Fast => "fast".to_string(),
            Self::Quality => "quality".to_string(),
            Self::Detailed => "detailed".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "quality" => Ok(Self::Quality),
            "detailed" => Ok(Self::Detailed),
            _ => Err(anyhow!("Invalid translation mode: {}", s)),
        }
    }
}

/// Typed value stored in the context metadata bag
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    /// Free-form text
    Text(String),
    /// Boolean flag
    Flag(bool),
    /// Numeric value
    Number(f64),
    /// List of strings
    Tokens(Vec<String>),
}

impl MetadataValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_tokens(&self) -> Option<&[String]> {
        match self {
            Self::Tokens(value) => Some(value),
            _ => None,
        }
    }
}

/// Per-request state threaded through the pipeline
#[derive(Debug, Clone)]
pub struct TranslationContext {
    /// Source language code (ISO 639-1)
    pub source_language: String,

    /// Target language code (ISO 639-1)
    pub target_language: String,

    /// Whether layers record verbose diagnostics
    pub debug_mode: bool,

    /// Processing mode
    pub mode: TranslationMode,

    /// Minimum phrase confidence (percent, 0-100) for substitution
    pub min_confidence: f64,

    /// Advisory processing budget in milliseconds, 0 for unlimited
    pub max_processing_time_ms: u64,

    /// Words the substitution layer must pass through untranslated
    exclude_words: HashSet<String>,

    /// Exact-match overrides applied before any lookup
    force_translations: HashMap<String, String>,

    /// Whether lookups consult the cache
    pub use_cache: bool,

    /// Whether repository hits populate the cache
    pub save_to_cache: bool,

    /// Supported-pair override, from the engine configuration
    supported_pairs: Option<HashSet<String>>,

    /// Tokens produced by pre-processing
    pub tokens: Vec<String>,

    /// Running translation, updated layer by layer
    pub translated_text: Option<String>,

    /// Layer-to-layer metadata bag
    pub metadata: HashMap<String, MetadataValue>,
}

impl TranslationContext {
    /// Create a context for a language pair with default settings
    pub fn new(source_language: &str, target_language: &str) -> Self {
        Self {
            source_language: source_language.trim().to_lowercase(),
            target_language: target_language.trim().to_lowercase(),
            debug_mode: false,
            mode: TranslationMode::default(),
            min_confidence: 0.0,
            max_processing_time_ms: 0,
            exclude_words: HashSet::new(),
            force_translations: HashMap::new(),
            use_cache: true,
            save_to_cache: true,
            supported_pairs: None,
            tokens: Vec::new(),
            translated_text: None,
            metadata: HashMap::new(),
        }
    }

    /// Set the processing mode
    pub fn with_mode(mut self, mode: TranslationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable verbose diagnostics
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug_mode = debug;
        self
    }

    /// Set the minimum phrase confidence (percent, 0-100)
    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence.clamp(0.0, 100.0);
        self
    }

    /// Set the advisory processing budget in milliseconds
    pub fn with_max_processing_time_ms(mut self, budget_ms: u64) -> Self {
        self.max_processing_time_ms = budget_ms;
        self
    }

    /// Add words the substitution layer must leave untranslated
    pub fn with_excluded_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_words
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    /// Add exact-match translation overrides
    pub fn with_force_translations<I, K, V>(mut self, translations: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.force_translations.extend(
            translations
                .into_iter()
                .map(|(k, v)| (k.as_ref().to_lowercase(), v.into())),
        );
        self
    }

    /// Enable or disable cache reads for this request
    pub fn with_use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    /// Enable or disable cache writes for this request
    pub fn with_save_to_cache(mut self, save_to_cache: bool) -> Self {
        self.save_to_cache = save_to_cache;
        self
    }

    /// Replace the supported-pair set for this request
    pub fn with_supported_pairs(mut self, pairs: HashSet<String>) -> Self {
        self.supported_pairs = Some(pairs);
        self
    }

    /// The request's language pair as `"source-target"`
    pub fn language_pair(&self) -> String {
        language_utils::format_language_pair(&self.source_language, &self.target_language)
    }

    /// The request's language pair reversed, as `"target-source"`
    pub fn reverse_language_pair(&self) -> String {
        language_utils::format_language_pair(&self.target_language, &self.source_language)
    }

    /// Check the pair against the configured allow-list
    pub fn is_language_pair_supported(&self) -> bool {
        language_utils::is_pair_supported(
            &self.source_language,
            &self.target_language,
            self.supported_pairs.as_ref(),
        )
    }

    /// Whether a word is excluded from substitution (case-insensitive)
    pub fn should_exclude_word(&self, word: &str) -> bool {
        self.exclude_words.contains(&word.to_lowercase())
    }

    /// Look up a forced translation override (case-insensitive exact match)
    pub fn get_force_translation(&self, word: &str) -> Option<&str> {
        self.force_translations
            .get(&word.to_lowercase())
            .map(|s| s.as_str())
    }

    /// Whether verbose diagnostics are active for this request
    pub fn is_debug_enabled(&self) -> bool {
        self.debug_mode || self.mode == TranslationMode::Detailed
    }

    /// Whether the request runs in fast mode
    pub fn is_fast_mode_enabled(&self) -> bool {
        self.mode == TranslationMode::Fast
    }

    /// Whether the request runs with quality scoring
    pub fn is_quality_mode_enabled(&self) -> bool {
        matches!(
            self.mode,
            TranslationMode::Quality | TranslationMode::Detailed
        )
    }

    /// Store a metadata value
    pub fn set_metadata(&mut self, key: &str, value: MetadataValue) {
        self.metadata.insert(key.to_string(), value);
    }

    /// Read a metadata value
    pub fn get_metadata(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    /// Append a rule identifier to the applied-rules metadata list
    pub fn record_applied_rule(&mut self, rule_id: &str) {
        match self.metadata.get_mut(metadata_keys::APPLIED_RULES) {
            Some(MetadataValue::Tokens(rules)) => rules.push(rule_id.to_string()),
            _ => {
                self.metadata.insert(
                    metadata_keys::APPLIED_RULES.to_string(),
                    MetadataValue::Tokens(vec![rule_id.to_string()]),
                );
            }
        }
    }

    /// The text the next layer should read: the running translation when one
    /// exists, the original input otherwise
    pub fn current_text<'a>(&'a self, original: &'a str) -> &'a str {
        self.translated_text.as_deref().unwrap_or(original)
    }
}
