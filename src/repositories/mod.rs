/*!
 * Repository traits for lexical data and translation history.
 *
 * These traits are the engine's only view of persistent data. The engine
 * never owns storage transactions; each call is a complete operation, and
 * implementations decide how it maps to their backend.
 */

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::text_utils;
use crate::translation::result::TranslationResult;

pub mod memory;
pub mod sqlite;

pub use memory::{InMemoryDictionary, InMemoryHistory, InMemoryPhrases};
pub use sqlite::SqliteRepository;

/// Dictionary entry for a single word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordRecord {
    /// Normalized source word
    pub source_text: String,

    /// Translation in the target language
    pub translation: String,

    /// Language pair as `"source-target"`
    pub language_pair: String,

    /// Part of speech tag, when known
    pub part_of_speech: Option<String>,

    /// Confidence percent, 0-100
    pub confidence: f64,

    /// Creation time, RFC 3339
    pub created_at: String,
}

impl WordRecord {
    /// Create a word record with full confidence
    pub fn new(source_text: &str, translation: &str, language_pair: &str) -> Self {
        Self {
            source_text: text_utils::normalize_lookup_text(source_text),
            translation: translation.to_string(),
            language_pair: language_pair.to_string(),
            part_of_speech: None,
            confidence: 100.0,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attach a part of speech tag
    pub fn with_part_of_speech(mut self, part_of_speech: &str) -> Self {
        self.part_of_speech = Some(part_of_speech.to_string());
        self
    }

    /// Set the confidence percent (clamped to 0-100)
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 100.0);
        self
    }
}

/// Entry for a multi-word expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhraseRecord {
    /// Normalized source phrase (single-spaced, lowercase)
    pub source_text: String,

    /// Translation in the target language
    pub translation: String,

    /// Language pair as `"source-target"`
    pub language_pair: String,

    /// Phrase category (greetings, idioms, ...), when known
    pub category: Option<String>,

    /// Confidence percent, 0-100
    pub confidence: f64,

    /// Creation time, RFC 3339
    pub created_at: String,
}

impl PhraseRecord {
    /// Create a phrase record with full confidence
    pub fn new(source_text: &str, translation: &str, language_pair: &str) -> Self {
        Self {
            source_text: text_utils::normalize_lookup_text(source_text),
            translation: translation.to_string(),
            language_pair: language_pair.to_string(),
            category: None,
            confidence: 100.0,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Attach a category
    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    /// Set the confidence percent (clamped to 0-100)
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 100.0);
        self
    }

    /// Number of words in the source phrase
    pub fn token_count(&self) -> usize {
        self.source_text.split_whitespace().count()
    }
}

/// Completed translation stored for history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Record identifier (UUID)
    pub id: String,

    /// Input text as submitted
    pub source_text: String,

    /// SHA256 of the input text
    pub source_text_hash: String,

    /// Output text
    pub translated_text: String,

    /// Language pair as `"source-target"`
    pub language_pair: String,

    /// Overall confidence in 0.0..=1.0
    pub confidence: f64,

    /// Pipeline wall time
    pub processing_time_ms: u64,

    /// Whether the run failed
    pub has_error: bool,

    /// Creation time, RFC 3339
    pub created_at: String,
}

impl HistoryRecord {
    /// Build a history record from a finished translation
    pub fn from_result(result: &TranslationResult) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source_text: result.original_text.clone(),
            source_text_hash: hash_text(&result.original_text),
            translated_text: result.translated_text.clone(),
            language_pair: result.language_pair.clone(),
            confidence: result.confidence,
            processing_time_ms: result.processing_time_ms,
            has_error: result.has_error,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Compute SHA256 hash of text
pub fn hash_text(text: &str) -> String {
    use sha2::{Digest, Sha256};

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Word lookups for the substitution layer
#[async_trait]
pub trait DictionaryRepository: Send + Sync {
    /// Find a word by language pair and normalized text
    async fn find_word(&self, language_pair: &str, text: &str) -> Result<Option<WordRecord>>;

    /// Insert or replace a word entry
    async fn insert_word(&self, record: &WordRecord) -> Result<()>;

    /// Number of word entries for a language pair
    async fn word_count(&self, language_pair: &str) -> Result<u64>;
}

/// Phrase lookups for the substitution layer
#[async_trait]
pub trait PhraseRepository: Send + Sync {
    /// Find a phrase by language pair and normalized text
    async fn find_phrase(&self, language_pair: &str, text: &str) -> Result<Option<PhraseRecord>>;

    /// Insert or replace a phrase entry
    async fn insert_phrase(&self, record: &PhraseRecord) -> Result<()>;

    /// Number of phrase entries for a language pair
    async fn phrase_count(&self, language_pair: &str) -> Result<u64>;
}

/// Persistence for completed translations
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Store a completed translation
    async fn record(&self, record: &HistoryRecord) -> Result<()>;

    /// Most recent records for a language pair, newest first
    async fn recent(&self, language_pair: &str, limit: usize) -> Result<Vec<HistoryRecord>>;
}
