/*!
 * Lookup caching for dictionary and phrase records.
 *
 * This module provides the bounded caches that sit in front of the
 * repositories. Word and phrase entries are kept in separate LRU caches so
 * that a flood of single-word lookups cannot evict phrase data.
 */

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use lru::LruCache;
use parking_lot::Mutex;

use crate::repositories::{PhraseRecord, WordRecord};
use crate::text_utils;
use crate::translation::result::CacheMetrics;

/// Default word cache capacity
pub const DEFAULT_WORD_CACHE_SIZE: usize = 10_000;

/// Default phrase cache capacity
pub const DEFAULT_PHRASE_CACHE_SIZE: usize = 5_000;

/// Repository latency avoided by a word cache hit, in milliseconds
const WORD_HIT_TIME_SAVED_MS: u64 = 4;

/// Repository latency avoided by a phrase cache hit, in milliseconds
const PHRASE_HIT_TIME_SAVED_MS: u64 = 6;

/// Cache key combining the language pair and the normalized lookup text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Language pair as `"source-target"`
    language_pair: String,

    /// Lookup text after `normalize_lookup_text`
    normalized_text: String,
}

impl CacheKey {
    /// Create a new cache key
    fn new(language_pair: &str, text: &str) -> Self {
        Self {
            language_pair: language_pair.to_string(),
            normalized_text: text_utils::normalize_lookup_text(text),
        }
    }
}

/// Bounded caches for word and phrase lookups
pub struct CacheManager {
    /// Word entries, least recently used evicted first
    words: Arc<Mutex<LruCache<CacheKey, WordRecord>>>,

    /// Phrase entries, least recently used evicted first
    phrases: Arc<Mutex<LruCache<CacheKey, PhraseRecord>>>,

    /// Word cache hit counter
    word_hits: Arc<AtomicU64>,

    /// Word cache miss counter
    word_misses: Arc<AtomicU64>,

    /// Phrase cache hit counter
    phrase_hits: Arc<AtomicU64>,

    /// Phrase cache miss counter
    phrase_misses: Arc<AtomicU64>,

    /// Estimated repository latency avoided, in milliseconds
    time_saved_ms: Arc<AtomicU64>,
}

impl CacheManager {
    /// Create a cache manager with explicit capacities
    pub fn new(word_capacity: usize, phrase_capacity: usize) -> Self {
        let word_capacity = NonZeroUsize::new(word_capacity).unwrap_or(NonZeroUsize::MIN);
        let phrase_capacity = NonZeroUsize::new(phrase_capacity).unwrap_or(NonZeroUsize::MIN);

        Self {
            words: Arc::new(Mutex::new(LruCache::new(word_capacity))),
            phrases: Arc::new(Mutex::new(LruCache::new(phrase_capacity))),
            word_hits: Arc::new(AtomicU64::new(0)),
            word_misses: Arc::new(AtomicU64::new(0)),
            phrase_hits: Arc::new(AtomicU64::new(0)),
            phrase_misses: Arc::new(AtomicU64::new(0)),
            time_saved_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Get a word record from the cache
    pub fn get_word(&self, language_pair: &str, text: &str) -> Option<WordRecord> {
        let key = CacheKey::new(language_pair, text);
        let mut words = self.words.lock();

        match words.get(&key) {
            Some(record) => {
                self.word_hits.fetch_add(1, Ordering::Relaxed);
                self.time_saved_ms
                    .fetch_add(WORD_HIT_TIME_SAVED_MS, Ordering::Relaxed);

                debug!(
                    "Word cache hit for '{}' ({})",
                    truncate_text(text, 30),
                    language_pair
                );

                Some(record.clone())
            }
            None => {
                self.word_misses.fetch_add(1, Ordering::Relaxed);

                debug!(
                    "Word cache miss for '{}' ({})",
                    truncate_text(text, 30),
                    language_pair
                );

                None
            }
        }
    }

    /// Store a word record in the cache
    pub fn store_word(&self, language_pair: &str, text: &str, record: WordRecord) {
        let key = CacheKey::new(language_pair, text);
        self.words.lock().put(key, record);
    }

    /// Get a phrase record from the cache
    pub fn get_phrase(&self, language_pair: &str, text: &str) -> Option<PhraseRecord> {
        let key = CacheKey::new(language_pair, text);
        let mut phrases = self.phrases.lock();

        match phrases.get(&key) {
            Some(record) => {
                self.phrase_hits.fetch_add(1, Ordering::Relaxed);
                self.time_saved_ms
                    .fetch_add(PHRASE_HIT_TIME_SAVED_MS, Ordering::Relaxed);

                debug!(
                    "Phrase cache hit for '{}' ({})",
                    truncate_text(text, 30),
                    language_pair
                );

                Some(record.clone())
            }
            None => {
                self.phrase_misses.fetch_add(1, Ordering::Relaxed);

                debug!(
                    "Phrase cache miss for '{}' ({})",
                    truncate_text(text, 30),
                    language_pair
                );

                None
            }
        }
    }

    /// Store a phrase record in the cache
    pub fn store_phrase(&self, language_pair: &str, text: &str, record: PhraseRecord) {
        let key = CacheKey::new(language_pair, text);
        self.phrases.lock().put(key, record);
    }

    /// Get a snapshot of the cache counters
    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            word_hits: self.word_hits.load(Ordering::Relaxed),
            word_misses: self.word_misses.load(Ordering::Relaxed),
            phrase_hits: self.phrase_hits.load(Ordering::Relaxed),
            phrase_misses: self.phrase_misses.load(Ordering::Relaxed),
            estimated_time_saved_ms: self.time_saved_ms.load(Ordering::Relaxed),
        }
    }

    /// Clear both caches and reset all counters
    ///
    /// Repositories are unaffected; later lookups repopulate the caches.
    pub fn clear(&self) {
        self.words.lock().clear();
        self.phrases.lock().clear();

        self.word_hits.store(0, Ordering::Relaxed);
        self.word_misses.store(0, Ordering::Relaxed);
        self.phrase_hits.store(0, Ordering::Relaxed);
        self.phrase_misses.store(0, Ordering::Relaxed);
        self.time_saved_ms.store(0, Ordering::Relaxed);

        debug!("Lookup caches cleared");
    }

    /// Number of cached word entries
    pub fn word_len(&self) -> usize {
        self.words.lock().len()
    }

    /// Number of cached phrase entries
    pub fn phrase_len(&self) -> usize {
        self.phrases.lock().len()
    }

    /// Check if both caches are empty
    pub fn is_empty(&self) -> bool {
        self.word_len() == 0 && self.phrase_len() == 0
    }
}

impl Default for CacheManager {
    fn default() -> Self {
        Self::new(DEFAULT_WORD_CACHE_SIZE, DEFAULT_PHRASE_CACHE_SIZE)
    }
}

impl Clone for CacheManager {
    fn clone(&self) -> Self {
        Self {
            words: self.words.clone(),
            phrases: self.phrases.clone(),
            word_hits: self.word_hits.clone(),
            word_misses: self.word_misses.clone(),
            phrase_hits: self.phrase_hits.clone(),
            phrase_misses: self.phrase_misses.clone(),
            time_saved_ms: self.time_saved_ms.clone(),
        }
    }
}

/// Truncate text to a maximum length with ellipsis
fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_length).collect::<String>())
    }
}
