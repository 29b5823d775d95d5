/*!
 * In-memory repository implementations.
 *
 * Backed by hash maps behind read-write locks. Useful as the default
 * backend for short-lived engines and as fixtures in tests; data does not
 * survive the process.
 */

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

use super::{
    DictionaryRepository, HistoryRecord, HistoryRepository, PhraseRecord, PhraseRepository,
    WordRecord,
};
use crate::text_utils;

/// Key: language pair plus normalized lookup text
type LookupKey = (String, String);

fn lookup_key(language_pair: &str, text: &str) -> LookupKey {
    (
        language_pair.to_string(),
        text_utils::normalize_lookup_text(text),
    )
}

/// In-memory word dictionary
#[derive(Debug, Default)]
pub struct InMemoryDictionary {
    words: RwLock<HashMap<LookupKey, WordRecord>>,
}

impl InMemoryDictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dictionary pre-loaded with `(source, translation)` pairs
    pub fn with_entries<'a, I>(language_pair: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let dictionary = Self::new();
        {
            let mut words = dictionary.words.write();
            for (source, translation) in entries {
                let record = WordRecord::new(source, translation, language_pair);
                words.insert(lookup_key(language_pair, source), record);
            }
        }
        dictionary
    }
}

#[async_trait]
impl DictionaryRepository for InMemoryDictionary {
    async fn find_word(&self, language_pair: &str, text: &str) -> Result<Option<WordRecord>> {
        let words = self.words.read();
        Ok(words.get(&lookup_key(language_pair, text)).cloned())
    }

    async fn insert_word(&self, record: &WordRecord) -> Result<()> {
        let mut words = self.words.write();
        words.insert(
            lookup_key(&record.language_pair, &record.source_text),
            record.clone(),
        );
        Ok(())
    }

    async fn word_count(&self, language_pair: &str) -> Result<u64> {
        let words = self.words.read();
        Ok(words
            .keys()
            .filter(|(pair, _)| pair == language_pair)
            .count() as u64)
    }
}

/// In-memory phrase store
#[derive(Debug, Default)]
pub struct InMemoryPhrases {
    phrases: RwLock<HashMap<LookupKey, PhraseRecord>>,
}

impl InMemoryPhrases {
    /// Create an empty phrase store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with `(source, translation)` pairs
    pub fn with_entries<'a, I>(language_pair: &str, entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let store = Self::new();
        {
            let mut phrases = store.phrases.write();
            for (source, translation) in entries {
                let record = PhraseRecord::new(source, translation, language_pair);
                phrases.insert(lookup_key(language_pair, source), record);
            }
        }
        store
    }
}

#[async_trait]
impl PhraseRepository for InMemoryPhrases {
    async fn find_phrase(&self, language_pair: &str, text: &str) -> Result<Option<PhraseRecord>> {
        let phrases = self.phrases.read();
        Ok(phrases.get(&lookup_key(language_pair, text)).cloned())
    }

    async fn insert_phrase(&self, record: &PhraseRecord) -> Result<()> {
        let mut phrases = self.phrases.write();
        phrases.insert(
            lookup_key(&record.language_pair, &record.source_text),
            record.clone(),
        );
        Ok(())
    }

    async fn phrase_count(&self, language_pair: &str) -> Result<u64> {
        let phrases = self.phrases.read();
        Ok(phrases
            .keys()
            .filter(|(pair, _)| pair == language_pair)
            .count() as u64)
    }
}

/// In-memory translation history, newest first
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    records: RwLock<Vec<HistoryRecord>>,
}

impl InMemoryHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Check whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistory {
    async fn record(&self, record: &HistoryRecord) -> Result<()> {
        let mut records = self.records.write();
        records.push(record.clone());
        Ok(())
    }

    async fn recent(&self, language_pair: &str, limit: usize) -> Result<Vec<HistoryRecord>> {
        let records = self.records.read();
        Ok(records
            .iter()
            .rev()
            .filter(|r| r.language_pair == language_pair)
            .take(limit)
            .cloned()
            .collect())
    }
}
