/*!
 * SQLite-backed repository implementation.
 *
 * One repository serves all three traits so that words, phrases, and
 * history share a single database file and connection.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use rusqlite::{OptionalExtension, params};

use super::{
    DictionaryRepository, HistoryRecord, HistoryRepository, PhraseRecord, PhraseRepository,
    WordRecord,
};
use crate::database::DatabaseConnection;
use crate::text_utils;

/// Repository over a SQLite database
#[derive(Clone)]
pub struct SqliteRepository {
    /// Database connection
    db: DatabaseConnection,
}

impl SqliteRepository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// The underlying database connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

// =========================================================================
// Dictionary Operations
// =========================================================================

#[async_trait]
impl DictionaryRepository for SqliteRepository {
    async fn find_word(&self, language_pair: &str, text: &str) -> Result<Option<WordRecord>> {
        let language_pair = language_pair.to_string();
        let normalized = text_utils::normalize_lookup_text(text);

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, source_text, translation, language_pair,
                               part_of_speech, confidence, created_at
                        FROM words
                        WHERE language_pair = ?1 AND source_text = ?2
                        "#,
                        params![language_pair, normalized],
                        |row| {
                            Ok((
                                row.get::<_, i64>(0)?,
                                WordRecord {
                                    source_text: row.get(1)?,
                                    translation: row.get(2)?,
                                    language_pair: row.get(3)?,
                                    part_of_speech: row.get(4)?,
                                    confidence: row.get(5)?,
                                    created_at: row.get(6)?,
                                },
                            ))
                        },
                    )
                    .optional()?;

                if let Some((id, record)) = result {
                    // Track lookup frequency for lexicon maintenance
                    conn.execute(
                        "UPDATE words SET lookup_count = lookup_count + 1 WHERE id = ?1",
                        [id],
                    )?;
                    debug!("Dictionary hit for '{}'", record.source_text);
                    Ok(Some(record))
                } else {
                    Ok(None)
                }
            })
            .await
    }

    async fn insert_word(&self, record: &WordRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO words (
                        source_text, translation, language_pair,
                        part_of_speech, confidence, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(source_text, language_pair)
                    DO UPDATE SET translation = excluded.translation,
                                  part_of_speech = excluded.part_of_speech,
                                  confidence = excluded.confidence
                    "#,
                    params![
                        record.source_text,
                        record.translation,
                        record.language_pair,
                        record.part_of_speech,
                        record.confidence,
                        record.created_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    async fn word_count(&self, language_pair: &str) -> Result<u64> {
        let language_pair = language_pair.to_string();

        self.db
            .execute_async(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM words WHERE language_pair = ?1",
                    [language_pair],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
    }
}

// =========================================================================
// Phrase Operations
// =========================================================================

#[async_trait]
impl PhraseRepository for SqliteRepository {
    async fn find_phrase(&self, language_pair: &str, text: &str) -> Result<Option<PhraseRecord>> {
        let language_pair = language_pair.to_string();
        let normalized = text_utils::normalize_lookup_text(text);

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, source_text, translation, language_pair,
                               category, confidence, created_at
                        FROM phrases
                        WHERE language_pair = ?1 AND source_text = ?2
                        "#,
                        params![language_pair, normalized],
                        |row| {
                            Ok((
                                row.get::<_, i64>(0)?,
                                PhraseRecord {
                                    source_text: row.get(1)?,
                                    translation: row.get(2)?,
                                    language_pair: row.get(3)?,
                                    category: row.get(4)?,
                                    confidence: row.get(5)?,
                                    created_at: row.get(6)?,
                                },
                            ))
                        },
                    )
                    .optional()?;

                if let Some((id, record)) = result {
                    conn.execute(
                        "UPDATE phrases SET lookup_count = lookup_count + 1 WHERE id = ?1",
                        [id],
                    )?;
                    debug!("Phrase hit for '{}'", record.source_text);
                    Ok(Some(record))
                } else {
                    Ok(None)
                }
            })
            .await
    }

    async fn insert_phrase(&self, record: &PhraseRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO phrases (
                        source_text, translation, language_pair,
                        category, confidence, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(source_text, language_pair)
                    DO UPDATE SET translation = excluded.translation,
                                  category = excluded.category,
                                  confidence = excluded.confidence
                    "#,
                    params![
                        record.source_text,
                        record.translation,
                        record.language_pair,
                        record.category,
                        record.confidence,
                        record.created_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    async fn phrase_count(&self, language_pair: &str) -> Result<u64> {
        let language_pair = language_pair.to_string();

        self.db
            .execute_async(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM phrases WHERE language_pair = ?1",
                    [language_pair],
                    |row| row.get(0),
                )?;
                Ok(count as u64)
            })
            .await
    }
}

// =========================================================================
// History Operations
// =========================================================================

#[async_trait]
impl HistoryRepository for SqliteRepository {
    async fn record(&self, record: &HistoryRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO translation_history (
                        id, source_text, source_text_hash, translated_text,
                        language_pair, confidence, processing_time_ms, has_error, created_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    "#,
                    params![
                        record.id,
                        record.source_text,
                        record.source_text_hash,
                        record.translated_text,
                        record.language_pair,
                        record.confidence,
                        record.processing_time_ms as i64,
                        record.has_error,
                        record.created_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    async fn recent(&self, language_pair: &str, limit: usize) -> Result<Vec<HistoryRecord>> {
        let language_pair = language_pair.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, source_text, source_text_hash, translated_text,
                           language_pair, confidence, processing_time_ms, has_error, created_at
                    FROM translation_history
                    WHERE language_pair = ?1
                    ORDER BY created_at DESC
                    LIMIT ?2
                    "#,
                )?;

                let rows = stmt.query_map(params![language_pair, limit as i64], |row| {
                    Ok(HistoryRecord {
                        id: row.get(0)?,
                        source_text: row.get(1)?,
                        source_text_hash: row.get(2)?,
                        translated_text: row.get(3)?,
                        language_pair: row.get(4)?,
                        confidence: row.get(5)?,
                        processing_time_ms: row.get::<_, i64>(6)? as u64,
                        has_error: row.get(7)?,
                        created_at: row.get(8)?,
                    })
                })?;

                let records: Vec<HistoryRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(records)
            })
            .await
    }
}
