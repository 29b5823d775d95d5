/*!
 * Schema for the lexicon and history tables.
 *
 * The schema is versioned through a single-row `schema_version` table so
 * that future releases can upgrade an existing database in place. `apply`
 * is idempotent and runs on every connection open.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Version written into fresh databases
pub const SCHEMA_VERSION: i32 = 1;

/// Create or migrate the schema on `conn`
pub fn apply(conn: &Connection) -> Result<()> {
    match current_version(conn)? {
        0 => {
            info!("Creating database schema v{}", SCHEMA_VERSION);
            create_tables(conn)?;
            record_version(conn, SCHEMA_VERSION)?;
        }
        version if version < SCHEMA_VERSION => migrate(conn, version)?,
        version => debug!("Database schema v{} is current", version),
    }

    Ok(())
}

/// Schema version recorded in the database, 0 for a fresh database
fn current_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to read sqlite_master")?;

    if !table_exists {
        return Ok(0);
    }

    Ok(conn
        .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
        .unwrap_or(0))
}

fn record_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at)
         VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create every table and index of the current schema
///
/// `words` and `phrases` are keyed by normalized source text per language
/// pair; `lookup_count` tracks hit frequency for lexicon maintenance.
fn create_tables(conn: &Connection) -> Result<()> {
    // WAL keeps readers from blocking the single writer
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_text TEXT NOT NULL,
            translation TEXT NOT NULL,
            language_pair TEXT NOT NULL,
            part_of_speech TEXT,
            confidence REAL NOT NULL DEFAULT 100.0,
            lookup_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            UNIQUE(source_text, language_pair)
        );

        CREATE INDEX IF NOT EXISTS idx_words_lookup
            ON words(language_pair, source_text);

        CREATE TABLE IF NOT EXISTS phrases (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_text TEXT NOT NULL,
            translation TEXT NOT NULL,
            language_pair TEXT NOT NULL,
            category TEXT,
            confidence REAL NOT NULL DEFAULT 100.0,
            lookup_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            UNIQUE(source_text, language_pair)
        );

        CREATE INDEX IF NOT EXISTS idx_phrases_lookup
            ON phrases(language_pair, source_text);
        CREATE INDEX IF NOT EXISTS idx_phrases_category
            ON phrases(category);

        CREATE TABLE IF NOT EXISTS translation_history (
            id TEXT PRIMARY KEY,
            source_text TEXT NOT NULL,
            source_text_hash TEXT NOT NULL,
            translated_text TEXT NOT NULL,
            language_pair TEXT NOT NULL,
            confidence REAL NOT NULL,
            processing_time_ms INTEGER NOT NULL,
            has_error INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_history_pair
            ON translation_history(language_pair, created_at);
        CREATE INDEX IF NOT EXISTS idx_history_hash
            ON translation_history(source_text_hash);
        "#,
    )?;

    debug!("Database tables created");
    Ok(())
}

/// Upgrade an older database in place
///
/// v1 is the first published schema, so no upgrade path exists yet.
fn migrate(_conn: &Connection, from: i32) -> Result<()> {
    Err(anyhow::anyhow!(
        "Database schema v{} has no migration path to v{}",
        from,
        SCHEMA_VERSION
    ))
}
