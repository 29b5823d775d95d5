/*!
 * Common test utilities for the translex test suite
 */

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use translex::app_config::EngineConfig;
use translex::repositories::{
    InMemoryDictionary, InMemoryHistory, InMemoryPhrases, PhraseRecord, PhraseRepository,
};
use translex::TranslationEngine;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a rule file from NDJSON lines
pub fn create_rule_file(dir: &PathBuf, filename: &str, lines: &[&str]) -> Result<PathBuf> {
    create_test_file(dir, filename, &format!("{}\n", lines.join("\n")))
}

/// Route engine log output through the test harness
///
/// Safe to call more than once; only the first call installs the logger.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Configuration pointing rule loading at a directory that stays empty
///
/// Keeps tests independent of whatever lives in the real user data dir.
pub fn test_config() -> EngineConfig {
    init_test_logging();
    let dir = std::env::temp_dir().join(format!("translex-tests-{}", uuid::Uuid::new_v4()));
    EngineConfig::default().with_data_dir(dir)
}

/// The standard en-ru dictionary fixture
pub fn seeded_dictionary() -> Arc<InMemoryDictionary> {
    Arc::new(InMemoryDictionary::with_entries(
        "en-ru",
        [
            ("good", "хороший"),
            ("morning", "утро"),
            ("friend", "друг"),
            ("hello", "привет"),
            ("world", "мир"),
        ],
    ))
}

/// The standard en-ru phrase fixture ("good morning", confidence 95)
pub async fn seeded_phrases() -> Result<Arc<InMemoryPhrases>> {
    let phrases = InMemoryPhrases::new();
    let record = PhraseRecord::new("Good morning", "доброе утро", "en-ru")
        .with_confidence(95.0)
        .with_category("greetings");
    phrases.insert_phrase(&record).await?;
    Ok(Arc::new(phrases))
}

/// An initialized engine over the standard fixtures and a given config
pub async fn ready_engine(config: EngineConfig) -> Result<TranslationEngine> {
    let engine = TranslationEngine::new(
        config,
        seeded_dictionary(),
        seeded_phrases().await?,
        Some(Arc::new(InMemoryHistory::new())),
    );
    engine.initialize().await?;
    Ok(engine)
}
