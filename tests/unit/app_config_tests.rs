/*!
 * Tests for engine configuration
 */

use anyhow::Result;
use translex::app_config::{EngineConfig, LogLevel};

use crate::common;

/// Test default configuration values
#[test]
fn test_engineConfig_default_shouldHaveDocumentedValues() {
    let config = EngineConfig::default();

    assert!(config.data_dir.is_none());
    assert!(!config.debug);
    assert_eq!(config.word_cache_size, 10_000);
    assert_eq!(config.phrase_cache_size, 5_000);
    assert!(config.supported_pairs.is_none());
    assert!(config.record_history);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test validation of cache sizes and pair overrides
#[test]
fn test_engineConfig_validate_shouldRejectBadValues() {
    let mut config = EngineConfig::default();
    config.word_cache_size = 0;
    assert!(config.validate().is_err());

    let config = EngineConfig::default().with_supported_pairs(["en-ru"]);
    assert!(config.validate().is_ok());

    let config = EngineConfig::default().with_supported_pairs(["notapair"]);
    assert!(config.validate().is_err());

    let config = EngineConfig::default().with_supported_pairs(["xx-yy"]);
    assert!(config.validate().is_err());
}

/// Test saving and loading a configuration file
#[test]
fn test_engineConfig_saveAndLoad_shouldRoundTrip() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("config.json");

    let config = EngineConfig::default()
        .with_data_dir("/tmp/translex-rules")
        .with_debug(true)
        .with_supported_pairs(["en-ru", "ru-en"])
        .with_record_history(false);
    config.save_to_file(&path)?;

    let loaded = EngineConfig::from_file(&path)?;
    assert_eq!(loaded.data_dir, config.data_dir);
    assert!(loaded.debug);
    assert_eq!(loaded.supported_pairs, config.supported_pairs);
    assert!(!loaded.record_history);

    Ok(())
}

/// Test that missing fields fall back to defaults when loading
#[test]
fn test_engineConfig_fromFile_withPartialJson_shouldApplyDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "partial.json",
        r#"{"debug": true}"#,
    )?;

    let config = EngineConfig::from_file(&path)?;
    assert!(config.debug);
    assert_eq!(config.word_cache_size, 10_000);
    assert!(config.record_history);

    Ok(())
}

/// Test loading a malformed configuration file
#[test]
fn test_engineConfig_fromFile_withBadJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        &temp_dir.path().to_path_buf(),
        "bad.json",
        "not json at all",
    )?;

    assert!(EngineConfig::from_file(&path).is_err());
    assert!(EngineConfig::from_file(temp_dir.path().join("missing.json")).is_err());

    Ok(())
}

/// Test explicit data directory resolution
#[test]
fn test_engineConfig_resolvedDataDir_withExplicitDir_shouldUseIt() {
    let config = EngineConfig::default().with_data_dir("/opt/rules");
    assert_eq!(config.resolved_data_dir(), std::path::PathBuf::from("/opt/rules"));
}
