use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::language_utils;

/// Engine configuration module
/// This module handles the engine configuration including loading,
/// validating and saving configuration settings.
/// Represents the engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Directory holding rule files (`*.jsonl` / `*.ndjson`)
    ///
    /// When unset, `resolved_data_dir` falls back to the user data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Whether layers collect verbose diagnostic metadata by default
    #[serde(default)]
    pub debug: bool,

    /// Maximum number of entries in the word cache
    #[serde(default = "default_word_cache_size")]
    pub word_cache_size: usize,

    /// Maximum number of entries in the phrase cache
    #[serde(default = "default_phrase_cache_size")]
    pub phrase_cache_size: usize,

    /// Language pairs accepted by this engine instance
    ///
    /// When unset, the built-in supported set applies.
    #[serde(default)]
    pub supported_pairs: Option<HashSet<String>>,

    /// Whether completed translations are written to the history repository
    #[serde(default = "default_true")]
    pub record_history: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_word_cache_size() -> usize {
    10_000
}

fn default_phrase_cache_size() -> usize {
    5_000
}

fn default_true() -> bool {
    true
}

impl EngineConfig {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to open config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)
            .context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .context(format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.word_cache_size == 0 {
            return Err(anyhow!("word_cache_size must be greater than zero"));
        }
        if self.phrase_cache_size == 0 {
            return Err(anyhow!("phrase_cache_size must be greater than zero"));
        }

        // Validate language pair overrides
        if let Some(pairs) = &self.supported_pairs {
            for pair in pairs {
                let (source, target) = language_utils::parse_language_pair(pair)?;
                let _source_name = language_utils::get_language_name(&source)?;
                let _target_name = language_utils::get_language_name(&target)?;
            }
        }

        Ok(())
    }

    /// Directory the engine reads rule files from
    pub fn resolved_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("translex")
                .join("rules"),
        }
    }

    /// Set the rule data directory
    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Enable or disable verbose layer diagnostics
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Replace the supported language pair set
    pub fn with_supported_pairs<I, S>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_pairs = Some(pairs.into_iter().map(|p| p.into()).collect());
        self
    }

    /// Enable or disable translation history recording
    pub fn with_record_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }
}

/// Default implementation for EngineConfig
impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            data_dir: None,
            debug: false,
            word_cache_size: default_word_cache_size(),
            phrase_cache_size: default_phrase_cache_size(),
            supported_pairs: None,
            record_history: true,
            log_level: LogLevel::default(),
        }
    }
}
