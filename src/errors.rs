/*!
 * Error types for the translex engine.
 *
 * This module contains custom error types for different parts of the engine,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur during engine lifecycle operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Error when an operation is called in the wrong lifecycle state
    #[error("Invalid engine state: expected {expected}, current state is {current}")]
    InvalidState {
        /// State the operation requires
        expected: String,
        /// State the engine is actually in
        current: String,
    },

    /// Error when engine initialization fails
    #[error("Engine initialization failed: {0}")]
    InitializationFailed(String),

    /// Error when a requested language pair is not supported
    #[error("Unsupported language pair: {0}")]
    UnsupportedLanguagePair(String),

    /// Error when the engine has been disposed
    #[error("Engine has been disposed")]
    Disposed,
}

/// Errors that can occur during pipeline execution
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error when process is called while a previous call is still running
    #[error("Pipeline is already processing a request")]
    AlreadyProcessing,

    /// Error when a layer fails in a way the pipeline cannot absorb
    #[error("Layer '{layer}' failed: {message}")]
    LayerFailed {
        /// Name of the failing layer
        layer: String,
        /// Failure description
        message: String,
    },
}

/// Errors that can occur when loading or applying rules
#[derive(Error, Debug)]
pub enum RuleError {
    /// Error reading a rule file
    #[error("Failed to read rule file '{path}': {message}")]
    FileRead {
        /// Path of the rule file
        path: String,
        /// Underlying I/O failure
        message: String,
    },

    /// Error parsing a rule definition
    #[error("Invalid rule at line {line}: {message}")]
    InvalidRule {
        /// Line number within the rule file
        line: usize,
        /// Parse failure description
        message: String,
    },

    /// Error compiling a rule pattern
    #[error("Invalid pattern in rule '{rule_id}': {message}")]
    InvalidPattern {
        /// Identifier of the offending rule
        rule_id: String,
        /// Regex compilation failure
        message: String,
    },
}

/// Errors that can occur with repository backends
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// Error from the underlying storage
    #[error("Storage error: {0}")]
    Storage(String),

    /// Error when a record cannot be decoded
    #[error("Failed to decode record: {0}")]
    Decode(String),
}

/// Main translation error type that wraps all other errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the engine lifecycle
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Error from pipeline execution
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Error from rule loading or application
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Error from a repository backend
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for TranslationError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for TranslationError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
