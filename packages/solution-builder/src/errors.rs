//! Error types for solution-builder
//!
//! Provides unified error handling across the crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for solution-builder operations
#[derive(Debug, Error)]
pub enum SolutionError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The project evaluator could not produce or persist a descriptor
    #[error("Evaluation error in {}: {message}", path.display())]
    Evaluation { path: PathBuf, message: String },

    /// Descriptor snapshot (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The root search directory is missing or unreadable
    #[error("Search directory {} is not readable: {reason}", path.display())]
    SearchRoot { path: PathBuf, reason: String },

    /// The explicit build manifest is missing or unreadable
    #[error("Build manifest {} is not readable: {reason}", path.display())]
    Manifest { path: PathBuf, reason: String },

    /// A solution file could not be read back
    #[error("Solution parse error at line {line}: {message}")]
    SolutionParse { line: usize, message: String },

    /// Pipeline error
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

impl SolutionError {
    /// Create an evaluation error for a descriptor
    pub fn evaluation(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        SolutionError::Evaluation {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a pipeline error
    pub fn pipeline(msg: impl Into<String>) -> Self {
        SolutionError::Pipeline(msg.into())
    }
}

/// Result type alias for solution-builder operations
pub type Result<T> = std::result::Result<T, SolutionError>;
