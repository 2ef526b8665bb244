use std::path::PathBuf;
use thiserror::Error;

/// Configuration syntax error raised while lexing or parsing a Corsfile
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{file}:{line} - Syntax error: {message}")]
pub struct SyntaxError {
    /// Name of the configuration source (usually the file path)
    pub file: String,

    /// 1-based line of the offending token (0 when the input was empty)
    pub line: usize,

    /// The offending token or directive
    pub token: String,

    /// Human-readable description
    pub message: String,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Result type alias for AppResult
pub type AppResult<T> = Result<T, AppError>;
