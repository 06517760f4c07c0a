//! Error types for Hvem.

use thiserror::Error;

/// Library-level error type for Hvem operations.
#[derive(Error, Debug)]
pub enum HvemError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed timestamp: {0:?} (expected HH:MM:SS[.ffffff])")]
    TimestampFormat(String),

    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Deepgram API error: {0}")]
    Deepgram(String),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External tool not found: {0}. Please install it and ensure it's in your PATH.")]
    ToolNotFound(String),

    #[error("External tool failed: {0}")]
    ToolFailed(String),
}

/// Result type alias for Hvem operations.
pub type Result<T> = std::result::Result<T, HvemError>;
