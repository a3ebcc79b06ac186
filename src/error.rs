//! Error types for lumen
//!
//! Provides standardized error handling across the launcher core.

use thiserror::Error;

use crate::extensions::ExtensionError;

/// Errors that can occur in lumen
#[derive(Debug, Error)]
pub enum LumenError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Settings store errors
    #[error("Settings error: {0}")]
    Settings(String),

    /// Clipboard operation errors
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Errors from the operating system integration (opening URLs, files)
    #[error("Platform error: {0}")]
    Platform(String),

    /// Extension loading or execution errors
    #[error(transparent)]
    Extension(#[from] ExtensionError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("Config serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

/// Result type alias for lumen operations
pub type LumenResult<T> = Result<T, LumenError>;
