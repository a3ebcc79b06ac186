//! Error types for the extension system.

use std::path::PathBuf;
use thiserror::Error;

use crate::translator::TranslationError;

/// Errors that can occur in the extension system.
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error("Extension '{0}' not found")]
    NotFound(String),

    #[error("Extension '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("No handler registered for '{0}'")]
    HandlerNotFound(String),

    #[error("Action handler '{0}' is already registered")]
    HandlerAlreadyRegistered(String),

    #[error("Extension '{extension}' does not declare a setting named '{key}'")]
    UnknownSetting { extension: String, key: String },

    #[error("{0}")]
    MissingSetting(String),

    #[error("Malformed action argument: {0}")]
    MalformedArgument(String),

    #[error("Extension '{0}' cannot be invoked")]
    NotInvokable(String),

    #[error("No asset for key '{key}' in extension '{extension}'")]
    UnknownAsset { extension: String, key: String },

    #[error("{0}")]
    Remote(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read bookmarks from {path}: {message}")]
    Repository { path: PathBuf, message: String },

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Extension task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for extension operations.
pub type ExtensionResult<T> = Result<T, ExtensionError>;
