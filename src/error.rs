//! Error types for the message categorizer.
//!
//! All fallible operations return [`CategorizerError`] through the crate-wide
//! [`Result`] alias. Constructor helpers keep call sites short.
//!
//! # Examples
//!
//! ```
//! use message_categorizer::error::{CategorizerError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(CategorizerError::invalid_config("max_df must be in (0, 1]"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for categorizer operations.
#[derive(Error, Debug)]
pub enum CategorizerError {
    /// I/O errors (artifact files, training data files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (invalid patterns, tokenizer setup).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Training-related errors (empty corpus, empty vocabulary, no usable rows).
    #[error("Training error: {0}")]
    Training(String),

    /// Invalid configuration values.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage backend errors.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Requested artifact does not exist.
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    /// Artifact bytes failed validation (magic, length, checksum, kind, payload).
    #[error("Corrupt artifact: {0}")]
    CorruptArtifact(String),

    /// Artifact was written by an incompatible format version.
    #[error("Artifact version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u16, found: u16 },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with CategorizerError.
pub type Result<T> = std::result::Result<T, CategorizerError>;

impl CategorizerError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        CategorizerError::Analysis(msg.into())
    }

    /// Create a new training error.
    pub fn training<S: Into<String>>(msg: S) -> Self {
        CategorizerError::Training(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        CategorizerError::InvalidConfig(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        CategorizerError::Storage(msg.into())
    }

    /// Create a new artifact-not-found error.
    pub fn not_found<S: Into<String>>(id: S) -> Self {
        CategorizerError::ArtifactNotFound(id.into())
    }

    /// Create a new corrupt artifact error.
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        CategorizerError::CorruptArtifact(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        CategorizerError::SerializationError(msg.into())
    }
}
