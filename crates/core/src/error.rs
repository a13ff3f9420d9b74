//! Error types for the Crabdesk domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! The knowledge-build pipeline has its own bounded-context error enum.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all Crabdesk operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Knowledge pipeline errors ---
    #[error("Knowledge error: {0}")]
    Knowledge(#[from] KnowledgeError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building or loading the topic catalog.
///
/// A broken source file aborts the whole build: a parse failure corrupts an
/// unknown subset of intents, so a partial catalog is never produced.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Failed to read source {path}: {reason}")]
    SourceRead { path: PathBuf, reason: String },

    #[error("Failed to parse source {path}: {reason}")]
    SourceParse { path: PathBuf, reason: String },

    #[error("Failed to read catalog artifact {path}: {reason}")]
    CatalogRead { path: PathBuf, reason: String },

    #[error("Failed to parse catalog artifact {path}: {reason}")]
    CatalogParse { path: PathBuf, reason: String },

    #[error("Failed to write catalog artifact {path}: {reason}")]
    CatalogWrite { path: PathBuf, reason: String },

    #[error("Failed to compile pattern for trigger {trigger:?}: {reason}")]
    Pattern { trigger: String, reason: String },
}
