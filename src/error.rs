//! Error types for the formatting engine.
//!
//! Recoverable conditions (empty selections, out-of-bounds ranges, empty
//! undo history) never produce an error: ranges are clamped and the
//! operation becomes a no-op. Only codec and configuration failures are
//! surfaced, and a failing call leaves the document untouched.

use thiserror::Error;

/// Errors raised while importing or exporting a document.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The native file declares a schema version this engine cannot read.
    #[error("unsupported document schema version {found} (expected {expected})")]
    UnsupportedSchemaVersion {
        /// Version found in the file, rendered as JSON.
        found: String,
        /// Version this engine reads and writes.
        expected: u64,
    },

    /// The payload parsed but its content is inconsistent.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// The payload is not valid JSON or does not match the native schema.
    #[error("invalid native document: {0}")]
    Json(#[from] serde_json::Error),

    /// No codec for the requested structured format was provided.
    #[error("{0} codec is not available")]
    Unavailable(&'static str),

    /// The structured-format library reported a failure.
    #[error("{codec} codec failed: {message}")]
    Failure {
        /// Name of the failing codec.
        codec: &'static str,
        /// Message reported by the library.
        message: String,
    },
}

/// Errors raised while reading a [`FormatConfig`](crate::FormatConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color '{0}' (expected #rgb or #rrggbb)")]
pub struct ParseColorError(pub String);

pub type CodecResult<T> = std::result::Result<T, CodecError>;
