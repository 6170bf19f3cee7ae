//! Error types for TOON encoding and decoding operations.

use thiserror::Error;

/// Errors that can occur during TOON encoding or decoding.
#[derive(Error, Debug)]
pub enum ToonError {
    /// The input string was not valid JSON (JSON bridge path).
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input string was not valid TOON.
    /// Includes the 1-based line number where the error was detected.
    #[error("TOON parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A value or key that the flat TOON grammar cannot represent.
    #[error("Encoding error: {0}")]
    Encode(String),
}

/// Convenience alias used throughout toon-codec.
pub type Result<T> = std::result::Result<T, ToonError>;
