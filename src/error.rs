//! Error types for docunit library.

use std::io;
use thiserror::Error;

/// Result type alias for docunit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the crate's I/O and parsing boundaries.
///
/// The normalization and scoring algorithms themselves degrade instead of
/// failing; these variants surface only when reading inputs or writing
/// outputs.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The OCR response or token payload does not have the expected shape.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Page numbers are 1-based.
    #[error("Page {0} is out of range (pages are numbered from 1)")]
    PageOutOfRange(u32),

    /// Error during rendering (JSONL, JSON, request bodies).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageOutOfRange(0);
        assert_eq!(
            err.to_string(),
            "Page 0 is out of range (pages are numbered from 1)"
        );

        let err = Error::InvalidInput("missing Blocks".to_string());
        assert_eq!(err.to_string(), "Invalid input: missing Blocks");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
