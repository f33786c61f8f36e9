//! Error types for parsing shared configuration values.

use thiserror::Error;

/// Result type alias using ParseError.
pub type ParseResult<T> = Result<T, ParseError>;

/// Errors raised when a textual option cannot be mapped to a known value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown sonar channel: {0}")]
    UnknownChannel(String),

    #[error("Unknown color palette: {0}")]
    UnknownPalette(String),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::InvalidValue {
            field: "json".to_string(),
            message: err.to_string(),
        }
    }
}
