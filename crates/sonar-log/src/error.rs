//! Error types for sonar log decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for decoder operations.
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Errors raised while opening a log or reading pings from it.
///
/// Every error is fatal to the call that produced it: no partial ping
/// list is ever returned.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// A header, index or data file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A header or index file ended before a complete field could be read.
    #[error("Truncated {section}: needed {needed} bytes, {available} available")]
    Truncated {
        section: &'static str,
        needed: usize,
        available: usize,
    },

    /// A ping record runs past the end of its data file.
    #[error("Short record at byte {offset}: needed {needed} bytes, {available} available")]
    ShortRecord {
        offset: u64,
        needed: usize,
        available: usize,
    },

    /// The file does not follow the expected vendor layout.
    #[error("Format mismatch: {0}")]
    FormatMismatch(String),

    /// The requested ping range lies outside the log.
    #[error("Ping range {offset}+{count} is outside a log of {len} pings")]
    OutOfRange {
        offset: usize,
        count: usize,
        len: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    pub fn format_mismatch(msg: impl Into<String>) -> Self {
        Self::FormatMismatch(msg.into())
    }

    /// Map an I/O error on `path`, turning `NotFound` into `FileNotFound`.
    pub fn from_io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound(path.into())
        } else {
            Self::Io(err)
        }
    }
}
