//! Error types for tile rendering.

use thiserror::Error;

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The pixel buffer does not hold `width * height` RGBA pixels.
    #[error("Pixel buffer of {actual} bytes does not match {width}x{height} image")]
    BufferSize {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

impl RenderError {
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}
