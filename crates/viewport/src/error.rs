//! Error types for the viewport.

use sonar_common::TileStart;
use thiserror::Error;

/// Result type for viewport operations.
pub type ViewportResult<T> = Result<T, ViewportError>;

#[derive(Debug, Error)]
pub enum ViewportError {
    /// Tile data arrived before the total log width was known.
    #[error("Tile payload at {offset} received before the viewport was initialized")]
    NotInitialized { offset: TileStart },

    /// The session's event channel is closed.
    #[error("Viewport session has shut down")]
    SessionClosed,
}
