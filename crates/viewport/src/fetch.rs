//! Tile fetch boundary.
//!
//! The viewport never decodes logs itself. It asks a [`TileSource`] for the
//! pings of one tile and receives them as a [`TilePayload`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sonar_common::{Ping, TileStart};
use sonar_log::DecodeError;
use thiserror::Error;

/// Request for the tile starting at logical pixel `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Viewport height in pixels when the request was made.
    pub height: u32,
    pub tile_width: u32,
    pub offset: TileStart,
}

/// Data of one tile: its pings plus the per-pixel readings.
///
/// `low_limits`, `depths` and `temps` hold one value per pixel column
/// starting at `offset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TilePayload {
    pub offset: TileStart,
    pub pings: Vec<Ping>,
    pub low_limits: Vec<f32>,
    pub depths: Vec<f32>,
    pub temps: Vec<f32>,
}

impl TilePayload {
    /// Build a payload whose readings are taken from the pings themselves.
    pub fn from_pings(offset: TileStart, pings: Vec<Ping>) -> Self {
        Self {
            offset,
            low_limits: pings.iter().map(|p| p.low_limit).collect(),
            depths: pings.iter().map(|p| p.depth).collect(),
            temps: pings.iter().map(|p| p.temperature).collect(),
            pings,
        }
    }

    /// Number of pixel columns covered.
    pub fn width(&self) -> u32 {
        self.pings.len() as u32
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Tile source unavailable: {0}")]
    Unavailable(String),

    #[error("Fetch cancelled")]
    Cancelled,
}

impl FetchError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Outcome of one fetch, posted back to the viewport.
#[derive(Debug)]
pub struct FetchCompletion {
    pub request: FetchRequest,
    pub result: Result<TilePayload, FetchError>,
}

impl FetchCompletion {
    pub fn ok(request: FetchRequest, payload: TilePayload) -> Self {
        Self {
            request,
            result: Ok(payload),
        }
    }

    pub fn failed(request: FetchRequest, error: FetchError) -> Self {
        Self {
            request,
            result: Err(error),
        }
    }
}

/// Supplier of tile data.
#[async_trait]
pub trait TileSource: Send + Sync {
    /// Fetch the tile described by `request`.
    async fn fetch_tile(&self, request: FetchRequest) -> Result<TilePayload, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_from_pings() {
        let pings = vec![
            Ping {
                depth: 4.5,
                low_limit: 20.0,
                temperature: 11.0,
                ..Default::default()
            },
            Ping {
                depth: 5.5,
                low_limit: 40.0,
                temperature: 11.5,
                ..Default::default()
            },
        ];

        let payload = TilePayload::from_pings(800, pings);
        assert_eq!(payload.offset, 800);
        assert_eq!(payload.width(), 2);
        assert_eq!(payload.depths, vec![4.5, 5.5]);
        assert_eq!(payload.low_limits, vec![20.0, 40.0]);
        assert_eq!(payload.temps, vec![11.0, 11.5]);
    }

    #[test]
    fn test_decode_error_converts() {
        let err: FetchError = DecodeError::format_mismatch("bad block size").into();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(err.to_string().contains("bad block size"));
    }
}
