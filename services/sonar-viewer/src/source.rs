//! Tile source backed by a decoded sonar log.

use std::sync::Arc;

use async_trait::async_trait;
use sonar_log::SonarSource;
use tracing::debug;
use viewport::{FetchError, FetchRequest, TilePayload, TileSource};

/// Serves tiles by decoding pings from a [`SonarSource`] on the blocking pool.
pub struct LogTileSource {
    log: Arc<dyn SonarSource>,
}

impl LogTileSource {
    pub fn new(log: Arc<dyn SonarSource>) -> Self {
        Self { log }
    }

    /// Total pixel width of the log, one column per ping.
    pub fn total_width(&self) -> u32 {
        u32::try_from(self.log.len()).unwrap_or(u32::MAX)
    }

    /// Decode the pings of one tile: `min(tile_width, len - offset)` starting
    /// at `offset`.
    pub fn load(log: &dyn SonarSource, request: FetchRequest) -> Result<TilePayload, FetchError> {
        let offset = request.offset as usize;
        let count = (request.tile_width as usize).min(log.len().saturating_sub(offset));
        let pings = log.ping_range(offset, count)?;

        debug!(
            offset = request.offset,
            pings = pings.len(),
            channel = %log.channel(),
            "Decoded tile"
        );
        Ok(TilePayload::from_pings(request.offset, pings))
    }
}

#[async_trait]
impl TileSource for LogTileSource {
    async fn fetch_tile(&self, request: FetchRequest) -> Result<TilePayload, FetchError> {
        let log = Arc::clone(&self.log);
        tokio::task::spawn_blocking(move || Self::load(log.as_ref(), request))
            .await
            .map_err(|e| FetchError::unavailable(format!("decode task failed: {}", e)))?
    }
}
