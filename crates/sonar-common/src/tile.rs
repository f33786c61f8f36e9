//! Horizontal tiling of the scroll axis.
//!
//! The scroll axis is one pixel per ping. It is cut into fixed-width tiles
//! `[k·W, (k+1)·W)`; a tile is identified by its aligned start offset.

use serde::{Deserialize, Serialize};

/// Tile width used by the reference viewer, in pixels.
pub const DEFAULT_TILE_WIDTH: u32 = 400;

/// Pixel offset of the first column of a tile.
pub type TileStart = u32;

/// Align a pixel offset down to the start of its tile.
///
/// `aligned_start(aligned_start(o, w), w) == aligned_start(o, w)` for any `w > 0`.
pub fn aligned_start(offset: u32, tile_width: u32) -> TileStart {
    if tile_width == 0 {
        return offset;
    }
    offset - offset % tile_width
}

/// Every tile start a fetch at `offset` must cover for a window `viewport_width` wide.
///
/// Covers `[aligned(offset), aligned(offset) + viewport_width + tile_width)`, one
/// extra tile past the right edge so partially visible tiles are prefetched.
pub fn tile_starts_for_window(offset: u32, viewport_width: u32, tile_width: u32) -> Vec<TileStart> {
    if tile_width == 0 {
        return Vec::new();
    }
    let first = aligned_start(offset, tile_width);
    let end = first
        .saturating_add(viewport_width)
        .saturating_add(tile_width);
    (first..end).step_by(tile_width as usize).collect()
}

/// Half-open pixel range covered by one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSpan {
    pub start: TileStart,
    pub width: u32,
}

impl TileSpan {
    pub fn new(start: TileStart, width: u32) -> Self {
        Self { start, width }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> u32 {
        self.start.saturating_add(self.width)
    }

    pub fn contains(&self, offset: u32) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// Whether this span intersects the window `[scroll, scroll + viewport_width)`.
    pub fn intersects(&self, scroll: u32, viewport_width: u32) -> bool {
        let window_end = scroll.saturating_add(viewport_width);
        self.width > 0 && viewport_width > 0 && self.start < window_end && scroll < self.end()
    }
}
