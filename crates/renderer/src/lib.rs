//! Image rendering for sonar log tiles.
//!
//! Implements:
//! - Echo intensity palettes
//! - Per-tile rasterization of ping columns (down-looking and side-scan)
//! - PNG encoding (indexed or RGBA)

pub mod error;
pub mod gradient;
pub mod png;
pub mod tile;

pub use error::{RenderError, RenderResult};
pub use gradient::{interpolate_color, overlay_color, palette_color, palette_table, Color};
pub use tile::TileRenderer;
