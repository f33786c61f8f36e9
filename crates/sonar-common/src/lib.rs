//! Common types and utilities shared across the sonar viewer crates.

pub mod channel;
pub mod display;
pub mod error;
pub mod ping;
pub mod tile;

pub use channel::ChannelKind;
pub use display::{DisplayOptions, Palette};
pub use error::{ParseError, ParseResult};
pub use ping::Ping;
pub use tile::{aligned_start, tile_starts_for_window, TileSpan, TileStart, DEFAULT_TILE_WIDTH};
