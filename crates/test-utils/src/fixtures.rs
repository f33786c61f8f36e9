//! Common test fixtures for sonar viewer tests.
//!
//! This module provides pre-defined values that represent common
//! scenarios in sonar log viewing.

/// Viewport geometry used across viewport tests.
pub mod viewport {
    /// Tile width of the reference viewer.
    pub const TILE_WIDTH: u32 = 400;

    /// A wide desktop viewport.
    pub const WIDE: (u32, u32) = (1000, 300);

    /// Pixel length of a typical one hour recording at ~10 pings per second.
    pub const HOUR_LONG_LOG: u32 = 36_000;
}

/// Known positions for coordinate conversion tests, as (lat, lon) degrees.
pub mod positions {
    /// Lake Näsijärvi, Finland.
    pub const NASIJARVI: (f64, f64) = (61.55, 23.75);

    /// Lake of the Ozarks, Missouri.
    pub const OZARKS: (f64, f64) = (38.15, -92.75);

    /// Lake Taupo, New Zealand.
    pub const TAUPO: (f64, f64) = (-38.80, 175.90);
}

/// Recording names as they appear inside `.DAT` headers.
pub mod recordings {
    pub const TRADITIONAL: &str = "R00001.DAT";
    pub const SIDE_SCAN: &str = "R00002.DAT";
}
