//! Tests for tile rasterization and the tile geometry helpers.

use bytes::Bytes;
use renderer::{overlay_color, palette_color, TileRenderer};
use sonar_common::{DisplayOptions, Palette, Ping};
use test_utils::{create_bottom_pings, create_depth_profile};

// ============================================================================
// Helper functions
// ============================================================================

fn options(range: f32, overlay: bool) -> DisplayOptions {
    DisplayOptions {
        overlay,
        range,
        ..Default::default()
    }
}

fn pixel(tile: &TileRenderer, x: usize, y: usize) -> [u8; 4] {
    let idx = (y * tile.width() as usize + x) * 4;
    let px = &tile.pixels()[idx..idx + 4];
    [px[0], px[1], px[2], px[3]]
}

fn amber(intensity: u8) -> [u8; 4] {
    palette_color(Palette::Amber, intensity).to_array()
}

fn side_scan_ping() -> Ping {
    // left channel [1, 2, 3] reversed, then right channel [7, 8, 9]
    Ping {
        soundings: Bytes::from_static(&[3, 2, 1, 7, 8, 9]),
        ..Default::default()
    }
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_is_visible() {
    let tile = TileRenderer::new(Vec::new(), 400, 400, 300, DisplayOptions::default());

    assert!(!tile.is_visible(0, 400));
    assert!(tile.is_visible(0, 401));
    assert!(tile.is_visible(450, 1000));
    assert!(tile.is_visible(799, 10));
    assert!(!tile.is_visible(800, 1000));
    assert!(!tile.is_visible(450, 0));
}

#[test]
fn test_is_current() {
    let tile = TileRenderer::new(Vec::new(), 400, 400, 300, DisplayOptions::default());

    assert!(!tile.is_current(399));
    assert!(tile.is_current(400));
    assert!(tile.is_current(799));
    assert!(!tile.is_current(800));
}

#[test]
fn test_max_depth_area() {
    let depths = [3.2, 7.8, 5.0];
    let pings = create_depth_profile(3, 16, 20.0, |i| depths[i]);
    let tile = TileRenderer::new(pings, 0, 400, 300, DisplayOptions::default());
    assert_eq!(tile.max_depth_area(), 7.8);

    let empty = TileRenderer::new(Vec::new(), 0, 400, 300, DisplayOptions::default());
    assert_eq!(empty.max_depth_area(), 0.0);
}

#[test]
fn test_map_pixel_row_to_depth() {
    let pings = create_bottom_pings(10, 16, 5.0, 20.0);
    let mut tile = TileRenderer::new(pings, 400, 400, 300, options(10.0, true));

    assert_eq!(tile.map_pixel_row_to_depth(405, 30), 60);
    // No ping behind the column
    assert_eq!(tile.map_pixel_row_to_depth(420, 30), 30);
    assert_eq!(tile.map_pixel_row_to_depth(100, 30), 30);

    tile.set_range(0.0);
    assert_eq!(tile.map_pixel_row_to_depth(405, 30), 30);

    let unscaled = create_bottom_pings(10, 16, 5.0, 0.0);
    let tile = TileRenderer::new(unscaled, 0, 400, 300, options(10.0, true));
    assert_eq!(tile.map_pixel_row_to_depth(5, 30), 30);
}

// ============================================================================
// Dirty tracking
// ============================================================================

#[test]
fn test_render_is_idempotent() {
    let pings = create_bottom_pings(400, 64, 8.0, 20.0);
    let mut tile = TileRenderer::new(pings, 0, 400, 100, options(10.0, true));

    assert!(tile.is_dirty());
    assert!(tile.render());
    assert!(!tile.render());
    assert_eq!(tile.render_count(), 1);

    // Setting an unchanged value does not invalidate the image
    tile.set_range(10.0);
    tile.set_color(Palette::Amber);
    tile.set_overlay(true);
    tile.set_sidescan(false);
    tile.set_height(100);
    assert!(!tile.is_dirty());

    tile.set_color(Palette::Thermal);
    assert!(tile.is_dirty());
    assert!(tile.render());
    assert_eq!(tile.render_count(), 2);

    tile.mark_dirty();
    assert!(tile.render());
    assert_eq!(tile.render_count(), 3);
}

#[test]
fn test_set_height_resizes_image() {
    let mut tile = TileRenderer::new(Vec::new(), 0, 40, 10, DisplayOptions::default());
    assert_eq!(tile.pixels().len(), 40 * 10 * 4);

    tile.set_height(25);
    assert_eq!(tile.height(), 25);
    assert_eq!(tile.pixels().len(), 40 * 25 * 4);
    assert!(tile.is_dirty());
}

// ============================================================================
// Down-looking rasterization
// ============================================================================

#[test]
fn test_down_looking_rows_follow_range() {
    // 100 samples over 20 m; bottom at 8 m is sample 40
    let pings = create_bottom_pings(4, 100, 8.0, 20.0);
    let mut tile = TileRenderer::new(pings, 0, 4, 100, options(20.0, false));
    tile.render();

    // Range equals the low limit: row y shows sample y
    assert_eq!(pixel(&tile, 0, 10), amber(16));
    assert_eq!(pixel(&tile, 0, 60), amber(224));

    // Half the range: the bottom moves down to row 80
    tile.set_range(10.0);
    tile.render();
    assert_eq!(pixel(&tile, 1, 60), amber(16));
    assert_eq!(pixel(&tile, 1, 90), amber(224));
}

#[test]
fn test_rows_below_low_limit_are_background() {
    let pings = create_bottom_pings(2, 100, 8.0, 20.0);
    let mut tile = TileRenderer::new(pings, 0, 2, 100, options(40.0, false));
    tile.render();

    assert_eq!(pixel(&tile, 0, 30), amber(224));
    assert_eq!(pixel(&tile, 0, 75), amber(0));
}

#[test]
fn test_unknown_scale_stretches_profile() {
    let pings = create_bottom_pings(2, 100, 8.0, 20.0);
    let mut tile = TileRenderer::new(pings, 0, 2, 50, options(0.0, false));
    tile.render();

    // Row y shows sample 2y
    assert_eq!(pixel(&tile, 0, 10), amber(16));
    assert_eq!(pixel(&tile, 0, 30), amber(224));
}

#[test]
fn test_columns_without_pings_are_background() {
    let pings = create_bottom_pings(5, 100, 8.0, 20.0);
    let mut tile = TileRenderer::new(pings, 0, 10, 100, options(20.0, false));
    tile.render();

    assert_eq!(pixel(&tile, 4, 60), amber(224));
    assert_eq!(pixel(&tile, 5, 60), amber(0));
    assert_eq!(pixel(&tile, 9, 60), amber(0));
}

#[test]
fn test_bottom_overlay() {
    let pings = create_bottom_pings(4, 100, 8.0, 20.0);
    let mut tile = TileRenderer::new(pings, 0, 4, 100, options(20.0, true));
    tile.render();

    let line = overlay_color(Palette::Amber).to_array();
    for x in 0..4 {
        assert_eq!(pixel(&tile, x, 40), line);
    }
    assert_ne!(pixel(&tile, 0, 39), line);

    tile.set_overlay(false);
    tile.render();
    assert_ne!(pixel(&tile, 0, 40), line);
}

// ============================================================================
// Side-scan rasterization
// ============================================================================

#[test]
fn test_side_scan_mirrors_channels() {
    let pings = vec![side_scan_ping(); 3];
    let mut tile = TileRenderer::new(
        pings,
        0,
        3,
        12,
        DisplayOptions {
            overlay: false,
            sidescan: true,
            color: Palette::Grayscale,
            range: 0.0,
        },
    );
    tile.render();

    let gray = |v: u8| palette_color(Palette::Grayscale, v).to_array();
    // Top half: left channel, innermost next to the center line
    assert_eq!(pixel(&tile, 0, 5), gray(1));
    assert_eq!(pixel(&tile, 0, 1), gray(3));
    // Bottom half: right channel
    assert_eq!(pixel(&tile, 0, 6), gray(7));
    assert_eq!(pixel(&tile, 0, 11), gray(9));

    tile.set_overlay(true);
    tile.render();
    assert_eq!(
        pixel(&tile, 2, 6),
        overlay_color(Palette::Grayscale).to_array()
    );
}
