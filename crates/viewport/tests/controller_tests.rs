//! End-to-end tests of the viewport controller driven synchronously.

use std::sync::{Arc, Mutex};

use sonar_common::{DisplayOptions, Palette, TileStart};
use test_utils::{assert_approx_eq, create_bottom_pings, create_depth_profile, fixtures};
use viewport::{
    FetchCompletion, FetchError, FetchRequest, ScreenOrigin, TilePayload, ViewportController,
};

const TILE: u32 = fixtures::viewport::TILE_WIDTH;
const ORIGIN: ScreenOrigin = ScreenOrigin { x: 20, y: 100 };

// ============================================================================
// Helper functions
// ============================================================================

fn wide_controller(total_width: u32) -> ViewportController {
    let (width, height) = fixtures::viewport::WIDE;
    let mut c = ViewportController::new(TILE, DisplayOptions::default());
    c.initialize(total_width);
    c.on_layout(width, height, ORIGIN);
    c
}

fn offsets(requests: &[FetchRequest]) -> Vec<TileStart> {
    requests.iter().map(|r| r.offset).collect()
}

/// Serve `request` with flat-bottom pings at `depth` over a 20 m low limit.
fn serve(c: &mut ViewportController, request: FetchRequest, depth: f32) -> Vec<TileStart> {
    let pings = create_bottom_pings(request.tile_width as usize, 64, depth, 20.0);
    let payload = TilePayload::from_pings(request.offset, pings);
    c.on_fetch_complete(FetchCompletion::ok(request, payload))
        .unwrap()
}

fn request(offset: TileStart) -> FetchRequest {
    FetchRequest {
        height: fixtures::viewport::WIDE.1,
        tile_width: TILE,
        offset,
    }
}

// ============================================================================
// Tile scheduling
// ============================================================================

#[test]
fn test_scroll_to_450_in_1000px_viewport() {
    let (width, height) = fixtures::viewport::WIDE;
    let mut c = ViewportController::new(TILE, DisplayOptions::default());
    c.initialize(fixtures::viewport::HOUR_LONG_LOG);

    let initial = c.on_layout(width, height, ORIGIN);
    assert_eq!(offsets(&initial), vec![0, 400, 800, 1200]);

    let scrolled = c.on_scroll(450);
    // Window [400, 1800) only adds the tile at 1600
    assert_eq!(offsets(&scrolled), vec![1600]);

    for start in [0, 400, 800] {
        assert!(c.is_requested(start), "tile {} not requested", start);
    }
    assert_eq!(c.requested_count(), 5);
}

#[test]
fn test_each_start_requested_once() {
    let mut c = wide_controller(fixtures::viewport::HOUR_LONG_LOG);
    let mut seen = Vec::new();
    seen.extend(offsets(&c.fetch_requests(0)));

    for scroll in [0, 10, 399, 400, 450, 1200, 3000, 450, 0, 3001] {
        seen.extend(offsets(&c.on_scroll(scroll)));
    }

    let mut unique = seen.clone();
    unique.sort_unstable();
    unique.dedup();
    assert_eq!(seen.len(), unique.len(), "duplicate requests in {:?}", seen);
    assert!(unique.iter().all(|s| s % TILE == 0));
}

#[test]
fn test_alignment_is_idempotent() {
    let mut a = wide_controller(10_000);
    let mut b = wide_controller(10_000);
    a.on_scroll(1234);
    b.on_scroll(1200);
    assert_eq!(a.requested_count(), b.requested_count());
    for start in (0..10_000).step_by(TILE as usize) {
        assert_eq!(a.is_requested(start), b.is_requested(start));
    }
}

#[test]
fn test_failed_fetch_stays_requested() {
    let mut c = wide_controller(10_000);
    c.on_fetch_complete(FetchCompletion::failed(
        request(400),
        FetchError::unavailable("server down"),
    ))
    .unwrap();

    assert!(c.is_requested(400));
    assert!(c.tile(400).is_none());
    assert!(c.on_scroll(0).is_empty());
    assert_eq!(c.failed_tiles().iter().copied().collect::<Vec<_>>(), vec![400]);
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_auto_range_is_max_of_visible_tiles() {
    let mut c = wide_controller(10_000);
    serve(&mut c, request(0), 3.2);
    serve(&mut c, request(400), 7.8);
    serve(&mut c, request(800), 5.0);

    assert_eq!(c.effective_range(), 7.8);
    for tile in c.tiles().values() {
        assert_eq!(tile.range(), 7.8);
        assert!(!tile.is_dirty());
    }
}

#[test]
fn test_auto_range_ignores_hidden_tiles() {
    let mut c = wide_controller(10_000);
    serve(&mut c, request(0), 3.0);
    serve(&mut c, request(400), 4.0);
    serve(&mut c, request(3200), 15.0);

    // [3200, 3600) is outside the window
    assert_eq!(c.effective_range(), 4.0);
    assert_eq!(c.tile(3200).map(|t| t.render_count()), Some(0));

    c.on_scroll(3000);
    assert_eq!(c.effective_range(), 15.0);
    assert_eq!(c.tile(3200).map(|t| t.render_count()), Some(1));
}

#[test]
fn test_render_pass_touches_only_visible_tiles() {
    let mut c = wide_controller(10_000);
    serve(&mut c, request(0), 5.0);
    let rendered = serve(&mut c, request(400), 5.0);
    assert_eq!(rendered, vec![400]);

    // Nothing changed: scrolling inside the window redraws nothing
    c.on_scroll(100);
    assert!(c.last_rendered().is_empty());

    c.on_scroll(1500);
    assert!(c.visible_tiles().next().is_none());
}

#[test]
fn test_set_display_pushes_options() {
    let mut c = wide_controller(10_000);
    serve(&mut c, request(0), 5.0);
    serve(&mut c, request(400), 5.0);

    let rendered = c.set_display(DisplayOptions {
        overlay: false,
        color: Palette::Thermal,
        sidescan: true,
        range: 0.0,
    });
    assert_eq!(rendered, vec![0, 400]);
    for tile in c.tiles().values() {
        assert!(!tile.options().overlay);
        assert_eq!(tile.options().color, Palette::Thermal);
        assert!(tile.options().sidescan);
    }
}

#[test]
fn test_mark_dirty_redraws_visible() {
    let mut c = wide_controller(10_000);
    serve(&mut c, request(0), 5.0);
    serve(&mut c, request(400), 5.0);
    let before = c.tile(0).map(|t| t.render_count());

    c.mark_dirty();
    assert_eq!(c.last_rendered(), &[0, 400]);
    assert_eq!(c.tile(0).map(|t| t.render_count()), before.map(|n| n + 1));
}

#[test]
fn test_height_change_resizes_tiles() {
    let mut c = wide_controller(10_000);
    serve(&mut c, request(0), 5.0);

    c.on_layout(1000, 150, ORIGIN);
    let tile = c.tile(0).unwrap();
    assert_eq!(tile.height(), 150);
    assert_eq!(tile.pixels().len(), 400 * 150 * 4);
    assert_eq!(c.last_rendered(), &[0]);
}

// ============================================================================
// Pointer and ruler
// ============================================================================

#[test]
fn test_pointer_readout() {
    let mut c = wide_controller(10_000);
    let pings = create_depth_profile(400, 64, 20.0, |i| if i == 130 { 6.0 } else { 5.0 });
    c.on_fetch_complete(FetchCompletion::ok(
        request(0),
        TilePayload::from_pings(0, pings),
    ))
    .unwrap();
    c.on_scroll(100);

    // client (50, 250) -> logical (50 - 20 + 100, 250 - 100) = (130, 150)
    let (readout, ruler) = c.pointer_move(50, 250).unwrap();
    assert_eq!(readout.x, 130);
    assert_eq!(readout.y, 150);
    assert_eq!(readout.screen_x, 30);
    assert_eq!(readout.depth, 6.0);
    assert_eq!(readout.temp, 12.5);
    // Auto range is 6 m, half height
    assert_approx_eq!(readout.cursor, 3.0, 1e-5);
    assert_eq!(readout.depth_label(), "Depth: 6 m");
    assert_eq!(readout.cursor_label(), "Cursor: 3.0 m");
    assert_eq!(readout.temp_label(), "Temp: 12.5 C");

    // 300 * 6 / 20 = 90, rescaled by 20 / 6 to the full height
    assert_eq!(ruler.screen_x, 30);
    assert_eq!(ruler.height, 300);
    assert_eq!(ruler.marker_row, Some(300));
}

#[test]
fn test_pointer_outside_tiles() {
    let mut c = wide_controller(10_000);
    serve(&mut c, request(0), 5.0);

    assert!(c.pointer_move(10, 150).is_none());
    // Logical 500 has no tile yet
    assert!(c.pointer_move(520, 150).is_none());
}

#[test]
fn test_side_scan_cursor_and_ruler() {
    let mut c = wide_controller(10_000);
    serve(&mut c, request(0), 5.0);
    c.set_display(DisplayOptions {
        sidescan: true,
        range: 30.0,
        ..Default::default()
    });

    // y = 250 - 100 = 150 is the center line
    let (center, ruler) = c.pointer_move(120, 250).unwrap();
    assert_eq!(center.cursor, 0.0);
    assert_eq!(ruler.marker_row, None);

    // y = 25: 125 px from the center of a 150 px half
    let (edge, _) = c.pointer_move(120, 125).unwrap();
    assert_approx_eq!(edge.cursor, 25.0, 1e-4);
}

#[test]
fn test_ruler_marker_skipped_without_low_limit() {
    let mut c = wide_controller(10_000);
    let pings = create_bottom_pings(400, 64, 5.0, 0.0);
    c.on_fetch_complete(FetchCompletion::ok(request(0), TilePayload::from_pings(0, pings)))
        .unwrap();

    let (_, ruler) = c.pointer_move(120, 250).unwrap();
    assert_eq!(ruler.marker_row, None);
}

#[test]
fn test_click_listener_receives_logical_x() {
    let clicks = Arc::new(Mutex::new(Vec::new()));
    let mut c = wide_controller(10_000);
    let sink = Arc::clone(&clicks);
    c.set_click_listener(move |x| sink.lock().unwrap().push(x));

    c.on_scroll(450);
    assert_eq!(c.click(70, 300), Some(500));
    assert_eq!(c.click(0, 0), Some(430));
    assert_eq!(*clicks.lock().unwrap(), vec![500, 430]);
}
