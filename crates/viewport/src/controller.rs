//! Viewport state machine.
//!
//! The controller owns every piece of viewport state: geometry, display
//! options, the depth table, the set of requested tile starts and one
//! [`TileRenderer`] per received tile. It performs no I/O; operations that
//! need data return the [`FetchRequest`]s the caller must issue and the
//! results come back through [`ViewportController::on_fetch_complete`].

use std::collections::{BTreeMap, BTreeSet, HashSet};

use renderer::TileRenderer;
use sonar_common::{tile_starts_for_window, DisplayOptions, TileStart, DEFAULT_TILE_WIDTH};
use tracing::{debug, info, warn};

use crate::depth_table::DepthTable;
use crate::error::{ViewportError, ViewportResult};
use crate::fetch::{FetchCompletion, FetchRequest};
use crate::pointer::{Readout, ScreenOrigin, ViewportGeometry};
use crate::ruler::RulerOverlay;

/// Receives the logical X of clicks.
pub type ClickListener = Box<dyn FnMut(u32) + Send>;

pub struct ViewportController {
    tile_width: u32,
    geometry: ViewportGeometry,
    options: DisplayOptions,
    total_width: Option<u32>,
    table: Option<DepthTable>,
    /// Every start ever requested. Entries are only removed by
    /// [`retry_failed_tiles`](Self::retry_failed_tiles).
    requested: HashSet<TileStart>,
    failed: BTreeSet<TileStart>,
    tiles: BTreeMap<TileStart, TileRenderer>,
    last_rendered: Vec<TileStart>,
    click_listener: Option<ClickListener>,
}

impl std::fmt::Debug for ViewportController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportController")
            .field("tile_width", &self.tile_width)
            .field("geometry", &self.geometry)
            .field("options", &self.options)
            .field("total_width", &self.total_width)
            .field("requested", &self.requested.len())
            .field("failed", &self.failed)
            .field("tiles", &self.tiles.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_WIDTH, DisplayOptions::default())
    }
}

impl ViewportController {
    pub fn new(tile_width: u32, options: DisplayOptions) -> Self {
        Self {
            tile_width,
            geometry: ViewportGeometry::default(),
            options,
            total_width: None,
            table: None,
            requested: HashSet::new(),
            failed: BTreeSet::new(),
            tiles: BTreeMap::new(),
            last_rendered: Vec::new(),
            click_listener: None,
        }
    }

    pub fn tile_width(&self) -> u32 {
        self.tile_width
    }

    pub fn geometry(&self) -> &ViewportGeometry {
        &self.geometry
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    pub fn total_width(&self) -> Option<u32> {
        self.total_width
    }

    pub fn table(&self) -> Option<&DepthTable> {
        self.table.as_ref()
    }

    pub fn tiles(&self) -> &BTreeMap<TileStart, TileRenderer> {
        &self.tiles
    }

    pub fn tile(&self, start: TileStart) -> Option<&TileRenderer> {
        self.tiles.get(&start)
    }

    pub fn is_requested(&self, start: TileStart) -> bool {
        self.requested.contains(&start)
    }

    pub fn requested_count(&self) -> usize {
        self.requested.len()
    }

    pub fn failed_tiles(&self) -> &BTreeSet<TileStart> {
        &self.failed
    }

    /// Starts of the tiles redrawn by the most recent render pass.
    pub fn last_rendered(&self) -> &[TileStart] {
        &self.last_rendered
    }

    pub fn set_click_listener(&mut self, listener: impl FnMut(u32) + Send + 'static) {
        self.click_listener = Some(Box::new(listener));
    }

    /// Learn the total pixel width of the log and create the depth table.
    ///
    /// Only the first call has an effect; returns whether it was applied.
    pub fn initialize(&mut self, total_width: u32) -> bool {
        if self.table.is_some() {
            debug!(total_width, "Viewport already initialized");
            return false;
        }

        info!(total_width, tile_width = self.tile_width, "Initializing viewport");
        self.total_width = Some(total_width);
        self.table = Some(DepthTable::new(total_width));
        true
    }

    /// Apply a new size and screen position.
    ///
    /// The first layout with a positive width requests the tiles around
    /// pixel 0. A changed height resizes every tile.
    pub fn on_layout(&mut self, width: u32, height: u32, origin: ScreenOrigin) -> Vec<FetchRequest> {
        let height_changed = self.geometry.height != height;
        self.geometry.width = width;
        self.geometry.height = height;
        self.geometry.origin = origin;

        if height_changed {
            for tile in self.tiles.values_mut() {
                tile.set_height(height);
            }
        }

        let requests = if width > 0 && self.requested.is_empty() {
            self.fetch_requests(0)
        } else {
            Vec::new()
        };

        self.render_visible();
        requests
    }

    /// Scroll to `scroll`, request missing tiles and re-render.
    pub fn on_scroll(&mut self, scroll: u32) -> Vec<FetchRequest> {
        self.geometry.scroll = scroll;
        let requests = self.fetch_requests(scroll);
        self.render_visible();
        requests
    }

    /// Requests for every not yet requested tile covering the window at `offset`.
    ///
    /// Starts are recorded as requested immediately, so each one is handed
    /// out at most once.
    pub fn fetch_requests(&mut self, offset: u32) -> Vec<FetchRequest> {
        let starts = tile_starts_for_window(offset, self.geometry.width, self.tile_width);
        let mut requests = Vec::new();

        for start in starts {
            if let Some(total) = self.total_width {
                if start >= total {
                    break;
                }
            }
            if !self.requested.insert(start) {
                continue;
            }
            requests.push(FetchRequest {
                height: self.geometry.height,
                tile_width: self.tile_width,
                offset: start,
            });
        }

        if !requests.is_empty() {
            debug!(
                offset,
                starts = ?requests.iter().map(|r| r.offset).collect::<Vec<_>>(),
                "Requesting tiles"
            );
        }
        requests
    }

    /// Handle a finished fetch.
    ///
    /// A payload is stored in the depth table and becomes a new tile, then
    /// the visible tiles are rendered. A failure is recorded and logged; the
    /// start stays requested. Returns the starts of the tiles redrawn.
    pub fn on_fetch_complete(&mut self, completion: FetchCompletion) -> ViewportResult<Vec<TileStart>> {
        let offset = completion.request.offset;
        let payload = match completion.result {
            Ok(payload) => payload,
            Err(e) => {
                warn!(offset, error = %e, "Tile fetch failed");
                self.failed.insert(offset);
                return Ok(Vec::new());
            }
        };

        let Some(table) = self.table.as_mut() else {
            // Keep the start retryable once the table exists
            self.failed.insert(offset);
            return Err(ViewportError::NotInitialized { offset });
        };
        table.append_low_limit(&payload.low_limits, payload.offset);
        table.append_depth(&payload.depths, payload.offset);
        table.append_temp(&payload.temps, payload.offset);

        let width = payload.width();
        let renderer = TileRenderer::new(
            payload.pings,
            payload.offset,
            width,
            self.geometry.height,
            self.options,
        );
        debug!(offset = payload.offset, width, "Tile received");

        self.failed.remove(&payload.offset);
        self.tiles.insert(payload.offset, renderer);
        Ok(self.render_visible())
    }

    /// Depth range used for the current window.
    ///
    /// A configured range of `0` selects the deepest bottom among the
    /// visible tiles, or `0` when none is visible.
    pub fn effective_range(&self) -> f32 {
        if !self.options.is_auto_range() {
            return self.options.range;
        }
        self.visible_tiles()
            .map(TileRenderer::max_depth_area)
            .fold(0.0f32, f32::max)
    }

    /// Tiles intersecting the current window.
    pub fn visible_tiles(&self) -> impl Iterator<Item = &TileRenderer> + '_ {
        let scroll = self.geometry.scroll;
        let width = self.geometry.width;
        self.tiles.values().filter(move |t| t.is_visible(scroll, width))
    }

    /// Render every visible tile with the shared range.
    ///
    /// Returns the starts of the tiles that were actually redrawn.
    pub fn render_visible(&mut self) -> Vec<TileStart> {
        let range = self.effective_range();
        let scroll = self.geometry.scroll;
        let width = self.geometry.width;

        let mut rendered = Vec::new();
        for (start, tile) in self.tiles.iter_mut() {
            if !tile.is_visible(scroll, width) {
                continue;
            }
            tile.set_range(range);
            if tile.render() {
                rendered.push(*start);
            }
        }
        self.last_rendered.clone_from(&rendered);
        rendered
    }

    /// Tile containing logical pixel `x`.
    pub fn renderer_at(&self, x: u32) -> Option<&TileRenderer> {
        self.tiles
            .range(..=x)
            .next_back()
            .map(|(_, tile)| tile)
            .filter(|tile| tile.is_current(x))
    }

    /// Readout and ruler for the pointer at client coordinates.
    ///
    /// `None` when the pointer is not over a received tile.
    pub fn pointer_move(&self, client_x: i32, client_y: i32) -> Option<(Readout, RulerOverlay)> {
        let (x, y) = self.geometry.to_logical(client_x, client_y)?;
        let table = self.table.as_ref()?;
        let tile = self.renderer_at(x)?;

        let sidescan = self.options.sidescan;
        let screen_x = self.geometry.to_screen_x(x);
        let readout = Readout {
            x,
            y,
            screen_x,
            depth: table.depth_at(x),
            cursor: self.geometry.cursor_depth(y, tile.range(), sidescan),
            temp: table.temp_at(x),
        };

        let low_limit = table.low_limit_at(x);
        let marker_row = if sidescan || low_limit <= 0.0 {
            None
        } else {
            let raw = (self.geometry.height as f32 * table.depth_at(x) / low_limit) as i32;
            Some(tile.map_pixel_row_to_depth(x, raw))
        };
        let ruler = RulerOverlay {
            screen_x,
            height: self.geometry.height,
            marker_row,
        };

        Some((readout, ruler))
    }

    /// Forward a click to the listener; returns the logical X.
    pub fn click(&mut self, client_x: i32, client_y: i32) -> Option<u32> {
        let (x, _) = self.geometry.to_logical(client_x, client_y)?;
        if let Some(listener) = self.click_listener.as_mut() {
            listener(x);
        }
        Some(x)
    }

    /// Replace the display options and re-render.
    pub fn set_display(&mut self, options: DisplayOptions) -> Vec<TileStart> {
        self.options = options;
        for tile in self.tiles.values_mut() {
            tile.set_overlay(options.overlay);
            tile.set_color(options.color);
            tile.set_sidescan(options.sidescan);
        }
        self.render_visible()
    }

    /// Invalidate every tile and redo the scroll pass.
    pub fn mark_dirty(&mut self) -> Vec<FetchRequest> {
        for tile in self.tiles.values_mut() {
            tile.mark_dirty();
        }
        self.on_scroll(self.geometry.scroll)
    }

    /// Forget failed starts so the next pass requests them again.
    ///
    /// Returns the starts released.
    pub fn retry_failed_tiles(&mut self) -> Vec<TileStart> {
        let released: Vec<TileStart> = std::mem::take(&mut self.failed).into_iter().collect();
        for start in &released {
            self.requested.remove(start);
        }
        if !released.is_empty() {
            info!(count = released.len(), "Releasing failed tiles for retry");
        }
        released
    }
}
