//! Rasterization of one horizontal tile of a sonar log.
//!
//! A tile covers the logical pixel columns `[start, start + width)`; column
//! `x` shows ping `x - start`. Row `y` of a down-looking tile shows the echo at
//! depth `range * y / height`. Side-scan tiles are mirrored around the
//! horizontal center line: the top half shows the left channel, the bottom
//! half the right channel, both growing away from the boat.
//!
//! Rendering is lazy. Setters only mark the tile dirty when a value changes
//! and [`TileRenderer::render`] is a no-op on a clean tile.

use rayon::prelude::*;
use sonar_common::{DisplayOptions, Palette, Ping, TileSpan, TileStart};
use tracing::trace;

use crate::error::RenderResult;
use crate::gradient::{overlay_color, palette_table, Color};
use crate::png::create_png_auto;

/// Renderer and image of one tile.
#[derive(Debug, Clone)]
pub struct TileRenderer {
    span: TileSpan,
    height: u32,
    pings: Vec<Ping>,
    options: DisplayOptions,
    max_depth: f32,
    pixels: Vec<u8>,
    dirty: bool,
    render_count: u64,
}

impl TileRenderer {
    /// Create a renderer for `pings` covering `[start, start + width)`.
    ///
    /// `options.range` is the initial depth range; the viewport replaces it
    /// with the auto-range before the first render when it is `0`.
    pub fn new(
        pings: Vec<Ping>,
        start: TileStart,
        width: u32,
        height: u32,
        options: DisplayOptions,
    ) -> Self {
        let max_depth = pings.iter().map(|p| p.depth).fold(0.0f32, f32::max);

        Self {
            span: TileSpan::new(start, width),
            height,
            pings,
            options,
            max_depth,
            pixels: vec![0; width as usize * height as usize * 4],
            dirty: true,
            render_count: 0,
        }
    }

    pub fn span(&self) -> TileSpan {
        self.span
    }

    pub fn start(&self) -> TileStart {
        self.span.start
    }

    pub fn width(&self) -> u32 {
        self.span.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pings(&self) -> &[Ping] {
        &self.pings
    }

    pub fn options(&self) -> &DisplayOptions {
        &self.options
    }

    /// Depth range of the last applied scale.
    pub fn range(&self) -> f32 {
        self.options.range
    }

    /// RGBA pixels, row-major, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of times the image has actually been rasterized.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Whether the tile intersects the window `[scroll, scroll + viewport_width)`.
    pub fn is_visible(&self, scroll: u32, viewport_width: u32) -> bool {
        self.span.intersects(scroll, viewport_width)
    }

    /// Whether logical pixel `offset` falls inside this tile.
    pub fn is_current(&self, offset: u32) -> bool {
        self.span.contains(offset)
    }

    /// Deepest bottom reading among the tile's pings.
    pub fn max_depth_area(&self) -> f32 {
        self.max_depth
    }

    /// Ping drawn at logical pixel column `pixel_x`.
    pub fn ping_at(&self, pixel_x: u32) -> Option<&Ping> {
        if !self.is_current(pixel_x) {
            return None;
        }
        self.pings.get((pixel_x - self.span.start) as usize)
    }

    /// Rescale a row computed as `height * depth / low_limit` to the row
    /// the same depth is drawn at under the current range.
    ///
    /// Returns `raw_row` unchanged when the column's low limit or the range
    /// is not positive.
    pub fn map_pixel_row_to_depth(&self, pixel_x: u32, raw_row: i32) -> i32 {
        let low_limit = self.ping_at(pixel_x).map_or(0.0, |p| p.low_limit);
        let range = self.options.range;
        if low_limit <= 0.0 || range <= 0.0 {
            return raw_row;
        }
        (raw_row as f32 * low_limit / range) as i32
    }

    pub fn set_overlay(&mut self, overlay: bool) {
        if self.options.overlay != overlay {
            self.options.overlay = overlay;
            self.dirty = true;
        }
    }

    pub fn set_color(&mut self, color: Palette) {
        if self.options.color != color {
            self.options.color = color;
            self.dirty = true;
        }
    }

    pub fn set_sidescan(&mut self, sidescan: bool) {
        if self.options.sidescan != sidescan {
            self.options.sidescan = sidescan;
            self.dirty = true;
        }
    }

    pub fn set_range(&mut self, range: f32) {
        if self.options.range != range {
            self.options.range = range;
            self.dirty = true;
        }
    }

    /// Resize the image to `height` rows.
    pub fn set_height(&mut self, height: u32) {
        if self.height != height {
            self.height = height;
            self.pixels = vec![0; self.span.width as usize * height as usize * 4];
            self.dirty = true;
        }
    }

    /// Force the next [`render`](Self::render) to rasterize.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Rasterize the tile if anything changed since the last render.
    ///
    /// Returns whether the image was redrawn.
    pub fn render(&mut self) -> bool {
        if !self.dirty {
            return false;
        }

        self.rasterize();
        if self.options.overlay {
            self.draw_overlay();
        }

        self.dirty = false;
        self.render_count += 1;
        trace!(
            start = self.span.start,
            range = self.options.range,
            sidescan = self.options.sidescan,
            "Rendered tile"
        );
        true
    }

    /// Encode the current image as PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        create_png_auto(
            &self.pixels,
            self.span.width as usize,
            self.height as usize,
        )
    }

    fn rasterize(&mut self) {
        let width = self.span.width as usize;
        let height = self.height as usize;
        if width == 0 || height == 0 {
            return;
        }

        let table = palette_table(self.options.color);
        let background = table[0].to_array();
        let range = self.options.range;
        let sidescan = self.options.sidescan;
        let pings = &self.pings;

        self.pixels
            .par_chunks_mut(width * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let sample = pings.get(x).and_then(|ping| {
                        if sidescan {
                            side_scan_sample(ping, y, height, range)
                        } else {
                            down_sample(ping, y, height, range)
                        }
                    });
                    let color = match sample {
                        Some(s) => table[s as usize].to_array(),
                        None => background,
                    };
                    pixel.copy_from_slice(&color);
                }
            });
    }

    fn draw_overlay(&mut self) {
        let width = self.span.width as usize;
        let height = self.height as usize;
        let color = overlay_color(self.options.color);
        let columns = self.pings.len().min(width);

        if self.options.sidescan {
            let nadir = height / 2;
            for x in 0..columns {
                put_pixel(&mut self.pixels, width, x, nadir, color);
            }
            return;
        }

        let range = self.options.range;
        for x in 0..columns {
            let ping = &self.pings[x];
            if let Some(row) = bottom_row(ping, height, range) {
                put_pixel(&mut self.pixels, width, x, row, color);
            }
        }
    }
}

/// Sample shown at row `y` of a down-looking column.
fn down_sample(ping: &Ping, y: usize, height: usize, range: f32) -> Option<u8> {
    let fraction = if range > 0.0 && ping.low_limit > 0.0 {
        let depth = range * y as f32 / height as f32;
        depth / ping.low_limit
    } else {
        y as f32 / height as f32
    };
    ping.sample_at_fraction(fraction)
}

/// Sample shown at row `y` of a side-scan column.
///
/// The profile holds the reversed left channel followed by the right one,
/// so the nadir sits in the middle of the profile.
fn side_scan_sample(ping: &Ping, y: usize, height: usize, range: f32) -> Option<u8> {
    let half = ping.sample_count() / 2;
    let surface = height as f32 / 2.0;
    if half == 0 || surface <= 0.0 {
        return None;
    }

    let distance_px = (y as f32 - surface).abs();
    let fraction = if range > 0.0 && ping.low_limit > 0.0 {
        distance_px * range / surface / ping.low_limit
    } else {
        distance_px / surface
    };
    if !(0.0..=1.0).contains(&fraction) {
        return None;
    }

    let k = ((fraction * half as f32) as usize).min(half - 1);
    let idx = if (y as f32) < surface {
        half - 1 - k
    } else {
        half + k
    };
    ping.soundings.get(idx).copied()
}

/// Row of the bottom line of a down-looking column.
fn bottom_row(ping: &Ping, height: usize, range: f32) -> Option<usize> {
    let scale = if range > 0.0 {
        range
    } else if ping.low_limit > 0.0 {
        ping.low_limit
    } else {
        return None;
    };
    if ping.depth <= 0.0 {
        return None;
    }

    let row = (height as f32 * ping.depth / scale) as usize;
    (row < height).then_some(row)
}

fn put_pixel(pixels: &mut [u8], width: usize, x: usize, y: usize, color: Color) {
    let idx = (y * width + x) * 4;
    if let Some(px) = pixels.get_mut(idx..idx + 4) {
        px.copy_from_slice(&color.to_array());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn ping(depth: f32, low_limit: f32, soundings: &'static [u8]) -> Ping {
        Ping {
            depth,
            low_limit,
            soundings: Bytes::from_static(soundings),
            ..Default::default()
        }
    }

    #[test]
    fn test_down_sample_scales_by_range() {
        // 4 samples over 20 m: 5 m per sample
        let p = ping(0.0, 20.0, &[1, 2, 3, 4]);
        // range 10 m over 10 rows: row 6 is 6 m -> sample 1
        assert_eq!(down_sample(&p, 6, 10, 10.0), Some(2));
        assert_eq!(down_sample(&p, 0, 10, 10.0), Some(1));
        // Beyond the low limit there is no data
        assert_eq!(down_sample(&p, 9, 10, 40.0), None);
    }

    #[test]
    fn test_down_sample_stretches_without_scale() {
        let p = ping(0.0, 0.0, &[1, 2, 3, 4]);
        assert_eq!(down_sample(&p, 0, 8, 10.0), Some(1));
        assert_eq!(down_sample(&p, 7, 8, 10.0), Some(4));
        let p = ping(0.0, 20.0, &[1, 2, 3, 4]);
        assert_eq!(down_sample(&p, 4, 8, 0.0), Some(3));
    }

    #[test]
    fn test_side_scan_sample_mirrors() {
        // reversed left [3, 2, 1] then right [7, 8, 9]
        let p = ping(0.0, 0.0, &[3, 2, 1, 7, 8, 9]);
        // Nearest the center line: innermost samples
        assert_eq!(side_scan_sample(&p, 5, 12, 0.0), Some(1));
        assert_eq!(side_scan_sample(&p, 6, 12, 0.0), Some(7));
        // Far edges: outermost samples
        assert_eq!(side_scan_sample(&p, 0, 12, 0.0), Some(3));
        assert_eq!(side_scan_sample(&p, 11, 12, 0.0), Some(9));
    }

    #[test]
    fn test_bottom_row() {
        let p = ping(5.0, 20.0, &[0; 4]);
        assert_eq!(bottom_row(&p, 100, 10.0), Some(50));
        assert_eq!(bottom_row(&p, 100, 0.0), Some(25));
        assert_eq!(bottom_row(&p, 100, 4.0), None);
        assert_eq!(bottom_row(&ping(0.0, 20.0, &[0; 4]), 100, 10.0), None);
    }
}
