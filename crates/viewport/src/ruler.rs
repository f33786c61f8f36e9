//! Vertical ruler drawn under the pointer.

use serde::{Deserialize, Serialize};

/// Width of the ruler strip in pixels.
pub const RULER_WIDTH: u32 = 10;

/// Half height of the depth marker arrow.
const MARKER_HALF_HEIGHT: i32 = 10;

/// Ruler placement: a one pixel line at `screen_x`, plus an arrow pointing
/// at the bottom row when the depth is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulerOverlay {
    /// Left edge relative to the viewport.
    pub screen_x: i32,
    pub height: u32,
    /// Row of the bottom marker, already mapped to the rendered scale.
    pub marker_row: Option<i32>,
}

impl RulerOverlay {
    /// Marker arrow as a polyline in ruler-local coordinates.
    pub fn marker_polyline(&self) -> Option<[(i32, i32); 3]> {
        let row = self.marker_row?;
        let w = RULER_WIDTH as i32;
        Some([
            (w, row - MARKER_HALF_HEIGHT),
            (1, row),
            (w, row + MARKER_HALF_HEIGHT),
        ])
    }

    /// Rasterize the ruler strip as RGBA, `RULER_WIDTH x height`.
    pub fn rasterize(&self) -> Vec<u8> {
        const LINE: [u8; 4] = [0, 0, 255, 255];
        let width = RULER_WIDTH as usize;
        let height = self.height as usize;
        let mut pixels = vec![0u8; width * height * 4];

        let mut put = |x: i32, y: i32| {
            if x >= 0 && y >= 0 && (x as usize) < width && (y as usize) < height {
                let idx = (y as usize * width + x as usize) * 4;
                pixels[idx..idx + 4].copy_from_slice(&LINE);
            }
        };

        for y in 0..height as i32 {
            put(0, y);
        }

        if let Some(points) = self.marker_polyline() {
            for pair in points.windows(2) {
                let ((x0, y0), (x1, y1)) = (pair[0], pair[1]);
                let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
                for i in 0..=steps {
                    put(x0 + (x1 - x0) * i / steps, y0 + (y1 - y0) * i / steps);
                }
            }
        }

        pixels
    }
}
