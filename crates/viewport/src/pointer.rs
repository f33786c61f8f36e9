//! Screen geometry and pointer readouts.

use serde::{Deserialize, Serialize};

/// Absolute screen position of the viewport's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenOrigin {
    pub x: i32,
    pub y: i32,
}

impl ScreenOrigin {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Size, placement and scroll position of the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportGeometry {
    pub width: u32,
    pub height: u32,
    pub origin: ScreenOrigin,
    /// Horizontal scroll offset in logical pixels.
    pub scroll: u32,
}

impl ViewportGeometry {
    /// Map client coordinates to logical `(x, y)`.
    ///
    /// `x = client_x - origin.x + scroll`, `y = client_y - origin.y`.
    /// Returns `None` left of the log start.
    pub fn to_logical(&self, client_x: i32, client_y: i32) -> Option<(u32, i32)> {
        let x = client_x as i64 - self.origin.x as i64 + self.scroll as i64;
        let y = client_y - self.origin.y;
        u32::try_from(x).ok().map(|x| (x, y))
    }

    /// Screen-relative X of logical pixel `x`.
    pub fn to_screen_x(&self, x: u32) -> i32 {
        (x as i64 - self.scroll as i64) as i32
    }

    /// Depth under row `y` for a tile drawn with `range`.
    ///
    /// Down-looking: `range * y / height`. Side-scan: distance from the
    /// center line, `|height/2 - y| * range / (height/2)`.
    pub fn cursor_depth(&self, y: i32, range: f32, sidescan: bool) -> f32 {
        if self.height == 0 {
            return 0.0;
        }
        let height = self.height as f32;
        if sidescan {
            let surface = height / 2.0;
            (surface - y as f32).abs() * range / surface
        } else {
            range * (y as f32 / height)
        }
    }
}

/// Readings under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Readout {
    /// Logical pixel column.
    pub x: u32,
    pub y: i32,
    /// Left edge of the label box relative to the viewport.
    pub screen_x: i32,
    pub depth: f32,
    pub cursor: f32,
    pub temp: f32,
}

impl Readout {
    pub fn depth_label(&self) -> String {
        format!("Depth: {} m", self.depth)
    }

    pub fn cursor_label(&self) -> String {
        format!("Cursor: {:.1} m", self.cursor)
    }

    pub fn temp_label(&self) -> String {
        format!("Temp: {} C", self.temp)
    }

    /// The three label lines, top to bottom.
    pub fn labels(&self) -> [String; 3] {
        [self.depth_label(), self.cursor_label(), self.temp_label()]
    }
}
