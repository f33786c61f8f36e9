//! Echo intensity color ramps.
//!
//! Every [`Palette`] is a list of color stops over the normalized echo
//! intensity `0.0..=1.0`. Rendering looks colors up in a 256-entry table
//! built once per pass with [`palette_table`].

use sonar_common::Palette;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn transparent() -> Self {
        Self { r: 0, g: 0, b: 0, a: 0 }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Classic amber fish-finder display.
const AMBER: &[(f32, Color)] = &[
    (0.0, Color::opaque(0, 0, 0)),
    (0.35, Color::opaque(96, 40, 0)),
    (0.7, Color::opaque(255, 176, 0)),
    (1.0, Color::opaque(255, 255, 200)),
];

const GRAYSCALE: &[(f32, Color)] = &[
    (0.0, Color::opaque(0, 0, 0)),
    (1.0, Color::opaque(255, 255, 255)),
];

const BLUE: &[(f32, Color)] = &[
    (0.0, Color::opaque(0, 0, 32)),
    (0.6, Color::opaque(0, 128, 255)),
    (1.0, Color::opaque(230, 250, 255)),
];

const GREEN: &[(f32, Color)] = &[
    (0.0, Color::opaque(0, 16, 0)),
    (0.6, Color::opaque(0, 176, 32)),
    (1.0, Color::opaque(200, 255, 120)),
];

/// Weak echoes blue, strong echoes red.
const THERMAL: &[(f32, Color)] = &[
    (0.0, Color::opaque(25, 0, 76)),
    (0.2, Color::opaque(0, 0, 255)),
    (0.4, Color::opaque(0, 255, 255)),
    (0.6, Color::opaque(0, 255, 0)),
    (0.8, Color::opaque(255, 255, 0)),
    (1.0, Color::opaque(255, 0, 0)),
];

fn stops(palette: Palette) -> &'static [(f32, Color)] {
    match palette {
        Palette::Amber => AMBER,
        Palette::Grayscale => GRAYSCALE,
        Palette::Blue => BLUE,
        Palette::Green => GREEN,
        Palette::Thermal => THERMAL,
    }
}

/// Linear color interpolation, rounded to the nearest channel value.
pub fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.max(0.0).min(1.0);
    let t_inv = 1.0 - t;
    let mix = |a: u8, b: u8| ((a as f32 * t_inv) + (b as f32 * t)).round() as u8;

    Color::new(
        mix(color1.r, color2.r),
        mix(color1.g, color2.g),
        mix(color1.b, color2.b),
        mix(color1.a, color2.a),
    )
}

/// Color of echo intensity `intensity` (0 = no echo, 255 = strongest).
pub fn palette_color(palette: Palette, intensity: u8) -> Color {
    let stops = stops(palette);
    let t = intensity as f32 / 255.0;

    for pair in stops.windows(2) {
        let (lo, lo_color) = pair[0];
        let (hi, hi_color) = pair[1];
        if t <= hi {
            return interpolate_color(lo_color, hi_color, (t - lo) / (hi - lo));
        }
    }

    stops[stops.len() - 1].1
}

/// Lookup table of all 256 intensities of `palette`.
pub fn palette_table(palette: Palette) -> [Color; 256] {
    let mut table = [Color::transparent(); 256];
    for (i, entry) in table.iter_mut().enumerate() {
        *entry = palette_color(palette, i as u8);
    }
    table
}

/// Color of the bottom/nadir line drawn over `palette`.
pub fn overlay_color(palette: Palette) -> Color {
    match palette {
        Palette::Thermal => Color::opaque(255, 255, 255),
        Palette::Blue | Palette::Green => Color::opaque(255, 64, 0),
        Palette::Amber | Palette::Grayscale => Color::opaque(255, 0, 0),
    }
}
