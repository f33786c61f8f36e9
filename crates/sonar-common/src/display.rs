//! Display options applied to every tile of a viewport.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color palette used to map echo intensity to pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    /// Humminbird style amber/brown.
    #[default]
    Amber,
    Grayscale,
    Blue,
    Green,
    /// Blue through red, weak to strong returns.
    Thermal,
}

impl Palette {
    pub const ALL: [Palette; 5] = [
        Palette::Amber,
        Palette::Grayscale,
        Palette::Blue,
        Palette::Green,
        Palette::Thermal,
    ];

    /// Numeric palette id as used by host UIs (`0..=4`).
    pub fn id(&self) -> u8 {
        match self {
            Palette::Amber => 0,
            Palette::Grayscale => 1,
            Palette::Blue => 2,
            Palette::Green => 3,
            Palette::Thermal => 4,
        }
    }

    /// Palette for a numeric id; unknown ids fall back to the default palette.
    pub fn from_id(id: u8) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.id() == id)
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Palette::Amber => "amber",
            Palette::Grayscale => "grayscale",
            Palette::Blue => "blue",
            Palette::Green => "green",
            Palette::Thermal => "thermal",
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Palette {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(id) = s.parse::<u8>() {
            return Self::ALL
                .iter()
                .copied()
                .find(|p| p.id() == id)
                .ok_or_else(|| ParseError::UnknownPalette(s.to_string()));
        }
        match s.to_lowercase().as_str() {
            "amber" | "brown" => Ok(Palette::Amber),
            "grayscale" | "greyscale" | "gray" | "grey" => Ok(Palette::Grayscale),
            "blue" => Ok(Palette::Blue),
            "green" => Ok(Palette::Green),
            "thermal" | "rainbow" => Ok(Palette::Thermal),
            _ => Err(ParseError::UnknownPalette(s.to_string())),
        }
    }
}

/// User-configurable display state shared by all tiles of a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    /// Draw the bottom/nadir overlay line.
    pub overlay: bool,
    pub color: Palette,
    /// Render as a mirrored side-scan profile.
    pub sidescan: bool,
    /// Depth range in meters; `0.0` selects auto-range.
    pub range: f32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            overlay: true,
            color: Palette::default(),
            sidescan: false,
            range: 0.0,
        }
    }
}

impl DisplayOptions {
    pub fn is_auto_range(&self) -> bool {
        self.range == 0.0
    }

    pub fn from_json(json: &str) -> Result<Self, ParseError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_ids_are_stable() {
        for palette in Palette::ALL {
            assert_eq!(Palette::from_id(palette.id()), palette);
        }
        assert_eq!(Palette::from_id(200), Palette::Amber);
    }

    #[test]
    fn test_palette_from_str() {
        assert_eq!("grey".parse::<Palette>().unwrap(), Palette::Grayscale);
        assert_eq!("4".parse::<Palette>().unwrap(), Palette::Thermal);
        assert!("9".parse::<Palette>().is_err());
        assert!("purple".parse::<Palette>().is_err());
    }

    #[test]
    fn test_display_options_partial_json() {
        let opts = DisplayOptions::from_json(r#"{"sidescan": true, "color": "blue"}"#).unwrap();
        assert!(opts.sidescan);
        assert!(opts.overlay);
        assert_eq!(opts.color, Palette::Blue);
        assert!(opts.is_auto_range());
    }
}
