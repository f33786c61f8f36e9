//! Viewer configuration.
//!
//! Values come from (lowest to highest precedence) built-in defaults, a YAML
//! file, `SONAR_*` environment variables and command line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sonar_common::{DisplayOptions, Palette, DEFAULT_TILE_WIDTH};
use std::path::{Path, PathBuf};

/// Configuration for a viewing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Width of one rendered tile in pixels.
    pub tile_width: u32,

    pub viewport_width: u32,

    pub viewport_height: u32,

    pub palette: Palette,

    /// Depth range in meters, `0` for auto-range.
    pub range: f32,

    /// Draw the bottom overlay line.
    pub overlay: bool,

    /// Where rendered tiles are written.
    pub output_dir: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tile_width: DEFAULT_TILE_WIDTH,
            viewport_width: 1000,
            viewport_height: 300,
            palette: Palette::default(),
            range: 0.0,
            overlay: true,
            output_dir: PathBuf::from("tiles"),
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse_yaml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn parse_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Overlay `SONAR_*` environment variables on top of `self`.
    pub fn with_env(mut self) -> Self {
        if let Ok(val) = std::env::var("SONAR_TILE_WIDTH") {
            if let Ok(width) = val.parse() {
                self.tile_width = width;
            }
        }

        if let Ok(val) = std::env::var("SONAR_VIEWPORT_WIDTH") {
            if let Ok(width) = val.parse() {
                self.viewport_width = width;
            }
        }

        if let Ok(val) = std::env::var("SONAR_VIEWPORT_HEIGHT") {
            if let Ok(height) = val.parse() {
                self.viewport_height = height;
            }
        }

        if let Ok(val) = std::env::var("SONAR_PALETTE") {
            if let Ok(palette) = val.parse() {
                self.palette = palette;
            }
        }

        if let Ok(val) = std::env::var("SONAR_RANGE") {
            if let Ok(range) = val.parse() {
                self.range = range;
            }
        }

        if let Ok(val) = std::env::var("SONAR_OVERLAY") {
            self.overlay = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("SONAR_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(val);
        }

        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_width == 0 {
            return Err("tile_width must be > 0".to_string());
        }

        if self.viewport_height == 0 {
            return Err("viewport_height must be > 0".to_string());
        }

        if !self.range.is_finite() || self.range < 0.0 {
            return Err("range must be >= 0".to_string());
        }

        Ok(())
    }

    /// Display options for every tile of the session.
    pub fn display_options(&self, sidescan: bool) -> DisplayOptions {
        DisplayOptions {
            overlay: self.overlay,
            color: self.palette,
            sidescan,
            range: self.range,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ViewerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tile_width, 400);
        assert!(config.display_options(false).is_auto_range());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ViewerConfig {
            tile_width: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err("tile_width must be > 0".to_string()));

        let config = ViewerConfig {
            range: -5.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ViewerConfig {
            viewport_height: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_yaml() {
        let config = ViewerConfig::parse_yaml(
            "tile_width: 200\npalette: thermal\nrange: 12.5\noverlay: false\n",
        )
        .unwrap();
        assert_eq!(config.tile_width, 200);
        assert_eq!(config.palette, Palette::Thermal);
        assert_eq!(config.range, 12.5);
        assert!(!config.overlay);
        assert_eq!(config.viewport_height, 300);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.yaml");
        std::fs::write(&path, "viewport_width: 640\noutput_dir: /tmp/out\n").unwrap();

        let config = ViewerConfig::from_yaml(&path).unwrap();
        assert_eq!(config.viewport_width, 640);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));

        let missing = ViewerConfig::from_yaml(dir.path().join("missing.yaml"));
        assert!(missing.is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars = [
            ("SONAR_TILE_WIDTH", "256"),
            ("SONAR_VIEWPORT_HEIGHT", "480"),
            ("SONAR_PALETTE", "grey"),
            ("SONAR_RANGE", "15.5"),
            ("SONAR_OVERLAY", "0"),
            ("SONAR_OUTPUT_DIR", "/tmp/sonar-tiles"),
            ("SONAR_VIEWPORT_WIDTH", "not-a-number"),
        ];
        for (key, value) in vars {
            std::env::set_var(key, value);
        }

        let config = ViewerConfig::from_env();
        let layered = ViewerConfig {
            tile_width: 100,
            viewport_width: 640,
            ..Default::default()
        }
        .with_env();

        for (key, _) in vars {
            std::env::remove_var(key);
        }

        assert_eq!(config.tile_width, 256);
        assert_eq!(config.viewport_height, 480);
        assert_eq!(config.palette, Palette::Grayscale);
        assert_eq!(config.range, 15.5);
        assert!(!config.overlay);
        assert_eq!(config.output_dir, PathBuf::from("/tmp/sonar-tiles"));
        // Unparsable values keep what was there
        assert_eq!(config.viewport_width, 1000);

        assert_eq!(layered.tile_width, 256);
        assert_eq!(layered.viewport_width, 640);
    }

    #[test]
    fn test_display_options() {
        let config = ViewerConfig {
            palette: Palette::Blue,
            range: 20.0,
            ..Default::default()
        };
        let opts = config.display_options(true);
        assert!(opts.sidescan);
        assert!(opts.overlay);
        assert_eq!(opts.color, Palette::Blue);
        assert_eq!(opts.range, 20.0);
    }
}
