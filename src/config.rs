//! Tiler configuration
//!
//! Settings can be loaded from a TOML file; anything left out keeps its
//! default value.
//!
//! ```toml
//! [tile]
//! width = 50.0
//! height = 50.0
//!
//! [output]
//! pretty_print = true
//! standalone = true
//! placement = "inline"   # or "symbol"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::renderer::SvgConfig;

/// Errors that can occur when loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("tile size must be positive, got {width}x{height}")]
    InvalidTileSize { width: f64, height: f64 },
}

/// Size of one grid cell in output units
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TileSize {
    pub width: f64,
    pub height: f64,
}

impl Default for TileSize {
    fn default() -> Self {
        Self {
            width: 50.0,
            height: 50.0,
        }
    }
}

impl TileSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_valid(&self) -> bool {
        [self.width, self.height]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// Configuration for a complete tiling run
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TilerConfig {
    /// Tile dimensions
    pub tile: TileSize,
    /// SVG output options
    pub output: SvgConfig,
}

impl TilerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: TilerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the tile dimensions
    pub fn with_tile_size(mut self, width: f64, height: f64) -> Self {
        self.tile = TileSize::new(width, height);
        self
    }

    /// Set the SVG output configuration
    pub fn with_output(mut self, output: SvgConfig) -> Self {
        self.output = output;
        self
    }

    /// Check that both tile dimensions are finite and positive
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile.is_valid() {
            Ok(())
        } else {
            Err(ConfigError::InvalidTileSize {
                width: self.tile.width,
                height: self.tile.height,
            })
        }
    }
}
