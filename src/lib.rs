//! svg-tiler - compose SVG tile maps from text
//!
//! A legend maps single-character symbols to SVG fragments, and a text grid
//! lays those symbols out. Every grid cell becomes one copy of its symbol's
//! fragment, scaled into a fixed-size tile.
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use svg_tiler::{render_str, TilerConfig};
//!
//! let rendered = render_str(
//!     "A <circle cx='5' cy='5' r='5'/>",
//!     Path::new("."),
//!     "AA",
//!     &TilerConfig::default(),
//! )
//! .unwrap();
//!
//! assert!(rendered.svg.contains(r#"viewBox="0 0 100 50""#));
//! assert_eq!(rendered.placements, 2);
//! ```

pub mod compositor;
pub mod config;
pub mod error;
pub mod legend;
pub mod markup;
pub mod output;
pub mod renderer;
pub mod warning;

pub use compositor::{Composition, Compositor, Grid, GridError};
pub use config::{ConfigError, TileSize, TilerConfig};
pub use error::LegendError;
pub use legend::{LegendFile, LegendLoader, LoadedLegend, LookupTable};
pub use output::OutputError;
pub use renderer::{render_svg, PlacementMode, SvgConfig};
pub use warning::{Warning, WarningCategory};

use std::path::Path;

use log::info;
use thiserror::Error;

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum TilerError {
    /// Error loading the legend, with the legend text for reporting
    #[error("{err}")]
    Legend {
        err: LegendError,
        src: String,
        filename: String,
    },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

impl TilerError {
    /// Create a new `Legend` error with the associated legend text
    pub fn new_legend_error(
        err: LegendError,
        src: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        Self::Legend {
            err,
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Human-readable report; legend errors point at the offending line
    pub fn report(&self) -> String {
        match self {
            TilerError::Legend { err, src, filename } => err.format(src, filename),
            other => other.to_string(),
        }
    }
}

/// A rendered image and the warnings raised while producing it
#[derive(Debug, Clone)]
pub struct Rendered {
    pub svg: String,
    pub warnings: Vec<Warning>,
    pub placements: usize,
}

/// Render legend and grid text held in memory
///
/// `base_dir` is the directory `@` references in the legend are resolved against.
pub fn render_str(
    legend: &str,
    base_dir: &Path,
    grid: &str,
    config: &TilerConfig,
) -> Result<Rendered, TilerError> {
    config.validate()?;
    let loaded = LegendLoader::new()
        .load_str(legend, base_dir)
        .map_err(|err| TilerError::new_legend_error(err, legend, "<legend>"))?;
    Ok(compose(loaded, &Grid::parse(grid), config))
}

/// Render a legend file and a grid file to an SVG string
pub fn render(
    legend_path: &Path,
    grid_path: &Path,
    config: &TilerConfig,
) -> Result<Rendered, TilerError> {
    config.validate()?;

    let filename = legend_path.display().to_string();
    let file = LegendFile::read(legend_path)
        .map_err(|err| TilerError::new_legend_error(err, "", filename.as_str()))?;
    let loaded = LegendLoader::new()
        .load_file(&file)
        .map_err(|err| TilerError::new_legend_error(err, file.source.as_str(), filename.as_str()))?;

    // Legend problems abort before the grid is touched
    let grid = Grid::from_file(grid_path)?;
    Ok(compose(loaded, &grid, config))
}

/// Render to `output_path`, replacing it atomically
///
/// Nothing is written when any step fails.
pub fn render_to_file(
    legend_path: &Path,
    grid_path: &Path,
    output_path: &Path,
    config: &TilerConfig,
) -> Result<Rendered, TilerError> {
    let rendered = render(legend_path, grid_path, config)?;
    output::write_atomic(output_path, &rendered.svg)?;
    info!("wrote {}", output_path.display());
    Ok(rendered)
}

fn compose(loaded: LoadedLegend, grid: &Grid, config: &TilerConfig) -> Rendered {
    let LoadedLegend {
        table,
        mut warnings,
    } = loaded;

    let composition = Compositor::new(config.tile)
        .with_placement(config.output.placement)
        .compose(&table, grid);
    warnings.extend(composition.warnings);

    info!(
        "placed {} tiles from {} rows",
        composition.placements,
        grid.row_count()
    );

    Rendered {
        svg: render_svg(&composition.document, &config.output),
        warnings,
        placements: composition.placements,
    }
}
