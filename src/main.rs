//! svg-tiler CLI
//!
//! Usage:
//!   svg-tiler --mapping <LEGEND> --image <GRID> --output <SVG> [OPTIONS]
//!
//! Options:
//!   -c, --config <FILE>      Configuration file (TOML format)
//!   --tile-width <N>         Tile width in output units
//!   --tile-height <N>        Tile height in output units
//!   --placement <MODE>       inline or symbol
//!   --compact                Write the SVG without indentation
//!   --log-level <LEVEL>      off, error, warn, info, debug, trace
//!   -h, --help               Print help

use std::path::PathBuf;
use std::process;
use std::str::FromStr;

use clap::Parser;
use log::{debug, warn, LevelFilter};

use svg_tiler::{render_to_file, PlacementMode, TilerConfig};

#[derive(Parser, Debug)]
#[command(name = "svg-tiler")]
#[command(about = "Compose an SVG image from a text grid and a symbol legend")]
struct Cli {
    /// Legend file mapping symbols to SVG fragments
    #[arg(short, long)]
    mapping: PathBuf,

    /// Text grid to render
    #[arg(short, long)]
    image: PathBuf,

    /// Output SVG file
    #[arg(short, long)]
    output: PathBuf,

    /// Configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tile width in output units
    #[arg(long)]
    tile_width: Option<f64>,

    /// Tile height in output units
    #[arg(long)]
    tile_height: Option<f64>,

    /// How tiles refer to their fragment
    #[arg(long, value_enum)]
    placement: Option<PlacementMode>,

    /// Write the SVG without indentation
    #[arg(long)]
    compact: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let cli = Cli::parse();

    let log_level = LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
        LevelFilter::Warn
    });
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
    debug!("parsed arguments: {:?}", cli);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match render_to_file(&cli.mapping, &cli.image, &cli.output, &config) {
        Ok(rendered) => {
            for warning in &rendered.warnings {
                warn!("{}", warning);
            }
        }
        Err(e) => {
            eprintln!("{}", e.report());
            process::exit(1);
        }
    }
}

/// Load the config file if given, then apply command-line overrides
fn load_config(cli: &Cli) -> Result<TilerConfig, String> {
    let mut config = match &cli.config {
        Some(path) => TilerConfig::from_file(path)
            .map_err(|e| format!("Error loading config '{}': {}", path.display(), e))?,
        None => TilerConfig::default(),
    };

    if let Some(width) = cli.tile_width {
        config.tile.width = width;
    }
    if let Some(height) = cli.tile_height {
        config.tile.height = height;
    }
    if let Some(placement) = cli.placement {
        config.output.placement = placement;
    }
    if cli.compact {
        config.output.pretty_print = false;
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}
