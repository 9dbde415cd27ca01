//! SVG serialization
//!
//! This module turns a composed element tree into SVG text.

pub mod config;
pub mod svg;

pub use config::{PlacementMode, SvgConfig};
pub use svg::{render_svg, SvgWriter};
