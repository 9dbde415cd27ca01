//! Legend loading
//!
//! This module turns a legend file into a [`LookupTable`] mapping each
//! symbol to the SVG fragment drawn for it.
//!
//! # Example
//!
//! ```text
//! # @tiles/wall.svg
//! . <rect width="10" height="10" fill="#eee"/>
//! o <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 2 2"><circle cx="1" cy="1" r="1"/></svg>
//! ```

mod loader;
mod sizing;
mod table;

pub use loader::{LegendFile, LegendLoader, LoadedLegend, ID_PREFIX};
pub use sizing::{Sizing, ViewBox};
pub use table::{FragmentTemplate, LookupTable, PRESERVE_ASPECT_RATIO};
