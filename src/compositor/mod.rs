//! Grid compositing
//!
//! Walks a text grid and places a copy of each cell's legend fragment on a
//! uniform tile grid inside a single `<svg>` document.

mod compose;
mod grid;

pub use compose::{Composition, Compositor};
pub use grid::{Cell, Grid, GridError};
