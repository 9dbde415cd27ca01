//! Owned SVG element trees
//!
//! Fragments read from the legend are parsed into an owned tree so they can be
//! stored once and cloned into every placement that needs them.

mod parse;
mod tree;

pub use parse::{parse_document, wrap_in_root, MarkupError, ParsedDocument};
pub use tree::{Element, Node, SVG_NAMESPACE, XLINK_NAMESPACE};
