//! Intrinsic sizing of legend fragments

use std::fmt;

use crate::markup::Element;

/// A viewBox built from numeric width and height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0 0 {} {}", self.width, self.height)
    }
}

/// Sizing information for a fragment
#[derive(Debug, Clone, PartialEq)]
pub enum Sizing {
    /// The root declared a viewBox; kept verbatim
    Declared(String),
    /// Built from the root's width and height
    Inferred(ViewBox),
    /// Nothing usable; the fragment is stretched to the tile box
    Unsized,
}

impl Sizing {
    /// The viewBox attribute value to emit, if any
    pub fn view_box(&self) -> Option<String> {
        match self {
            Sizing::Declared(vb) => Some(vb.clone()),
            Sizing::Inferred(vb) => Some(vb.to_string()),
            Sizing::Unsized => None,
        }
    }
}

/// Work out a fragment's sizing from its `<svg>` root
///
/// An explicit `viewBox` wins. Otherwise `width` and `height` are used when
/// both are plain numbers (a `px` suffix is allowed).
pub fn infer(root: &Element) -> Sizing {
    if let Some(vb) = root.attribute("viewBox").filter(|v| !v.trim().is_empty()) {
        return Sizing::Declared(vb.to_string());
    }

    let width = root.attribute("width").and_then(parse_length);
    let height = root.attribute("height").and_then(parse_length);
    match (width, height) {
        (Some(width), Some(height)) => Sizing::Inferred(ViewBox { width, height }),
        _ => Sizing::Unsized,
    }
}

/// Parse a positive user-unit length, rejecting relative units like `%` or `em`
fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let numeric = value.strip_suffix("px").unwrap_or(value).trim_end();
    numeric
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
}
