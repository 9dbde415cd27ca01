//! Non-fatal diagnostics collected while loading and composing.
//!
//! Warnings never abort a run. They are returned alongside the result and
//! the CLI reports them on stderr.

use std::fmt;

/// A non-fatal problem found while building the image
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A grid cell holds a symbol the legend does not define
    UnmappedSymbol { symbol: char, row: usize, column: usize },

    /// A fragment has no viewBox; one was built from its width and height
    InferredSizing { symbol: char, view_box: String },

    /// A fragment has neither a viewBox nor usable width and height
    MissingSizing { symbol: char },

    /// A later legend line redefined a symbol
    DuplicateSymbol { symbol: char, line: usize },
}

/// Category of warning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningCategory {
    Unmapped,
    Sizing,
    Duplicate,
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningCategory::Unmapped => write!(f, "unmapped"),
            WarningCategory::Sizing => write!(f, "sizing"),
            WarningCategory::Duplicate => write!(f, "duplicate"),
        }
    }
}

impl Warning {
    pub fn category(&self) -> WarningCategory {
        match self {
            Warning::UnmappedSymbol { .. } => WarningCategory::Unmapped,
            Warning::InferredSizing { .. } | Warning::MissingSizing { .. } => {
                WarningCategory::Sizing
            }
            Warning::DuplicateSymbol { .. } => WarningCategory::Duplicate,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnmappedSymbol { symbol, .. } => {
                write!(f, "no mapping for symbol: {}", symbol)
            }
            Warning::InferredSizing { symbol, view_box } => write!(
                f,
                "element for {} has no viewBox; assuming width and height are accurate ({})",
                symbol, view_box
            ),
            Warning::MissingSizing { symbol } => {
                write!(f, "element for {} has no size information", symbol)
            }
            Warning::DuplicateSymbol { symbol, line } => write!(
                f,
                "symbol {} redefined on line {}; the later definition wins",
                symbol, line
            ),
        }
    }
}
