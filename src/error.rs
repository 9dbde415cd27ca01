//! Error types for legend loading

use std::io;
use std::path::PathBuf;

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

use crate::markup::MarkupError;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Fatal errors while loading a legend; any of them aborts the whole load
#[derive(Error, Debug)]
pub enum LegendError {
    #[error("failed to read legend '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("bad symbol: {symbol:?} on line {line}")]
    BadSymbol {
        symbol: String,
        line: usize,
        span: Span,
    },

    #[error("no fragment given for symbol {symbol} on line {line}")]
    MissingValue { symbol: char, line: usize, span: Span },

    #[error("problem parsing element for {symbol} on line {line}: {source}")]
    MalformedFragment {
        symbol: char,
        line: usize,
        span: Span,
        source: MarkupError,
    },

    #[error("cannot read '{}' for symbol {symbol} on line {line}: {source}", path.display())]
    UnresolvedReference {
        symbol: char,
        path: PathBuf,
        line: usize,
        span: Span,
        source: io::Error,
    },
}

impl LegendError {
    /// Get the source span if available
    pub fn span(&self) -> Option<&Span> {
        match self {
            Self::Io { .. } => None,
            Self::BadSymbol { span, .. }
            | Self::MissingValue { span, .. }
            | Self::MalformedFragment { span, .. }
            | Self::UnresolvedReference { span, .. } => Some(span),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Io { .. } => String::new(),
            Self::BadSymbol { .. } => "symbols must be exactly one character".to_string(),
            Self::MissingValue { .. } => {
                "expected `<symbol> <markup>` or `<symbol> @<file>`".to_string()
            }
            Self::MalformedFragment { source, .. } => source.to_string(),
            Self::UnresolvedReference { source, .. } => source.to_string(),
        }
    }

    /// Format the error with legend context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let Some(span) = self.span() else {
            return self.to_string();
        };

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span.clone()))
                    .with_message(self.label())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}
