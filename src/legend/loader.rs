//! Legend file loading
//!
//! A legend has one entry per line, `<symbol> <value>`. The value is either
//! inline SVG markup or `@path`, a file resolved next to the legend.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{LegendError, Span};
use crate::markup::{self, MarkupError, ParsedDocument};
use crate::warning::Warning;

use super::sizing::{self, Sizing};
use super::table::{FragmentTemplate, LookupTable};

/// Prefix of generated template identifiers
pub const ID_PREFIX: &str = "svgtilersymbol";

/// A loaded legend with the warnings raised while loading it
#[derive(Debug)]
pub struct LoadedLegend {
    pub table: LookupTable,
    pub warnings: Vec<Warning>,
}

/// Legend text read from disk
///
/// The text is kept so that errors can be reported against it.
#[derive(Debug, Clone)]
pub struct LegendFile {
    pub path: PathBuf,
    pub source: String,
}

impl LegendFile {
    pub fn read(path: &Path) -> Result<Self, LegendError> {
        let source = fs::read_to_string(path).map_err(|e| LegendError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Directory that `@` references resolve against
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Builds lookup tables from legend files
///
/// The loader owns the counter used to name templates, so identifiers are
/// unique across every legend loaded by the same instance.
#[derive(Debug, Default)]
pub struct LegendLoader {
    next_id: usize,
}

/// Where an entry's markup comes from
enum FragmentSource<'a> {
    Inline(&'a str),
    Reference(&'a str),
}

/// One non-blank legend line, split into fields
struct Entry<'a> {
    line: usize,
    symbol: char,
    value: &'a str,
    value_span: Span,
}

impl LegendLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a legend file
    ///
    /// References are resolved relative to the directory holding `path`.
    pub fn load(&mut self, path: &Path) -> Result<LoadedLegend, LegendError> {
        let file = LegendFile::read(path)?;
        self.load_file(&file)
    }

    /// Load a legend that has already been read from disk
    pub fn load_file(&mut self, file: &LegendFile) -> Result<LoadedLegend, LegendError> {
        self.load_str(&file.source, file.base_dir())
    }

    /// Load legend text, resolving references against `base_dir`
    pub fn load_str(
        &mut self,
        source: &str,
        base_dir: &Path,
    ) -> Result<LoadedLegend, LegendError> {
        let mut table = LookupTable::new();
        let mut warnings = Vec::new();

        let mut offset = 0;
        for (index, raw) in source.split_inclusive('\n').enumerate() {
            let start = offset;
            offset += raw.len();

            let line = raw.trim_end_matches(&['\r', '\n'][..]);
            if line.trim().is_empty() {
                continue;
            }

            let entry = split_entry(line, index + 1, start)?;
            let document = self.parse_entry(&entry, base_dir)?;
            let template = self.build_template(entry.symbol, document, &mut table, &mut warnings);

            debug!("legend line {}: {:?} -> {}", entry.line, entry.symbol, template.id());
            if table.insert(template).is_some() {
                warnings.push(Warning::DuplicateSymbol {
                    symbol: entry.symbol,
                    line: entry.line,
                });
            }
        }

        info!("loaded legend with {} symbols", table.len());
        Ok(LoadedLegend { table, warnings })
    }

    fn parse_entry(&self, entry: &Entry, base_dir: &Path) -> Result<ParsedDocument, LegendError> {
        let malformed = |source: MarkupError| LegendError::MalformedFragment {
            symbol: entry.symbol,
            line: entry.line,
            span: entry.value_span.clone(),
            source,
        };

        match classify(entry.value) {
            FragmentSource::Reference(relative) => {
                let path = resolve_reference(base_dir, relative);
                debug!("reading fragment for {:?} from {}", entry.symbol, path.display());
                let text = fs::read_to_string(&path).map_err(|e| {
                    LegendError::UnresolvedReference {
                        symbol: entry.symbol,
                        path: path.clone(),
                        line: entry.line,
                        span: entry.value_span.clone(),
                        source: e,
                    }
                })?;
                markup::parse_document(&text).map_err(malformed)
            }
            FragmentSource::Inline(text) => match markup::parse_document(text) {
                Ok(doc) => Ok(doc),
                Err(err) if err.is_missing_root() => {
                    debug!("wrapping bare fragment for {:?} in <svg>", entry.symbol);
                    markup::parse_document(&markup::wrap_in_root(text)).map_err(malformed)
                }
                Err(err) => Err(malformed(err)),
            },
        }
    }

    fn build_template(
        &mut self,
        symbol: char,
        document: ParsedDocument,
        table: &mut LookupTable,
        warnings: &mut Vec<Warning>,
    ) -> FragmentTemplate {
        let sizing = sizing::infer(&document.root);
        match &sizing {
            Sizing::Declared(_) => {}
            Sizing::Inferred(vb) => warnings.push(Warning::InferredSizing {
                symbol,
                view_box: vb.to_string(),
            }),
            Sizing::Unsized => warnings.push(Warning::MissingSizing { symbol }),
        }

        let ParsedDocument {
            mut root,
            namespaces,
        } = document;
        let renames = table.bind_namespaces(namespaces);
        if !renames.is_empty() {
            debug!("renamed namespace prefixes for {:?}: {:?}", symbol, renames);
            root.rename_prefixes(&renames);
        }

        let id = format!("{}{}", ID_PREFIX, self.next_id);
        self.next_id += 1;
        FragmentTemplate::new(id, symbol, sizing, root.into_children())
    }
}

/// Split a legend line at its first space into symbol and trimmed value
fn split_entry(line: &str, number: usize, start: usize) -> Result<Entry<'_>, LegendError> {
    let (symbol_text, rest) = line.split_once(' ').unwrap_or((line, ""));
    let symbol_span = start..start + symbol_text.len();

    let mut chars = symbol_text.chars();
    let symbol = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(LegendError::BadSymbol {
                symbol: symbol_text.to_string(),
                line: number,
                span: symbol_span,
            })
        }
    };

    let value = rest.trim();
    if value.is_empty() {
        return Err(LegendError::MissingValue {
            symbol,
            line: number,
            span: symbol_span,
        });
    }

    let value_start = start + symbol_text.len() + 1 + (rest.len() - rest.trim_start().len());
    Ok(Entry {
        line: number,
        symbol,
        value,
        value_span: value_start..value_start + value.len(),
    })
}

fn classify(value: &str) -> FragmentSource<'_> {
    match value.strip_prefix('@') {
        Some(path) => FragmentSource::Reference(path.trim()),
        None => FragmentSource::Inline(value),
    }
}

/// Resolve a reference against the legend's directory; absolute paths pass through
fn resolve_reference(base_dir: &Path, relative: &str) -> PathBuf {
    base_dir.join(relative)
}
