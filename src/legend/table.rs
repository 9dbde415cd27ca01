//! Symbol lookup table built from a legend

use std::collections::{BTreeMap, HashMap};

use crate::markup::{Element, Node};

use super::sizing::Sizing;

/// Preserve-aspect-ratio rule applied to every tile and to the canvas
pub const PRESERVE_ASPECT_RATIO: &str = "xMinYMin meet";

/// One legend entry's artwork, parsed once and never mutated
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentTemplate {
    id: String,
    symbol: char,
    sizing: Sizing,
    content: Vec<Node>,
}

impl FragmentTemplate {
    pub fn new(id: impl Into<String>, symbol: char, sizing: Sizing, content: Vec<Node>) -> Self {
        Self {
            id: id.into(),
            symbol,
            sizing,
            content,
        }
    }

    /// Generated identifier, unique within one loader
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn sizing(&self) -> &Sizing {
        &self.sizing
    }

    /// The fragment's nodes, detached from the document they came from
    pub fn content(&self) -> &[Node] {
        &self.content
    }

    /// An independent deep copy of the fragment's nodes
    pub fn instantiate(&self) -> Vec<Node> {
        self.content.clone()
    }

    /// The fragment as a `<symbol>` element keyed by its identifier
    pub fn to_symbol_element(&self) -> Element {
        let mut symbol = Element::new("symbol").with_attribute("id", &self.id);
        if let Some(vb) = self.sizing.view_box() {
            symbol.set_attribute("viewBox", vb);
        }
        symbol.set_attribute("preserveAspectRatio", PRESERVE_ASPECT_RATIO);
        symbol.extend(self.instantiate());
        symbol
    }
}

/// Mapping from symbol to fragment template
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    templates: HashMap<char, FragmentTemplate>,
    namespaces: BTreeMap<String, String>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a template, returning the one it replaced
    pub fn insert(&mut self, template: FragmentTemplate) -> Option<FragmentTemplate> {
        self.templates.insert(template.symbol, template)
    }

    /// Record the namespace prefixes a fragment uses
    ///
    /// A prefix already bound to another URI is given a fresh name. The
    /// returned map holds those renames; the fragment must be rewritten
    /// with it before it is stored.
    pub fn bind_namespaces(
        &mut self,
        namespaces: BTreeMap<String, String>,
    ) -> BTreeMap<String, String> {
        let mut renames = BTreeMap::new();
        for (prefix, uri) in namespaces {
            match self.namespaces.get(&prefix) {
                None => {
                    self.namespaces.insert(prefix, uri);
                }
                Some(bound) if *bound == uri => {}
                Some(_) => {
                    let fresh = self.prefix_for(&prefix, uri);
                    renames.insert(prefix, fresh);
                }
            }
        }
        renames
    }

    /// A prefix bound to `uri`, reusing an existing binding when there is one
    fn prefix_for(&mut self, base: &str, uri: String) -> String {
        if let Some((prefix, _)) = self.namespaces.iter().find(|(_, bound)| **bound == uri) {
            return prefix.clone();
        }
        let fresh = (1..)
            .map(|n| format!("{}{}", base, n))
            .find(|candidate| !self.namespaces.contains_key(candidate))
            .unwrap_or_else(|| base.to_string());
        self.namespaces.insert(fresh.clone(), uri);
        fresh
    }

    /// Get the template for a symbol
    pub fn get(&self, symbol: char) -> Option<&FragmentTemplate> {
        self.templates.get(&symbol)
    }

    /// A fresh copy of the artwork mapped to `symbol`
    pub fn instantiate(&self, symbol: char) -> Option<Vec<Node>> {
        self.get(symbol).map(FragmentTemplate::instantiate)
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.templates.contains_key(&symbol)
    }

    /// All mapped symbols, in no particular order
    pub fn symbols(&self) -> impl Iterator<Item = char> + '_ {
        self.templates.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Namespace prefixes the output root has to declare
    pub fn namespaces(&self) -> &BTreeMap<String, String> {
        &self.namespaces
    }
}
