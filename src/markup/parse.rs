//! Parse SVG markup into an owned [`Element`] tree

use std::collections::BTreeMap;

use thiserror::Error;

use super::tree::{Element, Node, SVG_NAMESPACE, XLINK_NAMESPACE};

const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Errors from parsing fragment markup
///
/// `MissingRoot` is reported when the text could be a valid fragment that
/// only lacks its `<svg>` wrapper: its first tag is something other than
/// `<svg>`. Callers use it to decide whether wrapping and re-parsing is
/// worthwhile. Text that opens with `<svg>` and still fails is `NotWellFormed`.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("markup is not well-formed: {0}")]
    NotWellFormed(roxmltree::Error),

    #[error("missing <svg> root element{}", found_suffix(.found))]
    MissingRoot { found: Option<String> },
}

fn found_suffix(found: &Option<String>) -> String {
    match found {
        Some(name) => format!(" (found <{}>)", name),
        None => String::new(),
    }
}

impl MarkupError {
    /// True when wrapping the text in an `<svg>` root may fix it
    pub fn is_missing_root(&self) -> bool {
        matches!(self, MarkupError::MissingRoot { .. })
    }
}

/// Classify a parse failure by the first tag of the text
///
/// Sibling elements and undeclared prefixes such as `xlink:` are both
/// failures that an `<svg>` wrapper can repair.
fn classify_failure(text: &str, err: roxmltree::Error) -> MarkupError {
    match leading_tag(text) {
        Some(name) if local_name(name) != "svg" => MarkupError::MissingRoot {
            found: Some(name.to_string()),
        },
        _ => MarkupError::NotWellFormed(err),
    }
}

/// Name of the first element tag, skipping the prolog
fn leading_tag(text: &str) -> Option<&str> {
    let mut rest = text.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.split_once("-->")?.1.trim_start();
        } else if rest.starts_with("<?") {
            rest = rest.split_once("?>")?.1.trim_start();
        } else if rest.starts_with("<!") {
            let end = match (rest.find('['), rest.find('>')) {
                // DOCTYPE with an internal subset
                (Some(open), Some(close)) if open < close => {
                    let subset_end = open + rest[open..].find(']')?;
                    subset_end + rest[subset_end..].find('>')?
                }
                (_, Some(close)) => close,
                _ => return None,
            };
            rest = rest[end + 1..].trim_start();
        } else {
            let after = rest.strip_prefix('<')?;
            let end = after
                .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
                .unwrap_or(after.len());
            return Some(&after[..end]).filter(|name| !name.is_empty());
        }
    }
}

fn local_name(qualified: &str) -> &str {
    qualified.rsplit(':').next().unwrap_or(qualified)
}

/// A parsed document with an `<svg>` root
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// The `<svg>` root element, attributes and children included
    pub root: Element,
    /// Namespace prefixes used in the tree, mapped to their URIs
    pub namespaces: BTreeMap<String, String>,
}

/// Wrap bare fragment markup in an `<svg>` root declaring the SVG and XLink namespaces
pub fn wrap_in_root(fragment: &str) -> String {
    format!(
        r#"<svg xmlns="{}" xmlns:xlink="{}">{}</svg>"#,
        SVG_NAMESPACE, XLINK_NAMESPACE, fragment
    )
}

/// Parse a complete SVG document
///
/// The root must be an `<svg>` element either in the SVG namespace or in no
/// namespace at all. Comments and processing instructions are dropped;
/// a DOCTYPE is tolerated.
pub fn parse_document(text: &str) -> Result<ParsedDocument, MarkupError> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, options)
        .map_err(|err| classify_failure(text, err))?;

    let root = doc.root_element();
    let tag = root.tag_name();
    let in_svg_namespace = matches!(tag.namespace(), None | Some(SVG_NAMESPACE));
    if tag.name() != "svg" || !in_svg_namespace {
        return Err(MarkupError::MissingRoot {
            found: Some(tag.name().to_string()),
        });
    }

    let mut namespaces = BTreeMap::new();
    let root = convert_element(root, SVG_NAMESPACE, &mut namespaces);
    Ok(ParsedDocument { root, namespaces })
}

/// Convert `node` and its subtree
///
/// `default_ns` is the default namespace in effect at the parent. An
/// unprefixed element in another namespace declares its own `xmlns`.
fn convert_element(
    node: roxmltree::Node,
    default_ns: &str,
    namespaces: &mut BTreeMap<String, String>,
) -> Element {
    let tag = node.tag_name();
    let uri = tag.namespace().unwrap_or(SVG_NAMESPACE);

    let (mut element, child_default) = match prefixed_name(node, uri, tag.name(), namespaces) {
        Some(name) => (Element::new(name), default_ns),
        None => (Element::new(tag.name()), uri),
    };
    if child_default != default_ns {
        element.set_attribute("xmlns", child_default);
    }

    for attr in node.attributes() {
        let name = match attr.namespace() {
            None => attr.name().to_string(),
            Some(XML_NAMESPACE) => format!("xml:{}", attr.name()),
            Some(ns) => prefixed_name(node, ns, attr.name(), namespaces)
                .unwrap_or_else(|| attr.name().to_string()),
        };
        element.set_attribute(name, attr.value());
    }

    for child in node.children() {
        if child.is_element() {
            element.append(convert_element(child, child_default, namespaces));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.append(Node::Text(text.to_string()));
            }
        }
    }

    element
}

/// `prefix:local` for a name bound through a non-SVG prefix
///
/// The prefix is recorded so the output root can declare it. Returns `None`
/// for SVG names and for names in a default namespace.
fn prefixed_name(
    node: roxmltree::Node,
    uri: &str,
    local: &str,
    namespaces: &mut BTreeMap<String, String>,
) -> Option<String> {
    if uri == SVG_NAMESPACE {
        return None;
    }
    let prefix = node.lookup_prefix(uri).filter(|p| !p.is_empty())?;
    namespaces
        .entry(prefix.to_string())
        .or_insert_with(|| uri.to_string());
    Some(format!("{}:{}", prefix, local))
}
