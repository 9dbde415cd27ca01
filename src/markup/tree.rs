//! Element tree types

use std::collections::BTreeMap;

/// The SVG namespace URI
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// The XLink namespace URI, used by `xlink:href`
pub const XLINK_NAMESPACE: &str = "http://www.w3.org/1999/xlink";

/// A node in an element tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    /// Returns true for text nodes made only of whitespace
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// An element with qualified name, ordered attributes and children
///
/// Attribute order is insertion order, so serialization is stable.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes and no children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attribute`]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder form of [`Element::append`]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.append(child);
        self
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Look up an attribute by qualified name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Append a child node
    pub fn append(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Append several child nodes
    pub fn extend(&mut self, children: impl IntoIterator<Item = Node>) {
        self.children.extend(children);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Detach the children, consuming the element
    pub fn into_children(self) -> Vec<Node> {
        self.children
    }

    /// Rewrite `prefix:` names in the subtree using `renames`
    pub fn rename_prefixes(&mut self, renames: &BTreeMap<String, String>) {
        if renames.is_empty() {
            return;
        }
        rename_qualified(&mut self.name, renames);
        for (name, _) in &mut self.attributes {
            rename_qualified(name, renames);
        }
        for child in &mut self.children {
            if let Node::Element(element) = child {
                element.rename_prefixes(renames);
            }
        }
    }

    /// True if any direct child is non-blank text (mixed content)
    pub fn has_text_content(&self) -> bool {
        self.children
            .iter()
            .any(|c| matches!(c, Node::Text(_)) && !c.is_blank_text())
    }
}

fn rename_qualified(name: &mut String, renames: &BTreeMap<String, String>) {
    let renamed = match name.split_once(':') {
        Some((prefix, local)) => match renames.get(prefix) {
            Some(new_prefix) => format!("{}:{}", new_prefix, local),
            None => return,
        },
        None => return,
    };
    *name = renamed;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_replaces_in_place() {
        let mut el = Element::new("rect")
            .with_attribute("x", 1)
            .with_attribute("y", 2);
        el.set_attribute("x", 10);

        assert_eq!(el.attribute("x"), Some("10"));
        let names: Vec<&str> = el.attributes().iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn test_missing_attribute() {
        let el = Element::new("g");
        assert_eq!(el.attribute("id"), None);
    }

    #[test]
    fn test_text_content_detection() {
        let blank = Element::new("g").with_child(Node::Text("\n  ".to_string()));
        assert!(!blank.has_text_content());

        let text = Element::new("text").with_child(Node::Text("hi".to_string()));
        assert!(text.has_text_content());
    }

    #[test]
    fn test_rename_prefixes() {
        let mut el = Element::new("k:group")
            .with_attribute("k:role", "x")
            .with_attribute("xlink:href", "#a")
            .with_child(Element::new("rect").with_attribute("k:role", "y"));
        let renames = BTreeMap::from([("k".to_string(), "k1".to_string())]);
        el.rename_prefixes(&renames);

        assert_eq!(el.name(), "k1:group");
        assert_eq!(el.attribute("k1:role"), Some("x"));
        assert_eq!(el.attribute("xlink:href"), Some("#a"));
        match &el.children()[0] {
            Node::Element(rect) => assert_eq!(rect.attribute("k1:role"), Some("y")),
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_into_children_detaches() {
        let el = Element::new("svg")
            .with_child(Element::new("circle"))
            .with_child(Element::new("rect"));
        let children = el.into_children();
        assert_eq!(children.len(), 2);
        assert!(matches!(&children[0], Node::Element(e) if e.name() == "circle"));
    }
}
