//! SVG text generation from an element tree

use crate::markup::{Element, Node};

use super::SvgConfig;

/// Serialize element trees to SVG text
pub struct SvgWriter {
    config: SvgConfig,
    out: String,
}

impl SvgWriter {
    /// Create a new SVG writer
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            out: String::new(),
        }
    }

    fn indent_str(&self, depth: usize) -> String {
        if self.config.pretty_print {
            "  ".repeat(depth)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &'static str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    fn end_line(&mut self) {
        let nl = self.newline();
        self.out.push_str(nl);
    }

    fn open_tag(&mut self, element: &Element) {
        self.out.push('<');
        self.out.push_str(element.name());
        for (name, value) in element.attributes() {
            self.out.push_str(&format!(r#" {}="{}""#, name, escape_xml(value)));
        }
    }

    /// Write an element and its subtree at the given nesting depth
    ///
    /// Elements with text content are written on one line so that
    /// no whitespace is injected into the text.
    pub fn write_element(&mut self, element: &Element, depth: usize) {
        if !self.config.pretty_print || element.has_text_content() {
            let indent = self.indent_str(depth);
            self.out.push_str(&indent);
            self.write_inline(element);
            self.end_line();
            return;
        }

        let indent = self.indent_str(depth);
        self.out.push_str(&indent);
        self.open_tag(element);

        let children: Vec<&Element> = element
            .children()
            .iter()
            .filter_map(|c| match c {
                Node::Element(e) => Some(e),
                Node::Text(_) => None,
            })
            .collect();

        if children.is_empty() {
            self.out.push_str("/>");
            self.end_line();
            return;
        }

        self.out.push('>');
        self.end_line();
        for child in children {
            self.write_element(child, depth + 1);
        }
        self.out.push_str(&indent);
        self.out.push_str(&format!("</{}>", element.name()));
        self.end_line();
    }

    fn write_inline(&mut self, element: &Element) {
        self.open_tag(element);
        if element.children().is_empty() {
            self.out.push_str("/>");
            return;
        }
        self.out.push('>');
        for child in element.children() {
            match child {
                Node::Element(e) => self.write_inline(e),
                Node::Text(text) => self.out.push_str(&escape_xml(text)),
            }
        }
        self.out.push_str(&format!("</{}>", element.name()));
    }

    /// Build the final SVG string with `root` as the document element
    pub fn build(mut self, root: &Element) -> String {
        if self.config.standalone {
            self.out.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            self.end_line();
        }
        self.write_element(root, 0);
        self.out
    }
}

/// Render an element tree to an SVG string
pub fn render_svg(root: &Element, config: &SvgConfig) -> String {
    SvgWriter::new(config.clone()).build(root)
}

/// Escape special XML characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
