//! Owned element tree for unit-list documents
//!
//! The reader never touches XML directly. It works on `Element`, a tree of
//! named elements with string attributes and ordered element children, which
//! is either built from XML text with `parse_document` or assembled in code.
//!
//! Attribute presence matters: `attr` distinguishes an absent attribute
//! (`None`) from a present but blank one (`Some("")`).

use roxmltree::{Document, Node};

/// One element of a unit-list document
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder: add or replace an attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder: append a child element
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: set the text content
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive tag comparison
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    /// Raw attribute value; `None` only when the attribute is absent
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute value, or "" when absent
    pub fn attr_or_blank(&self, key: &str) -> &str {
        self.attr(key).unwrap_or("")
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Direct element children, in document order
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    /// Trimmed text content
    pub fn text(&self) -> &str {
        self.text.trim()
    }
}

/// Parse XML text into an element tree rooted at the document element
pub fn parse_document(xml: &str) -> Result<Element, roxmltree::Error> {
    let doc = Document::parse(xml)?;
    Ok(build(doc.root_element()))
}

fn build(node: Node) -> Element {
    let attributes = node
        .attributes()
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect();

    // Only elements whose structural parent is this node are attached here.
    let children = node
        .children()
        .filter(|c| c.is_element() && c.parent() == Some(node))
        .map(build)
        .collect();

    let text = node
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect::<String>();

    Element {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
        text,
    }
}
