//! Read-only XML tree consumed by the selector and the fingerprint extractors.
//!
//! Nodes carry their structural path from the root. Paths are `/`-joined tag
//! names; a tag that repeats among its siblings gets a 1-based positional
//! suffix (`/OrderViewRS/PaxList/Pax[2]`), so every path in a tree is unique
//! and ancestry can be decided from paths alone.

use std::fmt::{self, Write};

use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, Result};

/// Deepest element nesting [`XmlNode::parse`] accepts. Tree walks such as
/// serialization recurse once per level.
pub const MAX_DEPTH: usize = 256;

/// A single element of a parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlNode {
    /// Local tag name (namespace prefix dropped)
    pub tag: String,

    /// Structural path from the root
    pub path: String,

    /// Child elements in document order
    #[serde(default)]
    pub children: Vec<XmlNode>,

    /// Attributes in document order
    #[serde(default)]
    pub attributes: IndexMap<String, String>,

    /// Text content, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl XmlNode {
    /// Create a detached element. Its path is `/{tag}` until it is attached
    /// to a parent.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            path: format!("/{}", tag),
            tag,
            children: Vec::new(),
            attributes: IndexMap::new(),
            text: None,
        }
    }

    /// Set an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child and re-derive the paths below this node.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(child);
        self.assign_child_paths();
        self
    }

    /// Append several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = XmlNode>) -> Self {
        self.children.extend(children);
        self.assign_child_paths();
        self
    }

    /// Parse an XML document into a tree.
    ///
    /// Comments, processing instructions and the XML declaration are
    /// skipped. Namespace declarations are not kept as attributes. Elements
    /// nested more than [`MAX_DEPTH`] levels deep are rejected as malformed.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => {
                    check_depth(&stack)?;
                    stack.push(element_from(&start)?);
                }
                Event::Empty(start) => {
                    check_depth(&stack)?;
                    let node = element_from(&start)?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| DiscoveryError::malformed("unexpected closing tag"))?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::Text(text) => {
                    let text = text.unescape()?;
                    append_text(&mut stack, &text)?;
                }
                Event::CData(cdata) => {
                    let bytes = cdata.into_inner();
                    append_text(&mut stack, &String::from_utf8_lossy(&bytes))?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(DiscoveryError::malformed(format!(
                "unclosed element <{}>",
                open.tag
            )));
        }

        let mut root =
            root.ok_or_else(|| DiscoveryError::malformed("document has no root element"))?;
        root.path = format!("/{}", root.tag);
        root.assign_child_paths();
        Ok(root)
    }

    /// Whether the node has no child elements.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether the node carries non-blank text.
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Trimmed text content, if non-blank.
    pub fn text_trimmed(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Height of the subtree below this node (0 for a leaf).
    pub fn subtree_depth(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.subtree_depth())
            .max()
            .unwrap_or(0)
    }

    /// Pre-order traversal including this node.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Pre-order traversal excluding this node.
    pub fn descendants(&self) -> impl Iterator<Item = &XmlNode> {
        self.iter().skip(1)
    }

    /// First descendant with the given tag.
    pub fn find(&self, tag: &str) -> Option<&XmlNode> {
        self.descendants().find(|n| n.tag == tag)
    }

    /// All descendants with the given tag.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.descendants().filter(move |n| n.tag == tag)
    }

    /// Trimmed text of the first descendant with the given tag.
    pub fn find_text(&self, tag: &str) -> Option<&str> {
        self.find(tag).and_then(XmlNode::text_trimmed)
    }

    /// Compact XML serialization of this subtree.
    pub fn to_xml(&self) -> String {
        self.to_string()
    }

    /// Number of characters [`to_xml`](Self::to_xml) would produce, without
    /// allocating the string.
    pub fn serialized_len(&self) -> usize {
        let mut counter = CharCounter(0);
        // CharCounter never fails
        let _ = write!(counter, "{}", self);
        counter.0
    }

    fn assign_child_paths(&mut self) {
        let mut totals: IndexMap<String, usize> = IndexMap::new();
        for child in &self.children {
            *totals.entry(child.tag.clone()).or_insert(0) += 1;
        }

        let mut seen: IndexMap<String, usize> = IndexMap::new();
        for child in &mut self.children {
            let position = seen.entry(child.tag.clone()).or_insert(0);
            *position += 1;
            child.path = if totals[&child.tag] > 1 {
                format!("{}/{}[{}]", self.path, child.tag, position)
            } else {
                format!("{}/{}", self.path, child.tag)
            };
            child.assign_child_paths();
        }
    }
}

impl fmt::Display for XmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"", name)?;
            write_escaped(f, value, true)?;
            f.write_char('"')?;
        }

        if self.children.is_empty() && self.text.is_none() {
            return f.write_str("/>");
        }

        f.write_char('>')?;
        if let Some(text) = &self.text {
            write_escaped(f, text, false)?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}

/// Pre-order iterator over an [`XmlNode`] subtree.
pub struct Iter<'a> {
    stack: Vec<&'a XmlNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a XmlNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

struct CharCounter(usize);

impl Write for CharCounter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.0 += s.chars().count();
        Ok(())
    }
}

fn write_escaped(f: &mut fmt::Formatter<'_>, value: &str, in_attribute: bool) -> fmt::Result {
    for ch in value.chars() {
        match ch {
            '&' => f.write_str("&amp;")?,
            '<' => f.write_str("&lt;")?,
            '>' => f.write_str("&gt;")?,
            '"' if in_attribute => f.write_str("&quot;")?,
            _ => f.write_char(ch)?,
        }
    }
    Ok(())
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlNode> {
    let tag = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut node = XmlNode::new(tag);

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        if attr.key.as_ref().starts_with(b"xmlns") {
            continue;
        }
        let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        node.attributes.insert(name, value);
    }

    Ok(node)
}

fn check_depth(stack: &[XmlNode]) -> Result<()> {
    if stack.len() >= MAX_DEPTH {
        return Err(DiscoveryError::malformed(format!(
            "elements nested deeper than {} levels",
            MAX_DEPTH
        )));
    }
    Ok(())
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }
    if root.is_some() {
        return Err(DiscoveryError::malformed("multiple root elements"));
    }
    *root = Some(node);
    Ok(())
}

fn append_text(stack: &mut [XmlNode], text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }
    let current = stack
        .last_mut()
        .ok_or_else(|| DiscoveryError::malformed("text outside the root element"))?;
    match &mut current.text {
        Some(existing) => existing.push_str(text),
        None => current.text = Some(text.to_string()),
    }
    Ok(())
}
