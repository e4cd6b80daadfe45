//! Arena-backed document tree.
//!
//! Nodes live in a single `Vec` owned by [`Document`] and are addressed by
//! [`NodeId`]. Detaching a node only unlinks it from its parent; the slot stays
//! allocated until the document is dropped.

use std::borrow::Cow;

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Attribute as written in the source.
///
/// Values are kept in their escaped source form so that unmodified attributes
/// round-trip untouched. [`Document::set_attr`] escapes new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    /// `None` for valueless attributes (`<details open>`).
    pub value: Option<String>,
}

/// Element node payload.
#[derive(Debug, Clone)]
pub struct Element {
    /// Tag name as written in the source.
    pub name: String,
    pub attrs: Vec<Attribute>,
    /// Written as `<name ... />`.
    pub self_closing: bool,
    /// Original start tag text. Cleared when attributes change.
    pub(crate) source: Option<String>,
}

impl Element {
    /// Create a detached element with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            self_closing: false,
            source: None,
        }
    }

    /// Whether the tag name matches `name` (ASCII case-insensitive).
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Raw value of an attribute, if present.
    ///
    /// Valueless attributes yield an empty string.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    /// Attribute value with character references decoded.
    ///
    /// A value containing a reference that can't be decoded (such as an HTML
    /// named entity like `&nbsp;`) is returned as written.
    pub fn attr_text(&self, name: &str) -> Option<Cow<'_, str>> {
        let raw = self.attr(name)?;
        Some(quick_xml::escape::unescape(raw).unwrap_or(Cow::Borrowed(raw)))
    }

    /// Whitespace-separated tokens of the `class` attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_ascii_whitespace()
    }

    /// Whether the `class` attribute contains `token` exactly.
    pub fn has_class(&self, token: &str) -> bool {
        self.classes().any(|c| c == token)
    }

    /// Whether the element is an HTML void element (no end tag).
    pub fn is_void(&self) -> bool {
        is_void_element(&self.name)
    }
}

/// Node payload.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Root of the tree.
    Document,
    Element(Element),
    /// Character data in source form (entities left escaped).
    Text(String),
    /// Comment body without the `<!--` / `-->` delimiters.
    Comment(String),
    /// Doctype, XML declaration or processing instruction, verbatim.
    Raw(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Parsed HTML document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only the root node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Payload of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Element payload, if the node is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Comment body, if the node is a comment.
    pub fn comment(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].kind {
            NodeKind::Comment(text) => Some(text),
            _ => None,
        }
    }

    /// Whether the node is an element named `name`.
    pub fn is_element(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|el| el.is(name))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Ancestors of `id`, nearest first. Excludes `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Descendants of `id` in document order. Excludes `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// The node following `id` in document order.
    ///
    /// Descends into children first, then moves to the next sibling of the
    /// nearest ancestor that has one.
    pub fn next_in_order(&self, id: NodeId) -> Option<NodeId> {
        if let Some(&first) = self.children(id).first() {
            return Some(first);
        }
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            let siblings = self.children(parent);
            if let Some(pos) = siblings.iter().position(|&c| c == current)
                && let Some(&next) = siblings.get(pos + 1)
            {
                return Some(next);
            }
            current = parent;
        }
        None
    }

    /// The next element after `id` in document order, skipping other nodes.
    pub fn next_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_in_order(id)?;
        while self.element(current).is_none() {
            current = self.next_in_order(current)?;
        }
        Some(current)
    }

    /// All comment nodes in document order.
    pub fn comments(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .filter(|&id| self.comment(id).is_some())
            .collect()
    }

    /// Allocate a detached node.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Allocate a detached element with escaped text content.
    pub fn create_text_element(&mut self, name: &str, text: &str) -> NodeId {
        let el = self.create(NodeKind::Element(Element::new(name)));
        if !text.is_empty() {
            let text = self.create(NodeKind::Text(escape_text(text)));
            self.append_child(el, text);
        }
        el
    }

    /// Append `child` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Insert `child` at `index` among the children of `parent`.
    ///
    /// Indices past the end append.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        let children = &mut self.nodes[parent.0].children;
        let index = index.min(children.len());
        children.insert(index, child);
    }

    /// Unlink a node from its parent. The subtree stays intact.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    /// Append character data to `parent`, merging with a trailing text node.
    pub(crate) fn push_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last()
            && let NodeKind::Text(existing) = &mut self.nodes[last.0].kind
        {
            existing.push_str(text);
            return;
        }
        let node = self.create(NodeKind::Text(text.to_owned()));
        self.append_child(parent, node);
    }

    /// Set an attribute, escaping `value`. Replaces any existing value.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let NodeKind::Element(el) = &mut self.nodes[id.0].kind else {
            return;
        };
        let value = Some(escape_attr(value));
        if let Some(attr) = el
            .attrs
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            if attr.value == value {
                return;
            }
            attr.value = value;
        } else {
            el.attrs.push(Attribute {
                name: name.to_owned(),
                value,
            });
        }
        el.source = None;
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        let NodeKind::Element(el) = &mut self.nodes[id.0].kind else {
            return;
        };
        let before = el.attrs.len();
        el.attrs.retain(|a| !a.name.eq_ignore_ascii_case(name));
        if el.attrs.len() != before {
            el.source = None;
        }
    }

    /// Concatenated text content of a subtree, in source form.
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|d| match self.kind(d) {
                NodeKind::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Iterator over a node's ancestors.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}

/// HTML elements that never have an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// Escape text for element content.
pub fn escape_text(text: &str) -> String {
    escape(text, false)
}

/// Escape text for a double-quoted attribute value.
pub fn escape_attr(text: &str) -> String {
    escape(text, true)
}

fn escape(text: &str, quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element_names(doc: &Document, ids: impl Iterator<Item = NodeId>) -> Vec<String> {
        ids.filter_map(|id| doc.element(id).map(|el| el.name.clone()))
            .collect()
    }

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        // <div><p><b/></p><svg/></div>
        let mut doc = Document::new();
        let div = doc.create(NodeKind::Element(Element::new("div")));
        let p = doc.create(NodeKind::Element(Element::new("p")));
        let b = doc.create(NodeKind::Element(Element::new("b")));
        let svg = doc.create(NodeKind::Element(Element::new("svg")));
        let root = doc.root();
        doc.append_child(root, div);
        doc.append_child(div, p);
        doc.append_child(p, b);
        doc.append_child(div, svg);
        (doc, p, b, svg)
    }

    #[test]
    fn test_descendants_are_preorder() {
        let (doc, ..) = sample();
        let names = element_names(&doc, doc.descendants(doc.root()));
        assert_eq!(names, vec!["div", "p", "b", "svg"]);
    }

    #[test]
    fn test_next_in_order_climbs_out_of_subtree() {
        let (doc, p, b, svg) = sample();
        assert_eq!(doc.next_in_order(p), Some(b));
        assert_eq!(doc.next_in_order(b), Some(svg));
        assert_eq!(doc.next_in_order(svg), None);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (doc, _, b, _) = sample();
        let names = element_names(&doc, doc.ancestors(b));
        assert_eq!(names, vec!["p", "div"]);
    }

    #[test]
    fn test_insert_child_moves_node() {
        let (mut doc, p, b, svg) = sample();
        doc.insert_child(svg, 0, b);
        assert!(doc.children(p).is_empty());
        assert_eq!(doc.children(svg), &[b]);
        assert_eq!(doc.parent(b), Some(svg));
    }

    #[test]
    fn test_set_attr_escapes_and_replaces() {
        let (mut doc, _, _, svg) = sample();
        doc.set_attr(svg, "aria-label", "a \"b\" & c");
        doc.set_attr(svg, "ARIA-LABEL", "plain");
        let el = doc.element(svg).unwrap();
        assert_eq!(el.attrs.len(), 1);
        assert_eq!(el.attr("aria-label"), Some("plain"));

        doc.set_attr(svg, "title", "a \"b\" & c");
        assert_eq!(
            doc.element(svg).unwrap().attr("title"),
            Some("a &quot;b&quot; &amp; c")
        );
    }

    #[test]
    fn test_classes() {
        let mut el = Element::new("div");
        el.attrs.push(Attribute {
            name: "class".to_owned(),
            value: Some("  diagram-container  graphviz-diagram ".to_owned()),
        });
        assert_eq!(
            el.classes().collect::<Vec<_>>(),
            vec!["diagram-container", "graphviz-diagram"]
        );
        assert!(el.has_class("graphviz-diagram"));
        assert!(!el.has_class("graphviz"));
    }

    #[test]
    fn test_create_text_element_escapes() {
        let mut doc = Document::new();
        let title = doc.create_text_element("title", "A < B");
        assert_eq!(doc.text_content(title), "A &lt; B");
    }

    #[test]
    fn test_attr_text_decodes_references() {
        let mut el = Element::new("svg");
        el.attrs.push(Attribute {
            name: "id".to_owned(),
            value: Some("a&amp;b&#45;c".to_owned()),
        });
        el.attrs.push(Attribute {
            name: "title".to_owned(),
            value: Some("x&nbsp;y".to_owned()),
        });

        assert_eq!(el.attr("id"), Some("a&amp;b&#45;c"));
        assert_eq!(el.attr_text("id").as_deref(), Some("a&b-c"));
        assert_eq!(el.attr_text("title").as_deref(), Some("x&nbsp;y"));
        assert_eq!(el.attr_text("missing"), None);
    }
}
