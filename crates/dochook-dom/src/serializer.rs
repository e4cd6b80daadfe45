//! HTML serializer.
//!
//! Start tags that were never modified are written from their original source
//! text; modified or created elements are rebuilt from their attribute list.

use std::fmt::Write;

use crate::tree::{Document, Element, NodeId, NodeKind};

impl Document {
    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(4096);
        for &child in self.children(self.root()) {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialize a node and its subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize an element while leaving out some of its own attributes and
    /// direct child elements.
    ///
    /// Only the top-level element is filtered; its descendants are written
    /// as-is. Names are compared ASCII case-insensitively.
    pub fn outer_html_excluding(
        &self,
        id: NodeId,
        skip_attrs: &[&str],
        skip_children: &[&str],
    ) -> String {
        let Some(el) = self.element(id) else {
            return self.outer_html(id);
        };
        let mut out = String::new();
        write_start_tag(el, &mut out, skip_attrs);
        if el.self_closing || el.is_void() {
            return out;
        }
        for &child in self.children(id) {
            let skipped = self
                .element(child)
                .is_some_and(|c| skip_children.iter().any(|name| c.is(name)));
            if !skipped {
                self.write_node(child, &mut out);
            }
        }
        let _ = write!(out, "</{}>", el.name);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Document => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            }
            NodeKind::Element(el) => {
                match &el.source {
                    Some(source) => out.push_str(source),
                    None => write_start_tag(el, out, &[]),
                }
                if el.self_closing || el.is_void() {
                    return;
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                let _ = write!(out, "</{}>", el.name);
            }
            NodeKind::Text(text) | NodeKind::Raw(text) => out.push_str(text),
            NodeKind::Comment(body) => {
                let _ = write!(out, "<!--{body}-->");
            }
        }
    }
}

/// Rebuild a start tag from the attribute list.
fn write_start_tag(el: &Element, out: &mut String, skip_attrs: &[&str]) {
    out.push('<');
    out.push_str(&el.name);
    for attr in &el.attrs {
        if skip_attrs.iter().any(|s| attr.name.eq_ignore_ascii_case(s)) {
            continue;
        }
        let _ = match &attr.value {
            Some(value) => write!(out, r#" {}="{}""#, attr.name, value),
            None => write!(out, " {}", attr.name),
        };
    }
    if el.self_closing {
        out.push_str("/>");
    } else {
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::parse;
    use crate::tree::{Document, NodeId};

    fn find(doc: &Document, name: &str) -> NodeId {
        doc.descendants(doc.root())
            .find(|&id| doc.is_element(id, name))
            .unwrap()
    }

    #[test]
    fn test_untouched_markup_round_trips() {
        let html = concat!(
            "<!DOCTYPE html>\n<html lang=en><head><meta charset=\"utf-8\">",
            "<style>p > a { color: red }</style></head>\n",
            "<body><p class='x'>a &amp; b&nbsp;c<br>d</p>",
            "<!-- note --><details open><summary>s</summary></details>",
            "<svg viewBox=\"0 0 10 10\"><path d=\"M0 0\"/></svg></body></html>"
        );
        let doc = parse(html).unwrap();
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn test_modified_start_tag_is_rebuilt() {
        let mut doc = parse("<svg  width='10'><g></g></svg>").unwrap();
        let svg = find(&doc, "svg");
        doc.set_attr(svg, "role", "image");
        assert_eq!(
            doc.to_html(),
            r#"<svg width="10" role="image"><g></g></svg>"#
        );
    }

    #[test]
    fn test_created_element_is_serialized() {
        let mut doc = parse("<svg><g></g></svg>").unwrap();
        let svg = find(&doc, "svg");
        let title = doc.create_text_element("title", "Flow & more");
        doc.insert_child(svg, 0, title);
        assert_eq!(
            doc.to_html(),
            "<svg><title>Flow &amp; more</title><g></g></svg>"
        );
    }

    #[test]
    fn test_outer_html_excluding() {
        let doc = parse(
            r#"<svg id="a" role="image" tabindex="0"><title>t</title><desc>d</desc><g><title>n</title></g></svg>"#,
        )
        .unwrap();
        let svg = find(&doc, "svg");
        assert_eq!(
            doc.outer_html_excluding(svg, &["role", "tabindex"], &["title", "desc"]),
            r#"<svg id="a"><g><title>n</title></g></svg>"#
        );
    }
}
