//! Known wrapper shapes emitted by diagram renderers.
//!
//! The resolver scans forward from a marker and claims diagrams inside
//! container elements. A [`WrapperShape`] recognizes a container as the
//! complete output for one diagram, which ends the scan so the marker can't
//! claim a later diagram that belongs to the next marker.

use dochook_dom::{Document, NodeId};

/// Elements whose descendants are searched for diagrams.
pub const CONTAINER_TAGS: &[&str] = &["div", "p", "section", "article"];

/// Element name of a diagram.
pub const DIAGRAM_TAG: &str = "svg";

/// Class tokens of renderers that set the accessible name themselves.
pub const SELF_DESCRIBING_CLASSES: &[&str] = &["mermaid"];

/// How a wrapper shape is recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeRule {
    /// The container has this exact class token.
    ClassToken(&'static str),
    /// The container has a class token containing `class`, and some
    /// descendant has a class token containing one of `variants`.
    ThemedVariants {
        class: &'static str,
        variants: &'static [&'static str],
    },
    /// The container is this element and a diagram was already found.
    ElementAfterDiagram(&'static str),
}

/// A named container signature that closes the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapperShape {
    pub name: &'static str,
    pub rule: ShapeRule,
}

/// Wrapper shapes of the renderers used with these hooks.
pub const DEFAULT_WRAPPER_SHAPES: &[WrapperShape] = &[
    WrapperShape {
        name: "plantuml",
        rule: ShapeRule::ClassToken("puml-container"),
    },
    WrapperShape {
        name: "graphviz-themed",
        rule: ShapeRule::ThemedVariants {
            class: "graphviz",
            variants: &["graphviz-light", "graphviz-dark"],
        },
    },
    WrapperShape {
        name: "graphviz-single",
        rule: ShapeRule::ElementAfterDiagram("p"),
    },
];

impl WrapperShape {
    /// Whether `container` matches this shape, given `found` diagrams so far.
    #[must_use]
    pub fn closes(&self, doc: &Document, container: NodeId, found: usize) -> bool {
        let Some(el) = doc.element(container) else {
            return false;
        };
        match self.rule {
            ShapeRule::ClassToken(token) => el.has_class(token),
            ShapeRule::ThemedVariants { class, variants } => {
                el.classes().any(|c| c.contains(class))
                    && doc.descendants(container).any(|d| {
                        doc.element(d).is_some_and(|e| {
                            e.classes().any(|c| variants.iter().any(|v| c.contains(v)))
                        })
                    })
            }
            ShapeRule::ElementAfterDiagram(name) => el.is(name) && found > 0,
        }
    }
}

/// Whether any ancestor of `id` carries one of `classes`.
#[must_use]
pub fn has_self_describing_ancestor(doc: &Document, id: NodeId, classes: &[&str]) -> bool {
    doc.ancestors(id).any(|a| {
        doc.element(a)
            .is_some_and(|el| classes.iter().any(|c| el.has_class(c)))
    })
}
