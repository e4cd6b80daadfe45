//! Marker-to-diagram resolution.
//!
//! Starting at a marker comment, the resolver visits the next `lookahead`
//! elements in document order. A visited `<svg>` is claimed directly; a
//! visited container has all of its descendant `<svg>`s claimed, after which
//! the wrapper-shape table decides whether the scan ends there.

use dochook_dom::{Document, NodeId};

use crate::shapes::{
    CONTAINER_TAGS, DEFAULT_WRAPPER_SHAPES, DIAGRAM_TAG, SELF_DESCRIBING_CLASSES, WrapperShape,
    has_self_describing_ancestor,
};

/// Default number of elements inspected after a marker.
pub const DEFAULT_LOOKAHEAD: usize = 10;

/// Diagrams found for one marker, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Diagrams the marker describes.
    pub diagrams: Vec<NodeId>,
    /// Diagrams in range that manage their own accessible name.
    pub self_describing: Vec<NodeId>,
}

impl Resolution {
    fn claim(&mut self, doc: &Document, id: NodeId, self_describing: &[&str]) {
        let list = if has_self_describing_ancestor(doc, id, self_describing) {
            &mut self.self_describing
        } else {
            &mut self.diagrams
        };
        if !list.contains(&id) {
            list.push(id);
        }
    }
}

/// Resolves markers to the diagrams following them.
#[derive(Debug, Clone)]
pub struct Resolver {
    lookahead: usize,
    shapes: Vec<WrapperShape>,
    self_describing: Vec<&'static str>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            shapes: DEFAULT_WRAPPER_SHAPES.to_vec(),
            self_describing: SELF_DESCRIBING_CLASSES.to_vec(),
        }
    }
}

impl Resolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how many elements after the marker are inspected.
    #[must_use]
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Add a wrapper shape after the built-in ones.
    #[must_use]
    pub fn with_shape(mut self, shape: WrapperShape) -> Self {
        self.shapes.push(shape);
        self
    }

    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// Whether `id` sits inside a self-describing renderer's wrapper.
    pub fn is_self_describing(&self, doc: &Document, id: NodeId) -> bool {
        has_self_describing_ancestor(doc, id, &self.self_describing)
    }

    /// Find the diagrams described by the marker at `marker`.
    pub fn resolve(&self, doc: &Document, marker: NodeId) -> Resolution {
        let mut resolution = Resolution::default();
        let mut current = marker;

        for _ in 0..self.lookahead {
            let Some(next) = doc.next_element(current) else {
                break;
            };
            current = next;
            let Some(el) = doc.element(next) else {
                continue;
            };

            if el.is(DIAGRAM_TAG) {
                resolution.claim(doc, next, &self.self_describing);
            }

            if CONTAINER_TAGS.iter().any(|tag| el.is(tag)) {
                let nested: Vec<NodeId> = doc
                    .descendants(next)
                    .filter(|&d| doc.is_element(d, DIAGRAM_TAG))
                    .collect();
                for svg in nested {
                    resolution.claim(doc, svg, &self.self_describing);
                }

                let found = resolution.diagrams.len();
                if let Some(shape) = self.shapes.iter().find(|s| s.closes(doc, next, found)) {
                    tracing::debug!(shape = shape.name, "wrapper shape closes marker scan");
                    break;
                }
            }
        }

        resolution
    }
}
