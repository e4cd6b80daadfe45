//! Post-render pass over one rendered page.

use std::collections::HashMap;

use dochook_dom::{Document, NodeId};

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::inject::{fingerprint, inject_with_suffix};
use crate::marker::{Marker, contains_keyword};
use crate::resolver::Resolver;

/// Result of processing one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageReport {
    /// Page markup; identical to the input when nothing was injected.
    pub html: String,
    /// Markers matching the grammar.
    pub markers: usize,
    /// Diagrams that received metadata.
    pub injected: usize,
}

impl PageReport {
    fn unchanged(html: &str) -> Self {
        Self {
            html: html.to_owned(),
            markers: 0,
            injected: 0,
        }
    }

    pub fn changed(&self) -> bool {
        self.injected > 0
    }
}

/// Injects marker metadata into the diagrams of rendered pages.
#[derive(Debug, Clone, Default)]
pub struct PostRenderPass {
    resolver: Resolver,
}

impl PostRenderPass {
    #[must_use]
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Process one page.
    ///
    /// Pages without the marker keyword are returned untouched without being
    /// parsed. Markup that fails to parse is returned unchanged with an
    /// [`UnparsableMarkup`](DiagnosticKind::UnparsableMarkup) warning.
    pub fn process(&self, html: &str, page: &str, diagnostics: &mut Diagnostics) -> PageReport {
        if !contains_keyword(html) {
            return PageReport::unchanged(html);
        }

        let mut doc = match dochook_dom::parse(html) {
            Ok(doc) => doc,
            Err(e) => {
                diagnostics.push(
                    page,
                    DiagnosticKind::UnparsableMarkup {
                        reason: e.to_string(),
                    },
                );
                return PageReport::unchanged(html);
            }
        };

        let (markers, injected) = self.inject_markers(&mut doc, page, diagnostics);

        if injected == 0 {
            return PageReport {
                html: html.to_owned(),
                markers,
                injected,
            };
        }

        diagnostics.push(page, DiagnosticKind::Injected { count: injected });
        PageReport {
            html: doc.to_html(),
            markers,
            injected,
        }
    }

    fn inject_markers(
        &self,
        doc: &mut Document,
        page: &str,
        diagnostics: &mut Diagnostics,
    ) -> (usize, usize) {
        let mut markers = 0;
        let mut injected = 0;
        let mut suffixes = SuffixAllocator::default();

        for comment in doc.comments() {
            let Some(marker) = doc.comment(comment).and_then(Marker::parse) else {
                continue;
            };
            markers += 1;

            let resolution = self.resolver.resolve(doc, comment);
            if !resolution.self_describing.is_empty() {
                diagnostics.push(page, DiagnosticKind::SelfDescribingDiagram);
            }
            if resolution.diagrams.is_empty() {
                diagnostics.push(page, DiagnosticKind::marker_without_diagram(&marker.title));
                continue;
            }

            for svg in resolution.diagrams {
                let suffix = suffixes.assign(doc, svg);
                inject_with_suffix(doc, svg, &suffix, &marker.title, &marker.description);
                injected += 1;
            }
        }

        (markers, injected)
    }
}

/// Hands out one id suffix per diagram, unique within a page.
///
/// Diagrams sharing a fingerprint get `-2`, `-3`, ... appended in document
/// order, which a rerun reproduces. A diagram claimed by two markers keeps
/// its first suffix.
#[derive(Default)]
struct SuffixAllocator {
    assigned: HashMap<NodeId, String>,
    seen: HashMap<String, usize>,
}

impl SuffixAllocator {
    fn assign(&mut self, doc: &Document, svg: NodeId) -> String {
        if let Some(suffix) = self.assigned.get(&svg) {
            return suffix.clone();
        }
        let base = fingerprint(doc, svg);
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        let suffix = if *count == 1 {
            base
        } else {
            format!("{base}-{count}")
        };
        self.assigned.insert(svg, suffix.clone());
        suffix
    }
}

/// Process one page with the default resolver.
pub fn process_page(html: &str, page: &str, diagnostics: &mut Diagnostics) -> PageReport {
    PostRenderPass::default().process(html, page, diagnostics)
}
