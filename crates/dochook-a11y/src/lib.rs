//! Accessibility metadata for rendered diagrams.
//!
//! Authors put a marker comment right above a diagram:
//!
//! ````markdown
//! <!-- diagram-a11y: title="Login flow" desc="Steps a user follows to authenticate" -->
//! ```plantuml
//! ...
//! ```
//! ````
//!
//! Two passes act on it:
//!
//! - [`lint_markdown`] runs on the markdown source before rendering and
//!   counts diagram fences that lack a marker.
//! - [`process_page`] runs on the rendered HTML, resolves each marker to the
//!   `<svg>` elements that follow it, and gives them a `<title>`, `<desc>`,
//!   `role`, `tabindex` and `aria-labelledby`.
//!
//! Both passes report through an explicit [`Diagnostics`] collector and never
//! fail: problems become warnings and the page is passed through.
//!
//! # Example
//!
//! ```
//! use dochook_a11y::{Diagnostics, process_page};
//!
//! let html = r#"<!-- diagram-a11y: title="Flow" desc="" --><svg id="f"></svg>"#;
//! let mut diagnostics = Diagnostics::new();
//! let report = process_page(html, "flow.md", &mut diagnostics);
//!
//! assert_eq!(report.injected, 1);
//! assert!(report.html.contains(r#"<title id="svg-title-f">Flow</title>"#));
//! ```

mod diagnostics;
mod inject;
mod lint;
mod marker;
mod page;
mod resolver;
pub mod shapes;

pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use inject::{
    INJECTED_ATTRS, INJECTED_CHILDREN, Injection, fingerprint, inject, inject_with_suffix,
};
pub use lint::{LintReport, lint_markdown};
pub use marker::{MARKER_KEYWORD, Marker, contains_keyword};
pub use page::{PageReport, PostRenderPass, process_page};
pub use resolver::{DEFAULT_LOOKAHEAD, Resolution, Resolver};
pub use shapes::{DEFAULT_WRAPPER_SHAPES, ShapeRule, WrapperShape};
