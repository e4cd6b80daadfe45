//! Themed Graphviz rendering for documentation builds.
//!
//! Diagram sources are rendered twice, once per [`Theme`], by piping them
//! through `dot -Tsvg`. Artifacts are stored under a content hash of the
//! source, so unchanged diagrams are never rendered again. The page gets a
//! container embedding both variants, with the light one visible by default.
//!
//! # Architecture
//!
//! - [`language`]: fence language tags (`DiagramLanguage`)
//! - [`theme`]: palettes and the styling splice
//! - [`directives`]: inline `accTitle`/`accDescr` metadata
//! - [`graphviz`]: subprocess runner with a timeout
//! - [`renderer`]: `GraphvizRenderer` tying key, store and runner together
//! - [`markdown`]: fence replacement in markdown pages
//!
//! # Example
//!
//! ```
//! use dochook_cache::MemoryStore;
//! use dochook_diagrams::{DotRunner, GraphvizRenderer, RenderError};
//!
//! struct Echo;
//!
//! impl DotRunner for Echo {
//!     fn render(&self, _source: &str) -> Result<Vec<u8>, RenderError> {
//!         Ok(b"<svg/>".to_vec())
//!     }
//! }
//!
//! let renderer = GraphvizRenderer::new(Box::new(MemoryStore::new()))
//!     .with_runner(Box::new(Echo));
//! let rendered = renderer.render("digraph { a -> b }");
//! assert!(rendered.html.contains("graphviz-light"));
//! ```

mod cache;
mod consts;
pub mod directives;
mod embed;
mod error;
pub mod graphviz;
pub mod language;
pub mod markdown;
pub mod renderer;
pub mod theme;

pub use cache::{DiagramKey, artifact_name};
pub use consts::{DEFAULT_COMMAND, DEFAULT_URL_PREFIX};
pub use directives::{AccessibilityMetadata, extract_metadata, strip_directives};
pub use embed::embed_html;
pub use error::RenderError;
pub use graphviz::{DotCommand, DotRunner};
pub use language::DiagramLanguage;
pub use markdown::{MarkdownRender, render_markdown};
pub use renderer::{ArtifactOutcome, GraphvizRenderer, RenderedDiagram, prepare_cache};
pub use theme::{Palette, Theme, apply_theme};
