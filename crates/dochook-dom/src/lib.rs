//! Lenient HTML tree for rewriting rendered documentation pages.
//!
//! Pages produced by a static site generator are parsed into an arena tree
//! ([`Document`]), adjusted in place, and serialized back. Anything the caller
//! doesn't touch is written out exactly as it was read, so a rewrite pass only
//! changes the elements it means to change.
//!
//! # Example
//!
//! ```
//! let mut doc = dochook_dom::parse("<p><svg></svg></p>").unwrap();
//! let svg = doc
//!     .descendants(doc.root())
//!     .find(|&id| doc.is_element(id, "svg"))
//!     .unwrap();
//! doc.set_attr(svg, "role", "image");
//! assert_eq!(doc.to_html(), r#"<p><svg role="image"></svg></p>"#);
//! ```

mod error;
mod parser;
mod serializer;
mod tree;

pub use error::ParseError;
pub use parser::parse;
pub use tree::{
    Ancestors, Attribute, Descendants, Document, Element, NodeId, NodeKind, escape_attr,
    escape_text,
};
