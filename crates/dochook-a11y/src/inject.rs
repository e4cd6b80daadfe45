//! Accessibility metadata injection into one diagram element.

use dochook_dom::{Document, NodeId};
use sha2::{Digest, Sha256};

/// Attributes set by [`inject`].
pub const INJECTED_ATTRS: &[&str] = &["role", "tabindex", "aria-labelledby"];

/// Child elements created by [`inject`].
pub const INJECTED_CHILDREN: &[&str] = &["title", "desc"];

/// Number of serialized characters fed into the fingerprint.
const FINGERPRINT_PREFIX_CHARS: usize = 200;

/// Number of hex characters kept from the fingerprint digest.
const FINGERPRINT_HEX_LEN: usize = 8;

/// Identifiers assigned by one injection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Injection {
    pub title_id: Option<String>,
    pub desc_id: Option<String>,
}

/// Suffix shared by the generated `title` and `desc` ids of a diagram.
///
/// The element's own `id` when it has one. Otherwise the first 8 hex
/// characters of a SHA-256 over the first 200 characters of its markup,
/// serialized without anything [`inject`] adds. Re-running on an injected
/// element therefore yields the same suffix.
pub fn fingerprint(doc: &Document, svg: NodeId) -> String {
    if let Some(id) = doc
        .element(svg)
        .and_then(|el| el.attr_text("id"))
        .filter(|id| !id.is_empty())
    {
        return id.into_owned();
    }

    let markup = doc.outer_html_excluding(svg, INJECTED_ATTRS, INJECTED_CHILDREN);
    let prefix: String = markup.chars().take(FINGERPRINT_PREFIX_CHARS).collect();
    let digest = hex::encode(Sha256::digest(prefix.as_bytes()));
    digest[..FINGERPRINT_HEX_LEN].to_owned()
}

/// Give `svg` an accessible name and description.
///
/// Existing direct `title`/`desc` children are replaced. Empty strings
/// create no child, and `aria-labelledby` is dropped when neither exists.
/// `role` and `tabindex` are always set.
pub fn inject(doc: &mut Document, svg: NodeId, title: &str, description: &str) -> Injection {
    let suffix = fingerprint(doc, svg);
    inject_with_suffix(doc, svg, &suffix, title, description)
}

/// [`inject`] with a caller-chosen id suffix.
///
/// Used when the fingerprint alone would repeat an id already on the page.
pub fn inject_with_suffix(
    doc: &mut Document,
    svg: NodeId,
    suffix: &str,
    title: &str,
    description: &str,
) -> Injection {

    let stale: Vec<NodeId> = doc
        .children(svg)
        .iter()
        .copied()
        .filter(|&c| {
            doc.element(c)
                .is_some_and(|el| INJECTED_CHILDREN.iter().any(|n| el.is(n)))
        })
        .collect();
    for child in stale {
        doc.detach(child);
    }

    let mut injection = Injection::default();
    let mut next_index = 0;

    if !title.is_empty() {
        let id = format!("svg-title-{suffix}");
        let node = doc.create_text_element("title", title);
        doc.set_attr(node, "id", &id);
        doc.insert_child(svg, next_index, node);
        next_index += 1;
        injection.title_id = Some(id);
    }

    if !description.is_empty() {
        let id = format!("svg-desc-{suffix}");
        let node = doc.create_text_element("desc", description);
        doc.set_attr(node, "id", &id);
        doc.insert_child(svg, next_index, node);
        injection.desc_id = Some(id);
    }

    let labelled_by: Vec<&str> = [&injection.title_id, &injection.desc_id]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();
    if labelled_by.is_empty() {
        doc.remove_attr(svg, "aria-labelledby");
    } else {
        doc.set_attr(svg, "aria-labelledby", &labelled_by.join(" "));
    }

    doc.set_attr(svg, "role", "image");
    doc.set_attr(svg, "tabindex", "0");

    tracing::debug!(suffix = %suffix, "injected diagram metadata");
    injection
}
