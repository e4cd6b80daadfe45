//! HTML embedding of the two theme variants.

use std::fmt::Write;

use dochook_dom::escape_attr;

use crate::cache::artifact_name;
use crate::consts::FALLBACK_ALT;
use crate::directives::AccessibilityMetadata;
use crate::theme::Theme;

/// Build the container markup referencing both cached variants.
///
/// The light variant is visible by default and the dark variant hidden; a
/// theme switcher on the page toggles them. Each `<object>` carries an `<img>`
/// fallback for browsers that won't embed SVG objects.
#[must_use]
pub fn embed_html(hash: &str, metadata: &AccessibilityMetadata, url_prefix: &str) -> String {
    let mut html = String::from(
        r#"<div class="diagram-container graphviz-diagram" data-diagram-type="graphviz""#,
    );
    if !metadata.title.is_empty() {
        let _ = write!(html, r#" data-acc-title="{}""#, escape_attr(&metadata.title));
    }
    if !metadata.description.is_empty() {
        let _ = write!(
            html,
            r#" data-acc-descr="{}""#,
            escape_attr(&metadata.description)
        );
    }
    html.push_str(">\n");

    let alt = if metadata.title.is_empty() {
        FALLBACK_ALT.to_owned()
    } else {
        escape_attr(&metadata.title)
    };

    for theme in Theme::ALL {
        let url = escape_attr(&format!("{url_prefix}{}", artifact_name(hash, theme)));
        let hidden = match theme {
            Theme::Light => "",
            Theme::Dark => r#" style="display:none;""#,
        };
        let _ = write!(
            html,
            "  <object class=\"diagram-{theme} graphviz-{theme}\" data=\"{url}\" type=\"image/svg+xml\"{hidden}>\
             <img src=\"{url}\" alt=\"{alt}\" /></object>\n"
        );
    }

    html.push_str("</div>");
    html
}
