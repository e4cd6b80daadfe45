//! Inline accessibility directives in diagram sources.
//!
//! Authors can describe a diagram from inside its source:
//!
//! ```text
//! digraph {
//!   // accTitle: Build pipeline
//!   accDescr {
//!     Sources flow through compile,
//!     test and package stages.
//!   }
//!   compile -> test -> package;
//! }
//! ```
//!
//! Directives may sit in a comment or stand bare on their own line. Bare
//! directives aren't DOT syntax, so [`strip_directives`] removes them before
//! the source is handed to Graphviz.

const TITLE_KEY: &str = "accTitle:";
const DESCR_KEY: &str = "accDescr:";
const DESCR_BLOCK: &str = "accDescr";

/// Title and description declared inside a diagram source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessibilityMetadata {
    pub title: String,
    pub description: String,
}

impl AccessibilityMetadata {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty()
    }
}

/// Value following a directive key, with surrounding quotes removed.
fn directive_value(rest: &str) -> String {
    rest.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_owned()
}

/// Opening line of an `accDescr { ... }` block, if `line` is one.
///
/// Returns any text after the brace on the same line.
fn block_opening(line: &str) -> Option<&str> {
    let trimmed = strip_comment_prefix(line.trim());
    let rest = trimmed.strip_prefix(DESCR_BLOCK)?.trim_start();
    rest.strip_prefix('{')
}

fn strip_comment_prefix(line: &str) -> &str {
    line.strip_prefix("//")
        .or_else(|| line.strip_prefix('#'))
        .map_or(line, str::trim_start)
}

/// Extract `accTitle`/`accDescr` metadata from a diagram source.
///
/// Later directives override earlier ones. Missing values are empty.
#[must_use]
pub fn extract_metadata(source: &str) -> AccessibilityMetadata {
    let mut metadata = AccessibilityMetadata::default();
    let mut lines = source.lines();

    while let Some(line) = lines.next() {
        if let Some(opened) = block_opening(line) {
            let mut parts = Vec::new();
            let mut body = opened;
            loop {
                let (text, closed) = match body.find('}') {
                    Some(end) => (&body[..end], true),
                    None => (body, false),
                };
                let text = strip_comment_prefix(text.trim());
                if !text.is_empty() {
                    parts.push(text.to_owned());
                }
                if closed {
                    break;
                }
                match lines.next() {
                    Some(next) => body = next,
                    None => break,
                }
            }
            metadata.description = parts.join(" ");
        } else if let Some((_, rest)) = line.split_once(TITLE_KEY) {
            metadata.title = directive_value(rest);
        } else if let Some((_, rest)) = line.split_once(DESCR_KEY) {
            metadata.description = directive_value(rest);
        }
    }

    tracing::debug!(
        title = %metadata.title,
        description = %metadata.description,
        "extracted diagram metadata"
    );
    metadata
}

/// Remove bare directive lines (not inside a comment) from a source.
///
/// Directives written as `// accTitle: ...` are valid DOT comments and stay.
#[must_use]
pub fn strip_directives(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut in_block = false;

    for line in source.split_inclusive('\n') {
        let trimmed = line.trim();
        if in_block {
            if trimmed.contains('}') {
                in_block = false;
            }
            continue;
        }
        if trimmed.starts_with(TITLE_KEY) || trimmed.starts_with(DESCR_KEY) {
            continue;
        }
        if let Some(rest) = trimmed
            .strip_prefix(DESCR_BLOCK)
            .and_then(|r| r.trim_start().strip_prefix('{'))
        {
            in_block = !rest.contains('}');
            continue;
        }
        out.push_str(line);
    }
    out
}
