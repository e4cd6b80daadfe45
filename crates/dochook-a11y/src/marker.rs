//! The `diagram-a11y` marker comment.
//!
//! ```text
//! <!-- diagram-a11y: title="Login flow" desc="Steps a user follows to authenticate" -->
//! ```

use std::sync::LazyLock;

use regex::Regex;

/// Keyword identifying a marker, matched case-insensitively.
pub const MARKER_KEYWORD: &str = "diagram-a11y:";

static MARKER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)diagram-a11y:\s*title="([^"]*)"\s+desc="([^"]*)""#)
        .expect("invalid marker regex")
});

/// Title and description carried by a marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub title: String,
    pub description: String,
}

impl Marker {
    /// Parse a comment body. Returns `None` for unrelated comments.
    ///
    /// Values are trimmed and may be empty.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let caps = MARKER_PATTERN.captures(text)?;
        Some(Self {
            title: caps[1].trim().to_owned(),
            description: caps[2].trim().to_owned(),
        })
    }
}

/// Whether `text` mentions the marker keyword in any letter case.
#[must_use]
pub fn contains_keyword(text: &str) -> bool {
    text.to_ascii_lowercase().contains(MARKER_KEYWORD)
}
