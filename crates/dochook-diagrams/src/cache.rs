//! Diagram cache key computation.
//!
//! Provides [`DiagramKey`] for computing the content hash that names rendered
//! artifacts.

use sha2::{Digest, Sha256};

use crate::theme::Theme;

/// Diagram source used as a content-addressed cache key.
///
/// The key depends on the source text only; each theme variant is stored
/// under the same key with a theme suffix.
#[derive(Debug, Clone, Copy)]
pub struct DiagramKey<'a> {
    /// Diagram source exactly as written in the page.
    pub source: &'a str,
}

impl<'a> DiagramKey<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Compute the content hash for this diagram.
    ///
    /// # Hash Format
    ///
    /// Lowercase hex SHA-256 of the source bytes (64 characters).
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Artifact file name for one theme variant: `<hash>_<theme>.svg`.
#[must_use]
pub fn artifact_name(hash: &str, theme: Theme) -> String {
    format!("{hash}_{}.svg", theme.as_str())
}
