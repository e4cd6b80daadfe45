//! Artifact store for rendered diagrams.
//!
//! Rendered artifacts are addressed by name (a content hash plus a variant
//! suffix, e.g. `3fa1..._light.svg`). An artifact that exists is reused as-is;
//! there is no invalidation beyond "name present". Because names are derived
//! from content, two writers producing the same name write the same bytes and
//! last-writer-wins is harmless.
//!
//! # Implementations
//!
//! - [`DirStore`]: files in a directory on disk, written atomically
//! - [`MemoryStore`]: in-process map, for tests and dry runs
//!
//! # Example
//!
//! ```
//! use dochook_cache::{ArtifactStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! assert!(!store.contains("abc_light.svg"));
//! store.write("abc_light.svg", b"<svg/>").unwrap();
//! assert_eq!(store.read("abc_light.svg"), Some(b"<svg/>".to_vec()));
//! ```

mod dir;
mod memory;

use std::path::PathBuf;

pub use dir::{CACHE_DIR_NAME, DirStore};
pub use memory::MemoryStore;

/// Error writing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem failure while writing `path`.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Artifact names must be a single path component.
    #[error("invalid artifact name: {0:?}")]
    InvalidName(String),
}

/// Named, write-once-per-content storage for rendered artifacts.
pub trait ArtifactStore: Send + Sync {
    /// Whether an artifact with this name already exists.
    fn contains(&self, name: &str) -> bool;

    /// Read an artifact. Returns `None` if it doesn't exist or can't be read.
    fn read(&self, name: &str) -> Option<Vec<u8>>;

    /// Store an artifact, replacing any previous content.
    fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError>;
}

/// Reject names that would escape the store.
pub(crate) fn validate_name(name: &str) -> Result<(), StoreError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(StoreError::InvalidName(name.to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("abc_light.svg").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("..").is_err());
        assert!(validate_name("../escape.svg").is_err());
        assert!(validate_name("nested/name.svg").is_err());
    }
}
