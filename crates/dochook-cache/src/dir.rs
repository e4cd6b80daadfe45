//! Directory-backed artifact store.
//!
//! Each artifact is one file directly inside the store directory:
//!
//! ```text
//! {site}/.diagram_cache/
//! +-- 3fa1..._light.svg
//! +-- 3fa1..._dark.svg
//! ```
//!
//! Writes go to a temporary file in the same directory and are renamed into
//! place, so a concurrent reader never sees a partially written artifact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::{ArtifactStore, StoreError, validate_name};

/// Name of the cache directory under the site output root.
pub const CACHE_DIR_NAME: &str = ".diagram_cache";

/// [`ArtifactStore`] rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Create a store at `root`. The directory is created on first write.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Store for the standard cache directory under a site output root.
    #[must_use]
    pub fn for_site(site_dir: &Path) -> Self {
        Self::new(site_dir.join(CACHE_DIR_NAME))
    }

    /// Directory holding the artifacts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path an artifact is (or would be) stored at.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Create the store directory if it doesn't exist yet.
    pub fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|source| StoreError::Io {
            path: self.root.clone(),
            source,
        })
    }
}

impl ArtifactStore for DirStore {
    fn contains(&self, name: &str) -> bool {
        validate_name(name).is_ok() && self.path(name).is_file()
    }

    fn read(&self, name: &str) -> Option<Vec<u8>> {
        validate_name(name).ok()?;
        fs::read(self.path(name)).ok()
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        validate_name(name)?;
        self.ensure_dir()?;

        let path = self.path(name);
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.root).map_err(io_err)?;
        tmp.write_all(data).map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        tracing::debug!(artifact = %path.display(), bytes = data.len(), "stored artifact");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let store = DirStore::for_site(tmp.path());

        store.write("abc_light.svg", b"<svg/>").unwrap();

        assert!(store.contains("abc_light.svg"));
        assert_eq!(store.read("abc_light.svg"), Some(b"<svg/>".to_vec()));
        assert_eq!(
            fs::read(tmp.path().join(".diagram_cache/abc_light.svg")).unwrap(),
            b"<svg/>"
        );
    }

    #[test]
    fn test_missing_artifact() {
        let tmp = TempDir::new().unwrap();
        let store = DirStore::for_site(tmp.path());

        assert!(!store.contains("nope.svg"));
        assert_eq!(store.read("nope.svg"), None);
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let tmp = TempDir::new().unwrap();
        let store = DirStore::new(tmp.path().join("cache"));

        store.write("k.svg", b"first").unwrap();
        store.write("k.svg", b"second").unwrap();

        assert_eq!(store.read("k.svg"), Some(b"second".to_vec()));
    }

    #[test]
    fn test_write_creates_nested_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("deeply/nested/cache");
        let store = DirStore::new(root.clone());

        assert!(!root.exists());
        store.write("k.svg", b"data").unwrap();
        assert!(root.join("k.svg").is_file());
    }

    #[test]
    fn test_ensure_dir() {
        let tmp = TempDir::new().unwrap();
        let store = DirStore::for_site(tmp.path());

        store.ensure_dir().unwrap();
        store.ensure_dir().unwrap();
        assert!(tmp.path().join(CACHE_DIR_NAME).is_dir());
    }

    #[test]
    fn test_rejects_path_traversal() {
        let tmp = TempDir::new().unwrap();
        let store = DirStore::new(tmp.path().join("cache"));

        let err = store.write("../outside.svg", b"x").unwrap_err();
        assert!(matches!(err, StoreError::InvalidName(_)));
        assert!(!store.contains("../outside.svg"));
        assert!(!tmp.path().join("outside.svg").exists());
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let tmp = TempDir::new().unwrap();
        let store = DirStore::new(tmp.path().join("cache"));

        store.write("a.svg", b"a").unwrap();
        store.write("b.svg", b"b").unwrap();

        let mut names: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["a.svg", "b.svg"]);
    }
}
