//! In-memory artifact store.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::{ArtifactStore, StoreError, validate_name};

/// [`ArtifactStore`] backed by a map. Nothing touches the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactStore for MemoryStore {
    fn contains(&self, name: &str) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    fn read(&self, name: &str) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn write(&self, name: &str, data: &[u8]) -> Result<(), StoreError> {
        validate_name(name)?;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.write("a_dark.svg", b"dark").unwrap();

        assert!(store.contains("a_dark.svg"));
        assert!(!store.contains("a_light.svg"));
        assert_eq!(store.read("a_dark.svg"), Some(b"dark".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_rejects_bad_names() {
        let store = MemoryStore::new();
        assert!(store.write("a/b.svg", b"x").is_err());
        assert!(store.is_empty());
    }
}
