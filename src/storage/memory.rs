//! In-memory artifact store for testing and short-lived processes.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CategorizerError, Result};
use crate::storage::ArtifactStore;

/// Keeps artifacts in a shared map.
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    artifacts: Arc<RwLock<HashMap<String, Box<[u8]>>>>,
}

impl MemoryArtifactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.artifacts.read().is_empty()
    }

    /// Total size of all artifacts in bytes.
    pub fn total_size(&self) -> usize {
        self.artifacts.read().values().map(|data| data.len()).sum()
    }

    /// Remove all artifacts.
    pub fn clear(&self) {
        self.artifacts.write().clear();
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn save(&self, id: &str, bytes: &[u8]) -> Result<()> {
        self.artifacts
            .write()
            .insert(id.to_string(), bytes.to_vec().into_boxed_slice());
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Vec<u8>> {
        self.artifacts
            .read()
            .get(id)
            .map(|data| data.to_vec())
            .ok_or_else(|| CategorizerError::not_found(id))
    }

    fn exists(&self, id: &str) -> bool {
        self.artifacts.read().contains_key(id)
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.artifacts.write().remove(id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.artifacts.read().keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
