//! Artifact persistence.
//!
//! Fitted model state is written as opaque byte blobs keyed by an artifact
//! id. [`ArtifactStore`] is the only interface the categorizer depends on,
//! so a directory-backed store and an in-memory store can be swapped freely.
//!
//! # Example
//!
//! ```
//! use message_categorizer::storage::{ArtifactStore, MemoryArtifactStore};
//!
//! # fn main() -> message_categorizer::error::Result<()> {
//! let store = MemoryArtifactStore::new();
//! store.save("model.vectorizer", b"bytes")?;
//! assert_eq!(store.load("model.vectorizer")?, b"bytes");
//! # Ok(())
//! # }
//! ```

pub mod artifact;
pub mod file;
pub mod memory;

pub use artifact::{ArtifactKind, ArtifactMetadata};
pub use file::FileArtifactStore;
pub use memory::MemoryArtifactStore;

use crate::error::Result;

/// A keyed store of artifact blobs.
pub trait ArtifactStore: Send + Sync + std::fmt::Debug {
    /// Write `bytes` under `id`, replacing any previous blob.
    fn save(&self, id: &str, bytes: &[u8]) -> Result<()>;

    /// Read the blob stored under `id`.
    ///
    /// Fails with [`ArtifactNotFound`](crate::error::CategorizerError::ArtifactNotFound)
    /// when nothing is stored under `id`.
    fn load(&self, id: &str) -> Result<Vec<u8>>;

    /// Check if a blob is stored under `id`.
    fn exists(&self, id: &str) -> bool;

    /// Remove the blob stored under `id`. Removing a missing id is not an error.
    fn delete(&self, id: &str) -> Result<()>;

    /// All stored ids, sorted.
    fn list(&self) -> Result<Vec<String>>;
}
