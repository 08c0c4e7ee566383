//! Directory-backed artifact store.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CategorizerError, Result};
use crate::storage::ArtifactStore;

const TEMP_SUFFIX: &str = ".tmp";

/// Stores each artifact as one file named after its id.
///
/// Writes go to a hidden temporary file that is renamed into place, so a
/// reader never sees a partially written artifact.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
    directory: PathBuf,
}

impl FileArtifactStore {
    /// Open a store rooted at `directory`, creating it if needed.
    pub fn new<P: AsRef<Path>>(directory: P) -> Result<Self> {
        let directory = directory.as_ref().to_path_buf();

        if !directory.exists() {
            fs::create_dir_all(&directory).map_err(|e| {
                CategorizerError::storage(format!("Failed to create directory: {e}"))
            })?;
        }

        if !directory.is_dir() {
            return Err(CategorizerError::storage(format!(
                "Path is not a directory: {}",
                directory.display()
            )));
        }

        Ok(FileArtifactStore { directory })
    }

    /// Root directory.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Full path of the file holding `id`.
    pub fn path_of(&self, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.directory.join(id))
    }
}

/// Ids become file names: no separators, no leading dot, not empty.
fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() || id.starts_with('.') || id.contains(['/', '\\', '\0']) {
        return Err(CategorizerError::storage(format!(
            "Invalid artifact id: {id:?}"
        )));
    }
    Ok(())
}

impl ArtifactStore for FileArtifactStore {
    fn save(&self, id: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path_of(id)?;
        let temp_path = self.directory.join(format!(".{id}{TEMP_SUFFIX}"));

        let write = || -> std::io::Result<()> {
            let mut file = File::create(&temp_path)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&temp_path, &path)
        };
        if let Err(e) = write() {
            let _ = fs::remove_file(&temp_path);
            return Err(CategorizerError::storage(format!(
                "Failed to write artifact {id}: {e}"
            )));
        }

        debug!(id, bytes = bytes.len(), path = %path.display(), "wrote artifact");
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Vec<u8>> {
        let path = self.path_of(id)?;
        fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                CategorizerError::not_found(id)
            } else {
                CategorizerError::storage(format!("Failed to read artifact {id}: {e}"))
            }
        })
    }

    fn exists(&self, id: &str) -> bool {
        self.path_of(id).map(|path| path.is_file()).unwrap_or(false)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_of(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CategorizerError::storage(format!(
                "Failed to delete artifact {id}: {e}"
            ))),
        }
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();

        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !name.starts_with('.') {
                    ids.push(name.to_string());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }
}
