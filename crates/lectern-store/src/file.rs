//! File-backed store implementation using `tokio::fs`.

use std::path::{Path, PathBuf};

use crate::{SessionStore, StoreError};

/// A [`SessionStore`] backed by a single file on disk.
///
/// The record is the file's entire contents; an absent file is an empty
/// slot. This is the console's localStorage analog — a browser reload
/// loses every in-memory value but the slot survives, so
/// `restore_session` can rebuild the session from it.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store over the given file path.
    ///
    /// Nothing is touched on disk until the first `set`; parent
    /// directories are created then if needed.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    async fn get(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => {
                tracing::debug!(
                    path = %self.path.display(),
                    len = bytes.len(),
                    "session record read"
                );
                Ok(Some(bytes))
            }
            // No file means an empty slot, not a failure.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Read(e)),
        }
    }

    async fn set(&self, record: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(StoreError::Write)?;
        }
        tokio::fs::write(&self.path, record)
            .await
            .map_err(StoreError::Write)?;
        tracing::debug!(
            path = %self.path.display(),
            len = record.len(),
            "session record written"
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(
                    path = %self.path.display(),
                    "session record cleared"
                );
                Ok(())
            }
            // Already empty — clear is idempotent.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Clear(e)),
        }
    }
}
