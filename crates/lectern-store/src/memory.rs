//! In-memory store implementation for tests and demos.

use tokio::sync::Mutex;

use crate::{SessionStore, StoreError};

/// A [`SessionStore`] that holds the record in process memory.
///
/// Does NOT survive a restart — that is the point: tests and demos can
/// simulate a fresh process by constructing a new `MemoryStore`, and
/// simulate a reload by sharing one behind an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    async fn get(&self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.slot.lock().await.clone())
    }

    async fn set(&self, record: &[u8]) -> Result<(), StoreError> {
        *self.slot.lock().await = Some(record.to_vec());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().await = None;
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
