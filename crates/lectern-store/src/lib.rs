//! Persistence layer for Lectern's session record.
//!
//! Provides the [`SessionStore`] trait: a durable slot holding at most
//! ONE serialized session record, surviving process restarts. This is
//! what lets the console reconstruct a live session after a reload — the
//! process restarts from zero in-memory state and reads the slot back.
//!
//! The store deals in opaque bytes. It does not know the record's
//! schema; the session manager owns serialization and is the slot's sole
//! writer. Single-process access only — there is deliberately no
//! cross-process locking contract.
//!
//! # Feature Flags
//!
//! - `file` (default) — [`FileStore`], a single-file implementation
//!
//! [`MemoryStore`] is always available for tests and demos.

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "file")]
mod file;
mod memory;

pub use error::StoreError;
#[cfg(feature = "file")]
pub use file::FileStore;
pub use memory::MemoryStore;

/// A durable slot for one serialized session record.
///
/// All three operations are idempotent from the caller's point of view:
/// `get` on an empty slot is `None` (not an error), `clear` on an empty
/// slot succeeds, and `set` overwrites whatever was there.
pub trait SessionStore: Send + Sync + 'static {
    /// Reads the current record, or `None` if the slot is empty.
    fn get(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>, StoreError>>
    + Send;

    /// Writes a record, replacing any previous one.
    fn set(
        &self,
        record: &[u8],
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Empties the slot. Succeeds if it was already empty.
    fn clear(
        &self,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// A shared store is still a store. This lets a caller keep a handle to
/// the same slot the session manager writes (demos and tests simulate a
/// process restart by handing the same `Arc` to a fresh manager).
impl<S: SessionStore> SessionStore for std::sync::Arc<S> {
    async fn get(&self) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get().await
    }

    async fn set(&self, record: &[u8]) -> Result<(), StoreError> {
        (**self).set(record).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        (**self).clear().await
    }
}
