/// Errors that can occur in the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading the session record failed.
    #[error("failed to read the session record: {0}")]
    Read(#[source] std::io::Error),

    /// Writing the session record failed.
    #[error("failed to write the session record: {0}")]
    Write(#[source] std::io::Error),

    /// Clearing the session record failed.
    #[error("failed to clear the session record: {0}")]
    Clear(#[source] std::io::Error),
}
