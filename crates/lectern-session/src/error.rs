//! Error types for the session layer.

use lectern_claims::{Role, TokenError};
use lectern_store::StoreError;

/// Errors that can occur during the session lifecycle.
///
/// The taxonomy matters more than usual here because the session manager
/// reacts differently per class: credential and token failures abort the
/// login attempt entirely, profile failures leave a degraded-but-live
/// session behind, and store failures propagate without ever keeping a
/// dead session alive.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The backend rejected the credentials. Fatal to the attempt; no
    /// session is created. Never retried — the user retypes their
    /// password, the console does not guess.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The backend returned a token this console cannot decode. Treated
    /// exactly like rejected credentials, plus a full teardown of any
    /// previous session state.
    #[error(transparent)]
    MalformedToken(#[from] TokenError),

    /// The backend has no profile for a validly issued token's subject.
    /// Should not occur, but is handled, not assumed impossible: the
    /// profile-less session stays live.
    #[error("no {role} profile found for {subject}")]
    ProfileNotFound { role: Role, subject: String },

    /// A network-level failure talking to the backend. Transient from
    /// the network's point of view, but never retried by this layer.
    #[error("backend request failed: {0}")]
    Backend(String),

    /// The persistence slot failed (disk I/O).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The session could not be serialized for persistence.
    #[error("failed to encode the session record: {0}")]
    Encode(#[source] serde_json::Error),
}
