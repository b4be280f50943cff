//! Error types for the REST binding.

/// Errors that can occur talking to the backend.
///
/// Two failure worlds are kept apart on purpose: `Status` means the
/// backend answered and said no (the request reached it), while
/// `Transport` means the request never completed. Callers map the
/// distinction onto the session taxonomy — a rejected login versus an
/// unreachable backend read very differently to the user.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("backend returned status {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body, as far as it could be read.
        message: String,
    },

    /// The request never completed (connection refused, DNS, timeout).
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered 2xx but the body was not the expected JSON.
    #[error("response body was not the expected shape: {0}")]
    Decode(#[source] reqwest::Error),
}

impl BackendError {
    /// The HTTP status code, when the backend answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
