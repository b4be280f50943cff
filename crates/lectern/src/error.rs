//! Unified error type for the Lectern console core.

use lectern_backend::BackendError;
use lectern_claims::TokenError;
use lectern_session::SessionError;
use lectern_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `lectern` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum LecternError {
    /// A token-decoding error (malformed bearer token).
    #[error(transparent)]
    Token(#[from] TokenError),

    /// A persistence error (the session record slot).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session lifecycle error (auth, profile, expiry plumbing).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A catalog/REST error (search, CRUD, enrollment).
    #[error(transparent)]
    Backend(#[from] BackendError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_token_error() {
        let err = TokenError::Structure;
        let lectern_err: LecternError = err.into();
        assert!(matches!(lectern_err, LecternError::Token(_)));
        assert!(lectern_err.to_string().contains("three-part"));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AuthenticationFailed("nope".into());
        let lectern_err: LecternError = err.into();
        assert!(matches!(lectern_err, LecternError::Session(_)));
        assert!(lectern_err.to_string().contains("nope"));
    }

    #[test]
    fn test_from_backend_error() {
        let err = BackendError::Status {
            status: 418,
            message: "teapot".into(),
        };
        let lectern_err: LecternError = err.into();
        assert!(matches!(lectern_err, LecternError::Backend(_)));
    }
}
