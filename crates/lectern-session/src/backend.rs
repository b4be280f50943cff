//! Backend hooks: the two external calls the session lifecycle needs.
//!
//! The session manager does not speak HTTP itself. It consumes two
//! traits — one to exchange credentials for a bearer token, one to look
//! up the role-specific profile behind a token's subject — and the
//! `lectern-backend` crate provides the REST implementation. Tests and
//! demos provide fakes.
//!
//! Neither hook is ever retried by the manager: a credential failure is
//! surfaced to the user, and a profile failure leaves the profile-less
//! session live (see `SessionManager::login`).

use lectern_model::{Instructor, Student};

use crate::SessionError;

/// Exchanges credentials for a bearer token.
///
/// # Trait bounds
///
/// - `Send + Sync` → the implementation is shared with spawned tasks
///   (the expiry timer lives on the runtime).
/// - `'static` → it owns its data; it lives as long as the manager.
///
/// # Example
///
/// ```rust
/// use lectern_session::{CredentialExchange, SessionError};
///
/// /// Accepts one hard-coded user. Only for demos and tests.
/// struct FixedExchange {
///     token: String,
/// }
///
/// impl CredentialExchange for FixedExchange {
///     async fn exchange(
///         &self,
///         username: &str,
///         _password: &str,
///     ) -> Result<String, SessionError> {
///         if username == "admin@school.edu" {
///             Ok(self.token.clone())
///         } else {
///             Err(SessionError::AuthenticationFailed(
///                 "unknown user".into(),
///             ))
///         }
///     }
/// }
/// ```
pub trait CredentialExchange: Send + Sync + 'static {
    /// Sends the credentials to the backend and returns the raw bearer
    /// token string on success.
    ///
    /// # Errors
    /// - [`SessionError::AuthenticationFailed`] — the backend rejected
    ///   the credentials (any non-success response)
    /// - [`SessionError::Backend`] — the backend was unreachable
    fn exchange(
        &self,
        username: &str,
        password: &str,
    ) -> impl std::future::Future<Output = Result<String, SessionError>> + Send;
}

/// Looks up the role-specific profile behind a subject identity.
///
/// One backend lookup by the login email carried in the token's `sub`
/// claim. The two methods encode the role statically — the manager picks
/// which to call from the session's primary role, and admins call
/// neither.
pub trait ProfileResolver: Send + Sync + 'static {
    /// Fetches the student record whose login email is `subject`.
    ///
    /// # Errors
    /// - [`SessionError::ProfileNotFound`] — no matching record
    /// - [`SessionError::Backend`] — the backend was unreachable
    fn resolve_student(
        &self,
        subject: &str,
    ) -> impl std::future::Future<Output = Result<Student, SessionError>> + Send;

    /// Fetches the instructor record whose login email is `subject`.
    ///
    /// Same error contract as [`resolve_student`](Self::resolve_student).
    fn resolve_instructor(
        &self,
        subject: &str,
    ) -> impl std::future::Future<Output = Result<Instructor, SessionError>> + Send;
}

/// A shared exchange is still an exchange. The REST binding serves both
/// the session manager and the catalog plumbing, so callers hand the
/// manager an `Arc` of it and keep one themselves.
impl<X: CredentialExchange> CredentialExchange for std::sync::Arc<X> {
    async fn exchange(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, SessionError> {
        (**self).exchange(username, password).await
    }
}

/// Same sharing story as [`CredentialExchange`].
impl<R: ProfileResolver> ProfileResolver for std::sync::Arc<R> {
    async fn resolve_student(
        &self,
        subject: &str,
    ) -> Result<Student, SessionError> {
        (**self).resolve_student(subject).await
    }

    async fn resolve_instructor(
        &self,
        subject: &str,
    ) -> Result<Instructor, SessionError> {
        (**self).resolve_instructor(subject).await
    }
}
