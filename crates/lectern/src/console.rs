//! `Console` builder and wiring.
//!
//! This is the entry point for embedding Lectern. It ties together all
//! the layers: backend → claims → store → session.

use std::path::PathBuf;
use std::sync::Arc;

use lectern_backend::HttpBackend;
use lectern_session::{Navigator, SessionManager};
use lectern_store::FileStore;

/// The session manager as the console wires it: the one `HttpBackend`
/// serves as both credential exchange and profile resolver, and the
/// file store is the durable slot.
pub type ConsoleSessions<N> =
    SessionManager<Arc<HttpBackend>, Arc<HttpBackend>, FileStore, N>;

/// Builder for configuring a [`Console`].
///
/// # Example
///
/// ```rust,no_run
/// use lectern::prelude::*;
///
/// struct NoopNavigator;
/// impl Navigator for NoopNavigator {
///     fn navigate(&self, route: Route) {
///         println!("→ {}", route.path());
///     }
/// }
///
/// let console = Console::<NoopNavigator>::builder()
///     .backend_url("http://localhost:8085")
///     .store_path(".lectern/session.json")
///     .build(NoopNavigator);
/// ```
pub struct ConsoleBuilder {
    backend_url: String,
    store_path: PathBuf,
}

impl ConsoleBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            backend_url: "http://localhost:8085".to_string(),
            store_path: PathBuf::from(".lectern/session.json"),
        }
    }

    /// Sets the backend's base URL.
    pub fn backend_url(mut self, url: &str) -> Self {
        self.backend_url = url.to_string();
        self
    }

    /// Sets where the persisted session record lives.
    pub fn store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Builds the console with the given navigator.
    pub fn build<N: Navigator>(self, navigator: N) -> Console<N> {
        let backend = Arc::new(HttpBackend::new(self.backend_url));
        let store = FileStore::new(self.store_path);
        tracing::debug!(
            backend = backend.base_url(),
            store = %store.path().display(),
            "console wired"
        );
        let sessions = SessionManager::new(
            Arc::clone(&backend),
            Arc::clone(&backend),
            store,
            navigator,
        );
        Console { backend, sessions }
    }
}

impl Default for ConsoleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A wired console core: one backend client, one session manager.
///
/// Call [`restore_session`](SessionManager::restore_session) once at
/// start-up, then drive logins and subscribe to session state through
/// [`sessions`](Self::sessions).
pub struct Console<N: Navigator> {
    backend: Arc<HttpBackend>,
    sessions: Arc<ConsoleSessions<N>>,
}

impl<N: Navigator> Console<N> {
    /// Creates a new builder.
    pub fn builder() -> ConsoleBuilder {
        ConsoleBuilder::new()
    }

    /// The session lifecycle manager.
    pub fn sessions(&self) -> &Arc<ConsoleSessions<N>> {
        &self.sessions
    }

    /// The backend client, unauthenticated. Fine for `/login` and the
    /// email-availability probe; catalog calls want
    /// [`authorized_backend`](Self::authorized_backend).
    pub fn backend(&self) -> &HttpBackend {
        &self.backend
    }

    /// A backend client carrying the current session's bearer token, or
    /// `None` when logged out.
    pub async fn authorized_backend(&self) -> Option<HttpBackend> {
        self.sessions
            .current()
            .await
            .map(|session| self.backend.with_bearer(session.token))
    }
}
