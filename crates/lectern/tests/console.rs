//! Integration tests for the wired console: builder, file store, and
//! the session lifecycle end to end (no live backend — the lifecycle
//! paths exercised here never reach HTTP, except the one test that
//! proves an unreachable backend surfaces cleanly).

use std::sync::Mutex;

use lectern::prelude::*;

use tempfile::TempDir;

// =========================================================================
// Helpers
// =========================================================================

#[derive(Default)]
struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

type TestConsole = Console<std::sync::Arc<RecordingNavigator>>;

fn console_in(
    dir: &TempDir,
) -> (TestConsole, std::sync::Arc<RecordingNavigator>) {
    let navigator = std::sync::Arc::new(RecordingNavigator::default());
    let console = Console::<std::sync::Arc<RecordingNavigator>>::builder()
        // Port 1 is never listening — any HTTP call fails fast, which
        // is exactly what these tests want.
        .backend_url("http://127.0.0.1:1")
        .store_path(dir.path().join("session.json"))
        .build(std::sync::Arc::clone(&navigator));
    (console, navigator)
}

// =========================================================================
// Start-up
// =========================================================================

#[tokio::test]
async fn test_restore_on_fresh_store_is_logged_out() {
    let dir = TempDir::new().unwrap();
    let (console, navigator) = console_in(&dir);

    let restored = console.sessions().restore_session().await.unwrap();

    assert!(restored.is_none());
    assert!(console.sessions().current().await.is_none());
    assert!(navigator.routes().is_empty());
    assert!(console.authorized_backend().await.is_none());
}

#[tokio::test]
async fn test_restore_rebuilds_session_from_record_on_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    // A record as a previous process would have persisted it, expiring
    // far in the future.
    std::fs::write(
        &path,
        br#"{
            "subject": "boss@school.edu",
            "roles": ["Admin"],
            "token": "h.p.s",
            "expires_at": 9999999999
        }"#,
    )
    .unwrap();
    let (console, navigator) = console_in(&dir);

    let session = console
        .sessions()
        .restore_session()
        .await
        .unwrap()
        .expect("record is live — should restore");

    assert_eq!(session.subject, "boss@school.edu");
    assert_eq!(session.primary_role(), Some(Role::Admin));
    // Restoring is not a routing decision.
    assert!(navigator.routes().is_empty());
    // The restored token now authorizes catalog calls.
    let authorized = console.authorized_backend().await;
    assert!(authorized.is_some());
}

#[tokio::test]
async fn test_restore_expired_record_clears_the_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(
        &path,
        br#"{
            "subject": "boss@school.edu",
            "roles": ["Admin"],
            "token": "h.p.s",
            "expires_at": 1000
        }"#,
    )
    .unwrap();
    let (console, _navigator) = console_in(&dir);

    let restored = console.sessions().restore_session().await.unwrap();

    assert!(restored.is_none());
    assert!(!path.exists(), "stale record should be cleared from disk");
}

// =========================================================================
// Logout and failure surfaces
// =========================================================================

#[tokio::test]
async fn test_logout_reasserts_cleared_state() {
    let dir = TempDir::new().unwrap();
    let (console, navigator) = console_in(&dir);

    console.sessions().logout().await.unwrap();

    assert!(console.sessions().current().await.is_none());
    assert_eq!(navigator.routes(), vec![Route::AnonymousHome]);
}

#[tokio::test]
async fn test_login_unreachable_backend_surfaces_backend_error() {
    let dir = TempDir::new().unwrap();
    let (console, navigator) = console_in(&dir);

    let result = console
        .sessions()
        .login("boss@school.edu", "secret")
        .await;

    assert!(matches!(result, Err(SessionError::Backend(_))));
    assert!(console.sessions().current().await.is_none());
    assert!(navigator.routes().is_empty());
}
