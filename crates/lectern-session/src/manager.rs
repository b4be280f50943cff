//! The session manager: owns the one process-wide session and its
//! lifecycle.
//!
//! This is the central piece of the console core. It's responsible for:
//! - Exchanging credentials for a token and building a session from it
//! - Resolving the role-specific profile and replacing the session
//! - Persisting the session on every change, and rebuilding it from the
//!   persisted record after a process restart
//! - Broadcasting every session transition to observers
//! - Arming ONE expiry timer and tearing the session down when it fires
//!
//! ## Lifecycle
//!
//! ```text
//! login() ───→ [Active, no profile] ───→ [Active, profile attached]
//!                  │        ▲                      │
//!                  │        └── restore_session()  │
//!                  ▼                               ▼
//!              logout() / expiry timer ───→ [LoggedOut]
//! ```
//!
//! # Concurrency note
//!
//! Everything runs cooperatively on the Tokio runtime — there is no
//! preemption, but there ARE suspension points (the credential exchange,
//! the profile fetch, store I/O, the timer's wait), and a `logout` can
//! interleave at any of them. Two mechanisms keep that safe:
//!
//! - Every state **commit** (swap the session, write/clear the store,
//!   publish) happens while holding the state lock, so observers see
//!   transitions in commit order and a half-finished commit can never
//!   interleave with another.
//! - Every in-flight continuation (a profile resolution, an armed
//!   timer) captures the **generation** it was started under. The
//!   generation bumps on every install/clear, so a continuation whose
//!   world has moved on discards itself instead of resurrecting a
//!   logged-out session.

use std::sync::{Arc, Weak};

use chrono::Utc;
use lectern_claims::Role;
use lectern_store::SessionStore;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;

use crate::{
    CredentialExchange, Navigator, ProfileResolver, Route, Session,
    SessionError,
};

/// Capacity of the broadcast channel behind [`SessionManager::subscribe`].
///
/// Session transitions are rare (a handful per login), so a small buffer
/// is plenty; a receiver would have to ignore 16 transitions in a row to
/// lag out.
const SESSION_CHANNEL_CAPACITY: usize = 16;

/// Mutable lifecycle state, all behind one lock.
struct LifecycleState {
    /// The current session. `None` is the LoggedOut state.
    session: Option<Session>,

    /// Bumped on every install and every clear. In-flight continuations
    /// compare against this before applying their result.
    generation: u64,

    /// The armed expiry timer, if any. Invariant: at most one — arming
    /// always cancels the previous handle first.
    timer: Option<JoinHandle<()>>,
}

/// Owns the single session value, the expiry timer, and the
/// role-dispatch policy.
///
/// One instance per process. [`new`](Self::new) hands back an [`Arc`]:
/// the expiry timer task keeps a weak reference back to the manager, so
/// an armed timer never keeps a dropped manager alive.
///
/// Generic over its four collaborators so the whole lifecycle runs
/// unchanged against the real REST binding or a test fake:
/// - `X` exchanges credentials for a token
/// - `R` resolves student/instructor profiles
/// - `S` is the durable record slot
/// - `N` receives routing decisions
pub struct SessionManager<X, R, S, N>
where
    X: CredentialExchange,
    R: ProfileResolver,
    S: SessionStore,
    N: Navigator,
{
    /// Back-reference handed to spawned timer tasks.
    weak: Weak<SessionManager<X, R, S, N>>,
    exchange: X,
    resolver: R,
    store: S,
    navigator: N,
    state: Mutex<LifecycleState>,
    publisher: broadcast::Sender<Option<Session>>,
}

impl<X, R, S, N> SessionManager<X, R, S, N>
where
    X: CredentialExchange,
    R: ProfileResolver,
    S: SessionStore,
    N: Navigator,
{
    /// Creates a manager in the LoggedOut state.
    pub fn new(
        exchange: X,
        resolver: R,
        store: S,
        navigator: N,
    ) -> Arc<Self> {
        let (publisher, _) =
            broadcast::channel(SESSION_CHANNEL_CAPACITY);
        Arc::new_cyclic(|weak| Self {
            weak: weak.clone(),
            exchange,
            resolver,
            store,
            navigator,
            state: Mutex::new(LifecycleState {
                session: None,
                generation: 0,
                timer: None,
            }),
            publisher,
        })
    }

    /// The current session, or `None` when logged out.
    pub async fn current(&self) -> Option<Session> {
        self.state.lock().await.session.clone()
    }

    /// Subscribes to session transitions.
    ///
    /// Every transition from this point on is delivered in order:
    /// `Some(provisional)`, `Some(augmented)`, `None`, ... Transitions
    /// are never batched — a student login always delivers the
    /// profile-less state before the profile-populated one. The state at
    /// subscription time is not replayed; read
    /// [`current`](Self::current) for that.
    pub fn subscribe(&self) -> broadcast::Receiver<Option<Session>> {
        self.publisher.subscribe()
    }

    // -- Login --------------------------------------------------------------

    /// Logs in: exchanges credentials for a token and builds a live,
    /// persisted, time-bounded session from it.
    ///
    /// The provisional (profile-less) session is persisted, armed, and
    /// published first. For instructors and students the profile is then
    /// resolved and the session **replaced** with an augmented copy —
    /// re-persisted and re-published, timer untouched — before the
    /// role's route is signalled (the route needs the resolved id).
    /// Admins skip the profile step and route immediately.
    ///
    /// # Errors
    /// - [`SessionError::AuthenticationFailed`] — credentials rejected;
    ///   no session is created.
    /// - [`SessionError::MalformedToken`] — the returned token doesn't
    ///   decode; fatal, and any previous session is torn down.
    /// - [`SessionError::ProfileNotFound`] / [`SessionError::Backend`]
    ///   — the profile step failed. NOT fatal: the provisional session
    ///   stays live (observe it via [`current`](Self::current)); only
    ///   the navigation past the generic authenticated state is skipped.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, SessionError> {
        tracing::debug!(username, "exchanging credentials");
        let token = self.exchange.exchange(username, password).await?;

        let claims = match lectern_claims::decode(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "backend returned an undecodable token"
                );
                // Fatal: same teardown as an explicit logout, and no
                // session is created from this attempt.
                self.logout().await?;
                return Err(SessionError::MalformedToken(e));
            }
        };

        let provisional = Session::from_token(claims, token);
        tracing::info!(
            subject = %provisional.subject,
            role = ?provisional.primary_role(),
            expires_at = %provisional.expires_at,
            "session created"
        );
        let generation = self.install(provisional.clone()).await?;

        match provisional.primary_role() {
            Some(Role::Admin) => {
                // No profile to fetch — the provisional session is
                // already final.
                self.navigator.navigate(Route::AdminHome);
                Ok(provisional)
            }
            Some(Role::Instructor) => {
                let instructor = match self
                    .resolver
                    .resolve_instructor(&provisional.subject)
                    .await
                {
                    Ok(instructor) => instructor,
                    Err(e) => {
                        tracing::warn!(
                            subject = %provisional.subject,
                            error = %e,
                            "instructor profile resolution failed — \
                             session stays profile-less"
                        );
                        return Err(e);
                    }
                };
                let id = instructor.instructor_id;
                match self
                    .augment(generation, |s| s.with_instructor(instructor))
                    .await?
                {
                    Some(augmented) => {
                        self.navigator
                            .navigate(Route::InstructorCourses(id));
                        Ok(augmented)
                    }
                    // Logged out while the fetch was in flight: the
                    // resolved profile is discarded, nothing navigates.
                    None => Ok(provisional),
                }
            }
            Some(Role::Student) => {
                let student = match self
                    .resolver
                    .resolve_student(&provisional.subject)
                    .await
                {
                    Ok(student) => student,
                    Err(e) => {
                        tracing::warn!(
                            subject = %provisional.subject,
                            error = %e,
                            "student profile resolution failed — \
                             session stays profile-less"
                        );
                        return Err(e);
                    }
                };
                let id = student.student_id;
                match self
                    .augment(generation, |s| s.with_student(student))
                    .await?
                {
                    Some(augmented) => {
                        self.navigator
                            .navigate(Route::StudentCourses(id));
                        Ok(augmented)
                    }
                    None => Ok(provisional),
                }
            }
            // decode() rejects empty role sets, so every session has a
            // primary role; nothing to dispatch if that ever changes.
            None => Ok(provisional),
        }
    }

    // -- Restore ------------------------------------------------------------

    /// Rebuilds the session from the persisted record. Call exactly once
    /// at process start.
    ///
    /// Returns `None` (LoggedOut) when the slot is empty, when the
    /// record is unreadable, or when its expiry is no longer strictly in
    /// the future — the latter two also clear the slot. Otherwise the
    /// session is rebuilt **verbatim** (profiles included), the timer is
    /// re-armed for the remaining window, and the session is published.
    ///
    /// Never contacts the backend, and never navigates — restoring is
    /// not a routing decision.
    pub async fn restore_session(
        &self,
    ) -> Result<Option<Session>, SessionError> {
        let Some(bytes) = self.store.get().await? else {
            tracing::debug!("no persisted session record");
            return Ok(None);
        };

        let session: Session = match serde_json::from_slice(&bytes) {
            Ok(session) => session,
            Err(e) => {
                // An unreadable record gets the stale-record treatment:
                // cleared and ignored, not surfaced as an error.
                tracing::warn!(
                    error = %e,
                    "persisted session record is unreadable — clearing"
                );
                self.store.clear().await?;
                return Ok(None);
            }
        };

        if session.is_expired(Utc::now()) {
            tracing::info!(
                subject = %session.subject,
                expired_at = %session.expires_at,
                "persisted session already expired — clearing"
            );
            self.store.clear().await?;
            return Ok(None);
        }

        {
            let mut state = self.state.lock().await;
            state.generation += 1;
            let generation = state.generation;
            self.arm_timer(&mut state, &session, generation);
            state.session = Some(session.clone());
            let _ = self.publisher.send(Some(session.clone()));
        }

        tracing::info!(
            subject = %session.subject,
            role = ?session.primary_role(),
            "session restored from persisted record"
        );
        Ok(Some(session))
    }

    // -- Logout -------------------------------------------------------------

    /// Logs out: clears the persisted record, cancels the timer, drops
    /// the in-memory session, publishes the cleared state, and routes to
    /// the anonymous landing view.
    ///
    /// Idempotent — calling it while logged out re-asserts the cleared
    /// state and is otherwise a no-op.
    ///
    /// # Errors
    /// [`SessionError::Store`] if clearing the slot fails. The in-memory
    /// teardown has already happened by then: a failing disk can not
    /// keep a session alive.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let (had_session, cleared) = {
            let mut state = self.state.lock().await;
            if let Some(timer) = state.timer.take() {
                timer.abort();
            }
            let had_session = state.session.take().is_some();
            state.generation += 1;
            let cleared = self.store.clear().await;
            let _ = self.publisher.send(None);
            (had_session, cleared)
        };

        self.navigator.navigate(Route::AnonymousHome);
        if had_session {
            tracing::info!("logged out");
        } else {
            tracing::debug!("logout with no active session");
        }
        cleared.map_err(SessionError::from)
    }

    // -- Internals ----------------------------------------------------------

    /// Commits a freshly created session: persists it, bumps the
    /// generation, arms the timer, and publishes — all under the state
    /// lock. Returns the generation the session was installed at.
    async fn install(
        &self,
        session: Session,
    ) -> Result<u64, SessionError> {
        let bytes =
            serde_json::to_vec(&session).map_err(SessionError::Encode)?;

        let mut state = self.state.lock().await;
        // Persist before anything becomes observable: if the write
        // fails, no state changed and the caller just sees the error.
        self.store.set(&bytes).await?;
        state.generation += 1;
        let generation = state.generation;
        self.arm_timer(&mut state, &session, generation);
        state.session = Some(session.clone());
        let _ = self.publisher.send(Some(session));
        Ok(generation)
    }

    /// Replaces the current session with a profile-augmented copy, IF
    /// the given generation is still current. Re-persists and
    /// re-publishes; the timer is untouched (profile resolution never
    /// moves the expiry).
    ///
    /// Returns `Ok(None)` when the generation is stale — the session
    /// was logged out (or replaced) while the profile fetch was in
    /// flight, and the late result is discarded.
    async fn augment(
        &self,
        generation: u64,
        attach: impl FnOnce(Session) -> Session,
    ) -> Result<Option<Session>, SessionError> {
        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!(
                armed_for = generation,
                current = state.generation,
                "stale profile resolution discarded"
            );
            return Ok(None);
        }
        let Some(current) = state.session.clone() else {
            return Ok(None);
        };

        let updated = attach(current);
        let bytes =
            serde_json::to_vec(&updated).map_err(SessionError::Encode)?;
        self.store.set(&bytes).await?;
        state.session = Some(updated.clone());
        let _ = self.publisher.send(Some(updated.clone()));
        tracing::debug!(
            subject = %updated.subject,
            "session replaced with profile-augmented copy"
        );
        Ok(Some(updated))
    }

    /// Arms the expiry timer for the session's remaining window,
    /// cancelling any previously armed one first (the "at most one
    /// timer" invariant).
    ///
    /// The spawned task holds only a weak reference back to the manager
    /// so an armed timer never keeps a dropped manager alive.
    fn arm_timer(
        &self,
        state: &mut LifecycleState,
        session: &Session,
        generation: u64,
    ) {
        if let Some(previous) = state.timer.take() {
            previous.abort();
        }

        let delay = session.remaining(Utc::now());
        let manager = self.weak.clone();
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(manager) = manager.upgrade() {
                manager.expire(generation).await;
            }
        }));
        tracing::debug!(
            delay_secs = delay.as_secs(),
            "expiry timer armed"
        );
    }

    /// The expiry transition: runs when the armed timer elapses and its
    /// generation is still current. Performs exactly the logout steps.
    /// This is the only way a session ever ends without a caller call,
    /// and it is silent — expiry is an expected transition, not an
    /// error.
    async fn expire(&self, generation: u64) {
        {
            let mut state = self.state.lock().await;
            if state.generation != generation {
                tracing::debug!(
                    armed_for = generation,
                    current = state.generation,
                    "stale expiry timer discarded"
                );
                return;
            }
            // This task IS the armed timer — detach the handle instead
            // of aborting it, or the store clear below would be
            // cancelled mid-write.
            state.timer = None;
            state.session = None;
            state.generation += 1;
            if let Err(e) = self.store.clear().await {
                tracing::warn!(
                    error = %e,
                    "failed to clear the session record on expiry"
                );
            }
            let _ = self.publisher.send(None);
        }

        self.navigator.navigate(Route::AnonymousHome);
        tracing::info!("session expired — returning to anonymous view");
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for the full session lifecycle.
    //!
    //! Naming convention: `test_{operation}_{scenario}_{expected}`.
    //!
    //! All collaborators are fakes: a scripted credential exchange, a
    //! scripted profile resolver that counts its calls, the in-memory
    //! store, and a navigator that records every route. Timer tests run
    //! under `#[tokio::test(start_paused = true)]` and drive the clock
    //! with `tokio::time::advance`, so nothing sleeps for real.

    use super::*;

    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use lectern_model::{Instructor, InstructorId, Student, StudentId};
    use lectern_store::MemoryStore;
    use tokio::sync::Semaphore;
    use tokio::sync::broadcast::error::TryRecvError;

    // -- Token helper -----------------------------------------------------

    /// Builds an unsigned bearer token expiring `expires_in_secs` from
    /// now. Only tests mint tokens — the backend owns issuance.
    fn token_for(sub: &str, roles: &[&str], expires_in_secs: i64) -> String {
        let exp = Utc::now().timestamp() + expires_in_secs;
        let roles = roles
            .iter()
            .map(|r| format!("\"{r}\""))
            .collect::<Vec<_>>()
            .join(",");
        let payload =
            format!(r#"{{"sub":"{sub}","roles":[{roles}],"exp":{exp}}}"#);
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#),
            URL_SAFE_NO_PAD.encode(payload.as_bytes()),
        )
    }

    // -- Fake collaborators -----------------------------------------------

    /// Returns its scripted tokens in order, one per login attempt.
    struct ScriptedExchange {
        tokens: StdMutex<Vec<String>>,
    }

    impl ScriptedExchange {
        fn returning(token: String) -> Self {
            Self {
                tokens: StdMutex::new(vec![token]),
            }
        }

        fn sequence(tokens: Vec<String>) -> Self {
            let mut tokens = tokens;
            tokens.reverse(); // pop() takes from the back
            Self {
                tokens: StdMutex::new(tokens),
            }
        }
    }

    impl CredentialExchange for ScriptedExchange {
        async fn exchange(
            &self,
            _username: &str,
            _password: &str,
        ) -> Result<String, SessionError> {
            self.tokens.lock().unwrap().pop().ok_or_else(|| {
                SessionError::AuthenticationFailed(
                    "bad credentials".into(),
                )
            })
        }
    }

    /// Rejects every credential pair.
    struct RejectingExchange;

    impl CredentialExchange for RejectingExchange {
        async fn exchange(
            &self,
            _username: &str,
            _password: &str,
        ) -> Result<String, SessionError> {
            Err(SessionError::AuthenticationFailed(
                "bad credentials".into(),
            ))
        }
    }

    /// Resolves from a fixed script and counts every call — the
    /// "admin never fetches a profile" property reads this counter.
    #[derive(Default)]
    struct ScriptedResolver {
        student: Option<Student>,
        instructor: Option<Instructor>,
        calls: AtomicUsize,
    }

    impl ScriptedResolver {
        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ProfileResolver for ScriptedResolver {
        async fn resolve_student(
            &self,
            subject: &str,
        ) -> Result<Student, SessionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.student.clone().ok_or_else(|| {
                SessionError::ProfileNotFound {
                    role: Role::Student,
                    subject: subject.into(),
                }
            })
        }

        async fn resolve_instructor(
            &self,
            subject: &str,
        ) -> Result<Instructor, SessionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.instructor.clone().ok_or_else(|| {
                SessionError::ProfileNotFound {
                    role: Role::Instructor,
                    subject: subject.into(),
                }
            })
        }
    }

    /// Blocks profile resolution until the test releases it — used to
    /// interleave a logout with an in-flight fetch.
    struct GatedResolver {
        release: Arc<Semaphore>,
        student: Student,
    }

    impl ProfileResolver for GatedResolver {
        async fn resolve_student(
            &self,
            _subject: &str,
        ) -> Result<Student, SessionError> {
            let _permit = self
                .release
                .acquire()
                .await
                .expect("gate semaphore closed");
            Ok(self.student.clone())
        }

        async fn resolve_instructor(
            &self,
            _subject: &str,
        ) -> Result<Instructor, SessionError> {
            unimplemented!("test only gates student resolution")
        }
    }

    /// Records every routing decision.
    #[derive(Default)]
    struct RecordingNavigator {
        routes: StdMutex<Vec<Route>>,
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

    // -- Harness ----------------------------------------------------------

    fn student_42() -> Student {
        Student {
            student_id: StudentId(42),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            level: "Intermediate".into(),
            user: None,
        }
    }

    fn instructor_8() -> Instructor {
        Instructor {
            instructor_id: InstructorId(8),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            summary: "Compilers".into(),
            user: None,
        }
    }

    type TestManager = SessionManager<
        ScriptedExchange,
        Arc<ScriptedResolver>,
        Arc<MemoryStore>,
        Arc<RecordingNavigator>,
    >;

    struct Harness {
        manager: Arc<TestManager>,
        resolver: Arc<ScriptedResolver>,
        store: Arc<MemoryStore>,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness(token: String, resolver: ScriptedResolver) -> Harness {
        harness_with_store(token, resolver, Arc::new(MemoryStore::new()))
    }

    /// Builds a manager around a given store — a second harness over
    /// the same store simulates a process restart.
    fn harness_with_store(
        token: String,
        resolver: ScriptedResolver,
        store: Arc<MemoryStore>,
    ) -> Harness {
        let resolver = Arc::new(resolver);
        let navigator = Arc::new(RecordingNavigator::default());
        let manager = SessionManager::new(
            ScriptedExchange::returning(token),
            Arc::clone(&resolver),
            Arc::clone(&store),
            Arc::clone(&navigator),
        );
        Harness {
            manager,
            resolver,
            store,
            navigator,
        }
    }

    // =====================================================================
    // login() — role dispatch
    // =====================================================================

    #[tokio::test]
    async fn test_login_admin_navigates_home_without_profile_fetch() {
        let h = harness(
            token_for("boss@school.edu", &["Admin"], 3600),
            ScriptedResolver::default(),
        );

        let session =
            h.manager.login("boss@school.edu", "pw").await.unwrap();

        assert_eq!(session.primary_role(), Some(Role::Admin));
        assert!(session.student.is_none());
        assert!(session.instructor.is_none());
        // The resolver must never be consulted for an admin.
        assert_eq!(h.resolver.call_count(), 0);
        assert_eq!(h.navigator.routes(), vec![Route::AdminHome]);
    }

    #[tokio::test]
    async fn test_login_student_resolves_profile_and_navigates() {
        // Student token for a@b.com, profile 42: the session must carry
        // studentId 42 and routing must target that id.
        let h = harness(
            token_for("a@b.com", &["Student"], 3600),
            ScriptedResolver {
                student: Some(student_42()),
                ..Default::default()
            },
        );

        let session = h.manager.login("a@b.com", "pw").await.unwrap();

        assert_eq!(
            session.student.as_ref().map(|s| s.student_id),
            Some(StudentId(42))
        );
        assert_eq!(
            h.navigator.routes(),
            vec![Route::StudentCourses(StudentId(42))]
        );
    }

    #[tokio::test]
    async fn test_login_instructor_resolves_profile_and_navigates() {
        let h = harness(
            token_for("grace@school.edu", &["Instructor"], 3600),
            ScriptedResolver {
                instructor: Some(instructor_8()),
                ..Default::default()
            },
        );

        let session =
            h.manager.login("grace@school.edu", "pw").await.unwrap();

        assert_eq!(
            session.instructor.as_ref().map(|i| i.instructor_id),
            Some(InstructorId(8))
        );
        assert_eq!(
            h.navigator.routes(),
            vec![Route::InstructorCourses(InstructorId(8))]
        );
    }

    #[tokio::test]
    async fn test_login_student_publishes_provisional_then_augmented() {
        // Observers must never jump from LoggedOut straight to a
        // populated profile: the profile-less state comes first, always.
        let h = harness(
            token_for("a@b.com", &["Student"], 3600),
            ScriptedResolver {
                student: Some(student_42()),
                ..Default::default()
            },
        );
        let mut rx = h.manager.subscribe();

        h.manager.login("a@b.com", "pw").await.unwrap();

        let first = rx.recv().await.unwrap().expect("provisional state");
        assert!(first.student.is_none(), "first publish is profile-less");

        let second = rx.recv().await.unwrap().expect("augmented state");
        assert_eq!(
            second.student.as_ref().map(|s| s.student_id),
            Some(StudentId(42))
        );
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    // =====================================================================
    // login() — failures
    // =====================================================================

    #[tokio::test]
    async fn test_login_rejected_credentials_creates_no_session() {
        let navigator = Arc::new(RecordingNavigator::default());
        let store = Arc::new(MemoryStore::new());
        let manager = SessionManager::new(
            RejectingExchange,
            Arc::new(ScriptedResolver::default()),
            Arc::clone(&store),
            Arc::clone(&navigator),
        );
        let mut rx = manager.subscribe();

        let result = manager.login("who@school.edu", "wrong").await;

        assert!(matches!(
            result,
            Err(SessionError::AuthenticationFailed(_))
        ));
        assert_eq!(manager.current().await, None);
        assert_eq!(store.get().await.unwrap(), None);
        assert!(navigator.routes().is_empty());
        // Nothing was ever published.
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_login_malformed_token_tears_down_and_errors() {
        // The exchange "succeeds" but hands back garbage — fatal,
        // equivalent to bad credentials plus a full teardown.
        let h = harness(
            "not-a-token".to_string(),
            ScriptedResolver::default(),
        );

        let result = h.manager.login("a@b.com", "pw").await;

        assert!(matches!(result, Err(SessionError::MalformedToken(_))));
        assert_eq!(h.manager.current().await, None);
        assert_eq!(h.store.get().await.unwrap(), None);
        // The teardown routes back to the anonymous view.
        assert_eq!(h.navigator.routes(), vec![Route::AnonymousHome]);
    }

    #[tokio::test]
    async fn test_login_profile_failure_keeps_provisional_session() {
        // Resolver has no record for the subject: the error surfaces to
        // the caller, but the session survives — profile-less.
        let h = harness(
            token_for("a@b.com", &["Student"], 3600),
            ScriptedResolver::default(), // no student scripted
        );

        let result = h.manager.login("a@b.com", "pw").await;

        assert!(matches!(
            result,
            Err(SessionError::ProfileNotFound { .. })
        ));
        let session = h
            .manager
            .current()
            .await
            .expect("session must remain active");
        assert!(session.student.is_none());
        // The provisional record is still persisted...
        assert!(h.store.get().await.unwrap().is_some());
        // ...and routing never went past the authenticated state.
        assert!(h.navigator.routes().is_empty());
    }

    // =====================================================================
    // logout()
    // =====================================================================

    #[tokio::test]
    async fn test_logout_clears_store_session_and_navigates_anonymous() {
        let h = harness(
            token_for("boss@school.edu", &["Admin"], 3600),
            ScriptedResolver::default(),
        );
        let mut rx = h.manager.subscribe();
        h.manager.login("boss@school.edu", "pw").await.unwrap();

        h.manager.logout().await.unwrap();

        assert_eq!(h.manager.current().await, None);
        assert_eq!(h.store.get().await.unwrap(), None);
        assert_eq!(
            h.navigator.routes(),
            vec![Route::AdminHome, Route::AnonymousHome]
        );
        // Observers saw the session, then the cleared state, in order.
        assert!(rx.recv().await.unwrap().is_some());
        assert!(rx.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_logout_without_session_is_a_no_op_reassert() {
        let h = harness(
            token_for("a@b.com", &["Student"], 3600),
            ScriptedResolver::default(),
        );

        h.manager.logout().await.unwrap();
        h.manager.logout().await.unwrap();

        assert_eq!(h.manager.current().await, None);
        assert_eq!(h.store.get().await.unwrap(), None);
        // Each call re-asserts the cleared state.
        assert_eq!(
            h.navigator.routes(),
            vec![Route::AnonymousHome, Route::AnonymousHome]
        );
    }

    // =====================================================================
    // Expiry timer
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_expiry_firing_reproduces_logout_end_state() {
        let h = harness(
            token_for("boss@school.edu", &["Admin"], 3600),
            ScriptedResolver::default(),
        );
        let mut rx = h.manager.subscribe();
        h.manager.login("boss@school.edu", "pw").await.unwrap();
        assert!(rx.recv().await.unwrap().is_some());
        // Let the spawned timer task register its sleep deadline against
        // the current paused clock before advancing it.
        tokio::task::yield_now().await;

        // The token's window elapses with no caller involvement.
        tokio::time::advance(Duration::from_secs(3601)).await;

        let cleared = tokio::time::timeout(
            Duration::from_secs(60),
            rx.recv(),
        )
        .await
        .expect("expiry should publish the cleared state")
        .unwrap();
        assert_eq!(cleared, None);
        assert_eq!(h.manager.current().await, None);
        assert_eq!(h.store.get().await.unwrap(), None);
        assert_eq!(
            h.navigator.routes(),
            vec![Route::AdminHome, Route::AnonymousHome]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_cancels_timer_no_late_expiry_fires() {
        let h = harness(
            token_for("boss@school.edu", &["Admin"], 3600),
            ScriptedResolver::default(),
        );
        let mut rx = h.manager.subscribe();
        h.manager.login("boss@school.edu", "pw").await.unwrap();
        h.manager.logout().await.unwrap();
        assert!(rx.recv().await.unwrap().is_some());
        assert!(rx.recv().await.unwrap().is_none());

        // Long past the token's expiry: the cancelled timer must stay
        // silent — no extra publish, no extra navigation.
        tokio::time::advance(Duration::from_secs(7200)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(
            h.navigator.routes(),
            vec![Route::AdminHome, Route::AnonymousHome]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_relogin_rearms_timer_for_the_new_window() {
        // First session would expire at +1000 s; the second login
        // replaces it with a +3600 s window. The old timer must be dead.
        let resolver = Arc::new(ScriptedResolver::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let store = Arc::new(MemoryStore::new());
        let manager = SessionManager::new(
            ScriptedExchange::sequence(vec![
                token_for("boss@school.edu", &["Admin"], 1000),
                token_for("boss@school.edu", &["Admin"], 3600),
            ]),
            resolver,
            Arc::clone(&store),
            Arc::clone(&navigator),
        );
        manager.login("boss@school.edu", "pw").await.unwrap();
        manager.login("boss@school.edu", "pw").await.unwrap();
        // Let the armed timer task register its sleep deadline against
        // the current paused clock before advancing it.
        tokio::task::yield_now().await;

        // Past the FIRST window: still logged in.
        tokio::time::advance(Duration::from_secs(1001)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(manager.current().await.is_some());

        // Past the second window: expired.
        tokio::time::advance(Duration::from_secs(2601)).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(manager.current().await, None);
        assert_eq!(store.get().await.unwrap(), None);
    }

    // =====================================================================
    // restore_session()
    // =====================================================================

    #[tokio::test]
    async fn test_restore_rebuilds_session_verbatim_from_record() {
        // "First process": student logs in, profile resolved, persisted.
        let first = harness(
            token_for("a@b.com", &["Student"], 3600),
            ScriptedResolver {
                student: Some(student_42()),
                ..Default::default()
            },
        );
        let original =
            first.manager.login("a@b.com", "pw").await.unwrap();

        // "Second process": zero in-memory state, same store.
        let second = harness_with_store(
            String::new(), // exchange is never consulted on restore
            ScriptedResolver::default(),
            Arc::clone(&first.store),
        );
        let restored = second
            .manager
            .restore_session()
            .await
            .unwrap()
            .expect("record is live — should restore");

        assert_eq!(restored, original);
        // Restoration never re-contacts the backend...
        assert_eq!(second.resolver.call_count(), 0);
        // ...and never navigates.
        assert!(second.navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn test_restore_with_empty_store_returns_logged_out() {
        let h = harness(
            token_for("a@b.com", &["Student"], 3600),
            ScriptedResolver::default(),
        );
        let mut rx = h.manager.subscribe();

        let restored = h.manager.restore_session().await.unwrap();

        assert!(restored.is_none());
        assert_eq!(h.manager.current().await, None);
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_restore_expired_record_clears_store_idempotently() {
        // A record that expired 10 s ago must not be reconstructed.
        let h = harness(String::new(), ScriptedResolver::default());
        let stale = Session {
            subject: "a@b.com".into(),
            roles: vec![Role::Student],
            token: "t.t.t".into(),
            expires_at: Utc::now() - chrono::Duration::seconds(10),
            student: Some(student_42()),
            instructor: None,
        };
        h.store
            .set(&serde_json::to_vec(&stale).unwrap())
            .await
            .unwrap();

        assert!(h.manager.restore_session().await.unwrap().is_none());
        assert_eq!(h.store.get().await.unwrap(), None);
        // Second call: still logged out, still clean.
        assert!(h.manager.restore_session().await.unwrap().is_none());
        assert_eq!(h.manager.current().await, None);
    }

    #[tokio::test]
    async fn test_restore_unreadable_record_is_treated_as_stale() {
        let h = harness(String::new(), ScriptedResolver::default());
        h.store.set(b"definitely not json").await.unwrap();

        let restored = h.manager.restore_session().await.unwrap();

        assert!(restored.is_none());
        assert_eq!(h.store.get().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restore_arms_timer_for_the_remaining_window() {
        let h = harness(String::new(), ScriptedResolver::default());
        let record = Session {
            subject: "a@b.com".into(),
            roles: vec![Role::Student],
            token: "t.t.t".into(),
            expires_at: Utc::now() + chrono::Duration::seconds(100),
            student: Some(student_42()),
            instructor: None,
        };
        h.store
            .set(&serde_json::to_vec(&record).unwrap())
            .await
            .unwrap();
        let mut rx = h.manager.subscribe();

        h.manager.restore_session().await.unwrap().unwrap();
        assert!(rx.recv().await.unwrap().is_some());
        // Let the armed timer task register its sleep deadline against
        // the current paused clock before advancing it.
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(101)).await;
        let cleared = tokio::time::timeout(
            Duration::from_secs(60),
            rx.recv(),
        )
        .await
        .expect("restored session should expire on schedule")
        .unwrap();
        assert_eq!(cleared, None);
        assert_eq!(h.manager.current().await, None);
    }

    // =====================================================================
    // Logout racing an in-flight profile resolution
    // =====================================================================

    #[tokio::test]
    async fn test_profile_resolution_after_logout_is_discarded() {
        // The hazard: the profile fetch completes AFTER the user logged
        // out. The late result must not resurrect the session.
        let release = Arc::new(Semaphore::new(0));
        let navigator = Arc::new(RecordingNavigator::default());
        let store = Arc::new(MemoryStore::new());
        let manager = SessionManager::new(
            ScriptedExchange::returning(token_for(
                "a@b.com",
                &["Student"],
                3600,
            )),
            GatedResolver {
                release: Arc::clone(&release),
                student: student_42(),
            },
            Arc::clone(&store),
            Arc::clone(&navigator),
        );

        let login_manager = Arc::clone(&manager);
        let login_task = tokio::spawn(async move {
            login_manager.login("a@b.com", "pw").await
        });

        // Wait for the provisional session, proving the fetch is now
        // in flight behind the gate.
        let mut installed = false;
        for _ in 0..1000 {
            if manager.current().await.is_some() {
                installed = true;
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(installed, "provisional session never appeared");

        manager.logout().await.unwrap();
        release.add_permits(1);

        let session = login_task
            .await
            .unwrap()
            .expect("login itself succeeded");
        // The caller gets the session as created — but the late profile
        // was discarded, nothing was re-persisted, nothing navigated to
        // the student view.
        assert!(session.student.is_none());
        assert_eq!(manager.current().await, None);
        assert_eq!(store.get().await.unwrap(), None);
        assert_eq!(navigator.routes(), vec![Route::AnonymousHome]);
    }
}
