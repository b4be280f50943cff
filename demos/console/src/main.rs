//! A terminal walkthrough of the session lifecycle: login, profile
//! resolution, reload-and-restore, logout, and autonomous expiry — all
//! against an in-process fake backend, so it runs without a server.
//!
//! ```text
//! cargo run -p console-demo
//! ```

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use lectern::prelude::*;

// ---------------------------------------------------------------------------
// Fake campus backend
// ---------------------------------------------------------------------------

/// Issues unsigned tokens for one hard-coded student and resolves her
/// profile. Stands in for the REST backend.
struct FakeCampus {
    token_ttl_secs: i64,
}

impl FakeCampus {
    fn mint_token(&self, sub: &str, role: &str) -> String {
        let exp = chrono::Utc::now().timestamp() + self.token_ttl_secs;
        let payload =
            format!(r#"{{"sub":"{sub}","roles":["{role}"],"exp":{exp}}}"#);
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#),
            URL_SAFE_NO_PAD.encode(payload.as_bytes()),
        )
    }
}

impl CredentialExchange for FakeCampus {
    async fn exchange(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, SessionError> {
        match (username, password) {
            ("ada@school.edu", "enigma") => {
                Ok(self.mint_token(username, "Student"))
            }
            _ => Err(SessionError::AuthenticationFailed(
                "unknown user or wrong password".into(),
            )),
        }
    }
}

impl ProfileResolver for FakeCampus {
    async fn resolve_student(
        &self,
        _subject: &str,
    ) -> Result<Student, SessionError> {
        Ok(Student {
            student_id: StudentId(42),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            level: "Intermediate".into(),
            user: None,
        })
    }

    async fn resolve_instructor(
        &self,
        subject: &str,
    ) -> Result<Instructor, SessionError> {
        Err(SessionError::ProfileNotFound {
            role: Role::Instructor,
            subject: subject.into(),
        })
    }
}

/// Prints every routing decision instead of rendering views.
struct PrintingNavigator;

impl Navigator for PrintingNavigator {
    fn navigate(&self, route: Route) {
        println!("   → navigate {}", route.path());
    }
}

// ---------------------------------------------------------------------------
// Demo
// ---------------------------------------------------------------------------

type DemoManager = SessionManager<
    Arc<FakeCampus>,
    Arc<FakeCampus>,
    Arc<MemoryStore>,
    PrintingNavigator,
>;

fn manager_for(
    campus: &Arc<FakeCampus>,
    store: &Arc<MemoryStore>,
) -> Arc<DemoManager> {
    SessionManager::new(
        Arc::clone(campus),
        Arc::clone(campus),
        Arc::clone(store),
        PrintingNavigator,
    )
}

/// Prints every published session transition, the way a header bar or
/// route guard would consume them.
fn watch(manager: &Arc<DemoManager>) {
    let mut rx = manager.subscribe();
    tokio::spawn(async move {
        while let Ok(state) = rx.recv().await {
            match state {
                Some(session) => println!(
                    "   session: {} role={:?} student={:?}",
                    session.subject,
                    session.primary_role(),
                    session.student.as_ref().map(|s| s.student_id),
                ),
                None => println!("   session: logged out"),
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), LecternError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("warn")
                }),
        )
        .init();

    let store = Arc::new(MemoryStore::new());
    let campus = Arc::new(FakeCampus {
        token_ttl_secs: 300,
    });

    println!("== login ==");
    let manager = manager_for(&campus, &store);
    watch(&manager);
    let session = manager.login("ada@school.edu", "enigma").await?;
    println!(
        "   logged in as {} until {}",
        session.subject, session.expires_at
    );

    println!("== simulated reload: fresh process, same store ==");
    let reloaded = manager_for(&campus, &store);
    watch(&reloaded);
    let restored = reloaded.restore_session().await?;
    println!(
        "   restored: {:?}",
        restored.map(|s| (s.subject, s.student.map(|p| p.student_id)))
    );

    println!("== explicit logout ==");
    reloaded.logout().await?;

    println!("== short-lived login, then autonomous expiry ==");
    let short_campus = Arc::new(FakeCampus { token_ttl_secs: 2 });
    let short_store = Arc::new(MemoryStore::new());
    let short = manager_for(&short_campus, &short_store);
    watch(&short);
    short.login("ada@school.edu", "enigma").await?;
    tokio::time::sleep(Duration::from_secs(3)).await;
    println!(
        "   after the window closed, current = {:?}",
        short.current().await.map(|s| s.subject)
    );

    Ok(())
}
