//! # Lectern
//!
//! Client core for a course-management admin console.
//!
//! Lectern owns everything between "the user typed a password" and "the
//! UI knows who is logged in": credential exchange, bearer-token claim
//! decoding, the persisted + time-bounded session lifecycle, role-based
//! routing decisions, and the REST plumbing (paginated search, CRUD,
//! enrollment) the console's views are built on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lectern::prelude::*;
//!
//! # struct MyNavigator;
//! # impl Navigator for MyNavigator {
//! #     fn navigate(&self, route: Route) { println!("→ {}", route.path()); }
//! # }
//! # async fn run() -> Result<(), LecternError> {
//! let console = Console::<MyNavigator>::builder()
//!     .backend_url("http://localhost:8085")
//!     .build(MyNavigator);
//!
//! // Reconstruct a session that survived the last shutdown, if any.
//! console.sessions().restore_session().await?;
//!
//! // React to every session transition.
//! let _session_updates = console.sessions().subscribe();
//!
//! console.sessions().login("admin@school.edu", "secret").await?;
//! # Ok(())
//! # }
//! ```

mod console;
mod error;

pub use console::{Console, ConsoleBuilder, ConsoleSessions};
pub use error::LecternError;

/// The types an embedding application touches day to day.
pub mod prelude {
    pub use crate::{Console, ConsoleBuilder, LecternError};
    pub use lectern_backend::{BackendError, HttpBackend};
    pub use lectern_claims::{Claims, Role, TokenError};
    pub use lectern_model::{
        Course, CourseId, Instructor, InstructorId, PageResponse, Student,
        StudentId, User,
    };
    pub use lectern_session::{
        CredentialExchange, Navigator, ProfileResolver, Route, Session,
        SessionError, SessionManager,
    };
    pub use lectern_store::{FileStore, MemoryStore, SessionStore};
}
