//! REST backend binding for Lectern.
//!
//! [`HttpBackend`] is the one HTTP client the console owns. It wears two
//! hats:
//!
//! 1. **Session collaborator** — it implements the session layer's
//!    [`CredentialExchange`](lectern_session::CredentialExchange) and
//!    [`ProfileResolver`](lectern_session::ProfileResolver) traits, so
//!    the lifecycle manager can exchange credentials and resolve
//!    profiles without knowing HTTP exists.
//! 2. **Console plumbing** — paginated keyword search and CRUD for
//!    courses, instructors, and students; per-instructor and per-student
//!    course listings; enrollment; and the email-availability probe the
//!    create-account forms validate against.
//!
//! The backend speaks plain REST: query-string paging (`keyword`,
//! `page`, `size`), camelCase JSON bodies, and a bearer token on
//! authenticated calls (attach one with
//! [`with_bearer`](HttpBackend::with_bearer) after login).
//!
//! Nothing here retries: failures are classified ([`BackendError`]) and
//! surfaced, and the retry policy — there isn't one — belongs to the
//! caller.

mod client;
mod courses;
mod error;
mod instructors;
mod students;
mod users;

pub use client::HttpBackend;
pub use error::BackendError;
