//! Session and token lifecycle management for Lectern.
//!
//! This crate is the console's core. It handles the lifecycle of the
//! single process-wide session:
//!
//! 1. **Login** — exchanging credentials for a bearer token, decoding
//!    its claims, and building a live session ([`SessionManager::login`])
//! 2. **Profile augmentation** — fetching the student or instructor
//!    record that belongs to the logged-in identity and replacing the
//!    session with an enriched copy
//! 3. **Persistence & restore** — writing the session to a durable slot
//!    on every change, and rebuilding it from that slot after a process
//!    restart ([`SessionManager::restore_session`])
//! 4. **Expiry** — arming one timer for the token's remaining validity
//!    window and tearing the session down when it fires
//!
//! # How it fits in the stack
//!
//! ```text
//! Console / UI (above)  ← subscribes to session state, issues login/logout
//!     ↕
//! Session Layer (this crate)  ← owns the session value, timer, routing policy
//!     ↕
//! Claims + Store + Backend (below)  ← token decoding, persistence, HTTP
//! ```
//!
//! The backend is abstracted behind the [`CredentialExchange`] and
//! [`ProfileResolver`] traits and the navigation surface behind
//! [`Navigator`], so the whole lifecycle runs unchanged against the real
//! REST binding, a fake in a test, or a demo.

mod backend;
mod error;
mod manager;
mod route;
mod session;

pub use backend::{CredentialExchange, ProfileResolver};
pub use error::SessionError;
pub use manager::SessionManager;
pub use route::{Navigator, Route};
pub use session::Session;
