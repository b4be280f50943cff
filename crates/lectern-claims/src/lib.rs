//! Bearer-token claim decoding for Lectern.
//!
//! The backend authenticates users and issues a bearer token whose
//! payload carries three claims: who logged in (`sub`), what they are
//! (`roles`), and until when the token is good (`exp`). This crate turns
//! that opaque string into a typed [`Claims`] value — locally, with no
//! backend round-trip.
//!
//! # Trust boundary
//!
//! [`decode`] does **not** verify the token's signature. The backend is
//! the trust boundary: it validates tokens on every authenticated call,
//! and this layer only needs to read the claims to drive the session
//! lifecycle (role dispatch, expiry timer). This is a stated assumption,
//! not an oversight — do not "fix" it by adding key material here.
//!
//! # How it fits in the stack
//!
//! ```text
//! Session Layer (above)  ← builds a Session from the decoded Claims
//!     ↕
//! Claims Layer (this crate)  ← parses the token payload, no I/O
//! ```

mod codec;
mod error;
mod types;

pub use codec::decode;
pub use error::TokenError;
pub use types::{Claims, Role};
