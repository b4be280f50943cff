//! Claim types: what a decoded bearer token says about its holder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The roles the backend can grant.
///
/// The `roles` claim is carried as a set, but in practice the backend
/// grants exactly one of these per account — they are mutually
/// exclusive. Where the set must collapse to a single active role (route
/// dispatch, profile resolution), [`Claims::primary_role`] applies the
/// precedence Admin > Instructor > Student.
///
/// Serialized as the bare variant name (`"Admin"`, `"Instructor"`,
/// `"Student"`), matching the strings the backend puts in the token.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Role {
    /// Full console access: manages courses, instructors, and students.
    Admin,

    /// Sees and manages their own course list.
    Instructor,

    /// Sees their enrolled courses and can enroll in new ones.
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Instructor => write!(f, "Instructor"),
            Role::Student => write!(f, "Student"),
        }
    }
}

// ---------------------------------------------------------------------------
// Claims
// ---------------------------------------------------------------------------

/// The decoded payload of a bearer token.
///
/// Immutable once issued — the console never rewrites a token, it only
/// reads these three claims and keeps the raw string around for
/// subsequent authenticated calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The login identity: the email the user authenticated with.
    /// This is the key the profile lookup endpoints resolve by.
    pub sub: String,

    /// The granted role set. [`decode`](crate::decode) guarantees this
    /// is non-empty.
    pub roles: Vec<Role>,

    /// Absolute expiry instant, carried on the wire as seconds since
    /// the Unix epoch (the JWT `exp` claim).
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

impl Claims {
    /// The single active role, by precedence Admin > Instructor >
    /// Student.
    ///
    /// Returns `None` only for a hand-built `Claims` with an empty role
    /// set — decoded claims always have at least one role.
    pub fn primary_role(&self) -> Option<Role> {
        [Role::Admin, Role::Instructor, Role::Student]
            .into_iter()
            .find(|role| self.roles.contains(role))
    }

    /// Whether the token's validity window has already closed at `now`.
    ///
    /// "Expired" means `expires_at` is not strictly in the future — a
    /// token expiring exactly now is unusable.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// =========================================================================
// Tests
// =========================================================================
