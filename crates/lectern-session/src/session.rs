//! The session record: who is logged in, until when, and as what.

use chrono::{DateTime, Utc};
use lectern_claims::{Claims, Role};
use lectern_model::{Instructor, Student};
use serde::{Deserialize, Serialize};

use std::time::Duration;

/// The single authoritative record of the authenticated identity.
///
/// A `Session` exists if and only if `expires_at` was strictly in the
/// future the last time anyone looked — the manager never holds one it
/// knows to be expired.
///
/// Sessions are replaced, never mutated: profile augmentation builds a
/// new value via [`with_student`](Self::with_student) /
/// [`with_instructor`](Self::with_instructor) and swaps it in, so every
/// published state is a complete, immutable snapshot.
///
/// The persisted session record is this exact type, serialized — what
/// the store holds is what `restore_session` rebuilds, profiles
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The login identity (the token's `sub` claim).
    pub subject: String,

    /// The granted role set, as carried in the token.
    pub roles: Vec<Role>,

    /// The raw bearer token, kept for subsequent authenticated calls.
    pub token: String,

    /// Absolute expiry instant from the token's `exp` claim.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,

    /// The resolved student profile. Populated only for Student
    /// sessions, and only after profile augmentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student: Option<Student>,

    /// The resolved instructor profile. Populated only for Instructor
    /// sessions, and only after profile augmentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<Instructor>,
}

impl Session {
    /// Builds the provisional session for a freshly decoded token: no
    /// profile yet, everything else carried over from the claims.
    pub fn from_token(claims: Claims, token: String) -> Self {
        Self {
            subject: claims.sub,
            roles: claims.roles,
            token,
            expires_at: claims.expires_at,
            student: None,
            instructor: None,
        }
    }

    /// A copy of this session with the student profile attached.
    pub fn with_student(self, student: Student) -> Self {
        Self {
            student: Some(student),
            ..self
        }
    }

    /// A copy of this session with the instructor profile attached.
    pub fn with_instructor(self, instructor: Instructor) -> Self {
        Self {
            instructor: Some(instructor),
            ..self
        }
    }

    /// The single active role, by precedence Admin > Instructor >
    /// Student (see [`Claims::primary_role`]).
    pub fn primary_role(&self) -> Option<Role> {
        [Role::Admin, Role::Instructor, Role::Student]
            .into_iter()
            .find(|role| self.roles.contains(role))
    }

    /// Whether the validity window has closed at `now` (not strictly in
    /// the future = expired).
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// How long this session has left at `now`, clamped to zero.
    ///
    /// This is the duration the expiry timer is armed with; a session
    /// that is already past due yields `Duration::ZERO` and the timer
    /// fires on the next runtime tick.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

// =========================================================================
// Tests
// =========================================================================
