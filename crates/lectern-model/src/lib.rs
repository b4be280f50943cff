//! Domain records for Lectern.
//!
//! This crate defines every record that travels between the console and
//! the course-management backend: courses, instructors, students, linked
//! user accounts, and the paging envelope the backend wraps search
//! results in.
//!
//! The backend speaks camelCase JSON, so every record carries
//! `#[serde(rename_all = "camelCase")]` and the field names here are the
//! snake_case spellings of the wire names. These shapes are load-bearing:
//! a mismatch means the console silently drops fields, so the tests at
//! the bottom pin the exact JSON.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a course.
///
/// Newtype wrapper over the backend's numeric id. The point is type
/// safety: a `CourseId` can't be passed where a `StudentId` is expected,
/// even though both are `u64` underneath.
///
/// `#[serde(transparent)]` makes this serialize as the bare number, so
/// `CourseId(7)` is just `7` on the wire — matching the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(pub u64);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for an instructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstructorId(pub u64);

impl fmt::Display for InstructorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A unique identifier for a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(pub u64);

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The login account linked to an instructor or student record.
///
/// The console only ever reads the email (it is the login identity the
/// token's `sub` claim refers to). Passwords never travel back from the
/// backend, so there is no field for one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
}

/// An instructor: teaches courses, owns a summary blurb shown in course
/// listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub instructor_id: InstructorId,
    pub first_name: String,
    pub last_name: String,
    /// Short bio shown next to the instructor's courses.
    pub summary: String,
    /// The linked login account. Absent on records embedded inside a
    /// `Course` (the backend prunes it there to keep payloads small).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// A student: enrolls in courses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_id: StudentId,
    pub first_name: String,
    pub last_name: String,
    /// Study level, free-form (the backend treats it as a label).
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// A course, owned by exactly one instructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_id: CourseId,
    pub course_name: String,
    /// Duration label, free-form ("6 weeks", "3 months", ...).
    pub course_duration: String,
    pub course_description: String,
    /// Absent when the course is listed inside an instructor's own
    /// course page (the owner is implied by the route).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<Instructor>,
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

/// One page of search results, as the backend returns them.
///
/// Every search endpoint (`/courses`, `/instructors`, `/students`, the
/// per-instructor and per-student course listings) wraps its results in
/// this envelope. `current_page` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
}

impl<T> PageResponse<T> {
    /// `true` when this is the last page (or the result set is empty,
    /// where the backend reports zero total pages).
    pub fn is_last(&self) -> bool {
        self.current_page + 1 >= self.total_pages
    }

    /// `true` when the whole result set is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
