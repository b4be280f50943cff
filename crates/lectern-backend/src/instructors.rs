//! Instructor operations: search, create, delete, lookup by login email.

use lectern_model::{Instructor, InstructorId, PageResponse};

use crate::{BackendError, HttpBackend};

impl HttpBackend {
    /// Keyword search over instructors, paginated.
    pub async fn search_instructors(
        &self,
        keyword: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Instructor>, BackendError> {
        self.get_json(
            "/instructors",
            &[
                ("keyword", keyword.to_string()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ],
        )
        .await
    }

    /// Creates an instructor together with their login account. The
    /// backend assigns the id.
    pub async fn save_instructor(
        &self,
        instructor: &Instructor,
    ) -> Result<Instructor, BackendError> {
        self.post_json("/instructors", instructor).await
    }

    /// Deletes an instructor.
    pub async fn delete_instructor(
        &self,
        instructor_id: InstructorId,
    ) -> Result<(), BackendError> {
        self.delete(&format!("/instructors/{instructor_id}")).await
    }

    /// Looks up the instructor whose login email is `email` — the
    /// profile-resolution lookup behind instructor logins.
    pub async fn instructor_by_email(
        &self,
        email: &str,
    ) -> Result<Instructor, BackendError> {
        self.get_json(
            "/instructors/find",
            &[("email", email.to_string())],
        )
        .await
    }
}
