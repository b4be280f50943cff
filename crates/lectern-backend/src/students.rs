//! Student operations: search, create, delete, lookup by login email.

use lectern_model::{PageResponse, Student, StudentId};

use crate::{BackendError, HttpBackend};

impl HttpBackend {
    /// Keyword search over students, paginated.
    pub async fn search_students(
        &self,
        keyword: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Student>, BackendError> {
        self.get_json(
            "/students",
            &[
                ("keyword", keyword.to_string()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ],
        )
        .await
    }

    /// Creates a student together with their login account. The backend
    /// assigns the id.
    pub async fn save_student(
        &self,
        student: &Student,
    ) -> Result<Student, BackendError> {
        self.post_json("/students", student).await
    }

    /// Deletes a student.
    pub async fn delete_student(
        &self,
        student_id: StudentId,
    ) -> Result<(), BackendError> {
        self.delete(&format!("/students/{student_id}")).await
    }

    /// Looks up the student whose login email is `email` — the
    /// profile-resolution lookup behind student logins.
    pub async fn student_by_email(
        &self,
        email: &str,
    ) -> Result<Student, BackendError> {
        self.get_json("/students/find", &[("email", email.to_string())])
            .await
    }
}
