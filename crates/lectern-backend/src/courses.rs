//! Course operations: search, CRUD, role-scoped listings, enrollment.

use lectern_model::{Course, CourseId, InstructorId, PageResponse, StudentId};

use crate::{BackendError, HttpBackend};

impl HttpBackend {
    /// Keyword search over all courses, paginated. An empty keyword
    /// lists everything.
    pub async fn search_courses(
        &self,
        keyword: &str,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Course>, BackendError> {
        self.get_json(
            "/courses",
            &[
                ("keyword", keyword.to_string()),
                ("page", page.to_string()),
                ("size", size.to_string()),
            ],
        )
        .await
    }

    /// Creates a course. The backend assigns the id; whatever id is on
    /// the posted record is ignored.
    pub async fn save_course(
        &self,
        course: &Course,
    ) -> Result<Course, BackendError> {
        self.post_json("/courses", course).await
    }

    /// Updates an existing course in place.
    pub async fn update_course(
        &self,
        course_id: CourseId,
        course: &Course,
    ) -> Result<Course, BackendError> {
        self.put_json(&format!("/courses/{course_id}"), course).await
    }

    /// Deletes a course.
    pub async fn delete_course(
        &self,
        course_id: CourseId,
    ) -> Result<(), BackendError> {
        self.delete(&format!("/courses/{course_id}")).await
    }

    /// The courses a specific instructor teaches, paginated. Used both
    /// by the instructor's own view and by admins inspecting an
    /// instructor.
    pub async fn courses_by_instructor(
        &self,
        instructor_id: InstructorId,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Course>, BackendError> {
        self.get_json(
            &format!("/instructors/{instructor_id}/courses"),
            &[("page", page.to_string()), ("size", size.to_string())],
        )
        .await
    }

    /// The courses a student is enrolled in, paginated.
    pub async fn courses_by_student(
        &self,
        student_id: StudentId,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Course>, BackendError> {
        self.get_json(
            &format!("/students/{student_id}/courses"),
            &[("page", page.to_string()), ("size", size.to_string())],
        )
        .await
    }

    /// The courses a student is NOT yet enrolled in — what the "enroll"
    /// picker shows.
    pub async fn other_courses_by_student(
        &self,
        student_id: StudentId,
        page: u32,
        size: u32,
    ) -> Result<PageResponse<Course>, BackendError> {
        self.get_json(
            &format!("/students/{student_id}/other-courses"),
            &[("page", page.to_string()), ("size", size.to_string())],
        )
        .await
    }

    /// Enrolls a student in a course.
    pub async fn enroll_student(
        &self,
        course_id: CourseId,
        student_id: StudentId,
    ) -> Result<(), BackendError> {
        self.post_empty(&format!(
            "/courses/{course_id}/enroll/students/{student_id}"
        ))
        .await
    }
}
