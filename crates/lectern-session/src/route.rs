//! Role-based routing: where the console sends a user after a session
//! transition.
//!
//! The session manager decides the target purely from the active role
//! (plus the resolved profile id for instructors and students) and
//! signals it through the [`Navigator`] trait. It never renders anything
//! itself — navigation is a side effect handed to whoever owns the view
//! layer.

use lectern_model::{InstructorId, StudentId};

/// A navigation target, decided purely from the session's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The admin courses overview.
    AdminHome,

    /// A specific instructor's own course list.
    InstructorCourses(InstructorId),

    /// A specific student's enrolled-course list.
    StudentCourses(StudentId),

    /// The anonymous landing view (logged out).
    AnonymousHome,
}

impl Route {
    /// The URL path for this route.
    pub fn path(&self) -> String {
        match self {
            Route::AdminHome => "/courses".to_string(),
            Route::InstructorCourses(id) => {
                format!("/instructor-courses/{id}")
            }
            Route::StudentCourses(id) => format!("/student-courses/{id}"),
            Route::AnonymousHome => "/".to_string(),
        }
    }
}

/// Receives the session manager's routing decisions.
///
/// Implemented by the view layer (or by a recording stub in tests).
/// Delivery is synchronous and in-order; the navigator must not block.
pub trait Navigator: Send + Sync + 'static {
    /// Called once per routing decision.
    fn navigate(&self, route: Route);
}

/// A shared navigator is still a navigator. Tests and demos keep one
/// handle to assert on recorded routes while the manager owns a clone.
impl<N: Navigator> Navigator for std::sync::Arc<N> {
    fn navigate(&self, route: Route) {
        (**self).navigate(route);
    }
}

// =========================================================================
// Tests
// =========================================================================
