//! User-account operations.

use crate::{BackendError, HttpBackend};

impl HttpBackend {
    /// Whether a login email is already taken.
    ///
    /// This backs the async validator on the create-instructor and
    /// create-student forms: the form field is checked against the
    /// backend while the admin types, before submit.
    pub async fn email_exists(
        &self,
        email: &str,
    ) -> Result<bool, BackendError> {
        self.get_json("/users", &[("email", email.to_string())]).await
    }
}
