//! The HTTP client: one `HttpBackend` per console, shared everywhere.

use lectern_claims::Role;
use lectern_model::{Instructor, Student};
use lectern_session::{CredentialExchange, ProfileResolver, SessionError};
use reqwest::{RequestBuilder, Response};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::BackendError;

/// The `/login` response body: the backend hands back one bearer token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: String,
}

/// The console's REST client.
///
/// Cheap to clone (the underlying `reqwest::Client` is a handle around
/// a shared connection pool), so the session manager and the catalog
/// plumbing share one instance — typically behind an `Arc`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    bearer: Option<String>,
}

impl HttpBackend {
    /// Creates a client for the backend at `base_url` (e.g.
    /// `http://localhost:8085`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Same, but over a caller-configured `reqwest::Client` (custom
    /// timeouts, proxies).
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        // Normalize so `endpoint` can always just append "/path".
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http,
            base_url,
            bearer: None,
        }
    }

    /// A copy of this client that sends `Authorization: Bearer <token>`
    /// on every catalog call. Attach the session's token after login.
    pub fn with_bearer(&self, token: impl Into<String>) -> Self {
        Self {
            bearer: Some(token.into()),
            ..self.clone()
        }
    }

    /// The normalized base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turns a non-2xx response into [`BackendError::Status`], reading
    /// as much of the body as possible for the message.
    async fn expect_success(
        response: Response,
    ) -> Result<Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::debug!(
            status = status.as_u16(),
            "backend rejected request"
        );
        Err(BackendError::Status {
            status: status.as_u16(),
            message,
        })
    }

    // -- Request helpers shared by the catalog modules ---------------------

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let request =
            self.authorize(self.http.get(self.endpoint(path)).query(query));
        let response =
            request.send().await.map_err(BackendError::Transport)?;
        Self::expect_success(response)
            .await?
            .json()
            .await
            .map_err(BackendError::Decode)
    }

    pub(crate) async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let request =
            self.authorize(self.http.post(self.endpoint(path)).json(body));
        let response =
            request.send().await.map_err(BackendError::Transport)?;
        Self::expect_success(response)
            .await?
            .json()
            .await
            .map_err(BackendError::Decode)
    }

    pub(crate) async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let request =
            self.authorize(self.http.put(self.endpoint(path)).json(body));
        let response =
            request.send().await.map_err(BackendError::Transport)?;
        Self::expect_success(response)
            .await?
            .json()
            .await
            .map_err(BackendError::Decode)
    }

    /// POST with an empty body, for action endpoints like enrollment.
    pub(crate) async fn post_empty(
        &self,
        path: &str,
    ) -> Result<(), BackendError> {
        let request = self.authorize(self.http.post(self.endpoint(path)));
        let response =
            request.send().await.map_err(BackendError::Transport)?;
        Self::expect_success(response).await?;
        Ok(())
    }

    pub(crate) async fn delete(
        &self,
        path: &str,
    ) -> Result<(), BackendError> {
        let request = self.authorize(self.http.delete(self.endpoint(path)));
        let response =
            request.send().await.map_err(BackendError::Transport)?;
        Self::expect_success(response).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Session collaborator impls
// ---------------------------------------------------------------------------

impl CredentialExchange for HttpBackend {
    async fn exchange(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, SessionError> {
        let response = self
            .http
            .post(self.endpoint("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .map_err(|e| SessionError::Backend(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // Any non-success response is a rejection of the
            // credentials — the backend does not distinguish further.
            tracing::debug!(
                status = status.as_u16(),
                "credential exchange rejected"
            );
            return Err(SessionError::AuthenticationFailed(format!(
                "the backend rejected the credentials (status {})",
                status.as_u16()
            )));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| SessionError::Backend(e.to_string()))?;
        Ok(body.access_token)
    }
}

impl ProfileResolver for HttpBackend {
    async fn resolve_student(
        &self,
        subject: &str,
    ) -> Result<Student, SessionError> {
        self.student_by_email(subject)
            .await
            .map_err(|e| classify_profile_error(e, Role::Student, subject))
    }

    async fn resolve_instructor(
        &self,
        subject: &str,
    ) -> Result<Instructor, SessionError> {
        self.instructor_by_email(subject).await.map_err(|e| {
            classify_profile_error(e, Role::Instructor, subject)
        })
    }
}

/// 404 means the backend has no profile behind this subject — distinct
/// from the backend being broken or unreachable, which the session layer
/// treats as transient.
fn classify_profile_error(
    error: BackendError,
    role: Role,
    subject: &str,
) -> SessionError {
    match error {
        BackendError::Status { status: 404, .. } => {
            SessionError::ProfileNotFound {
                role,
                subject: subject.to_string(),
            }
        }
        other => SessionError::Backend(other.to_string()),
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_client_strips_trailing_slashes() {
        let backend = HttpBackend::new("http://localhost:8085///");
        assert_eq!(backend.base_url(), "http://localhost:8085");
        assert_eq!(
            backend.endpoint("/courses"),
            "http://localhost:8085/courses"
        );
    }

    #[test]
    fn test_with_bearer_leaves_original_unauthorized() {
        let anonymous = HttpBackend::new("http://localhost:8085");
        let authorized = anonymous.with_bearer("tok");
        assert!(anonymous.bearer.is_none());
        assert_eq!(authorized.bearer.as_deref(), Some("tok"));
    }

    #[test]
    fn test_login_response_parses_camel_case_body() {
        let body: LoginResponse =
            serde_json::from_str(r#"{"accessToken":"abc.def.ghi"}"#)
                .unwrap();
        assert_eq!(body.access_token, "abc.def.ghi");
    }

    #[test]
    fn test_classify_profile_error_maps_404_to_not_found() {
        let err = classify_profile_error(
            BackendError::Status {
                status: 404,
                message: String::new(),
            },
            Role::Student,
            "a@b.com",
        );
        assert!(matches!(
            err,
            SessionError::ProfileNotFound { role: Role::Student, ref subject }
                if subject == "a@b.com"
        ));
    }

    #[test]
    fn test_classify_profile_error_other_statuses_are_backend_failures() {
        let err = classify_profile_error(
            BackendError::Status {
                status: 500,
                message: "boom".into(),
            },
            Role::Instructor,
            "a@b.com",
        );
        assert!(matches!(err, SessionError::Backend(_)));
    }
}
