//! Error types for claim decoding.
//!
//! A malformed token is a caller bug or tampering, never a transient
//! condition — there is deliberately no "retryable" variant here.

/// Why a bearer token could not be decoded.
///
/// Any of these means the token is unusable and the login attempt is
/// dead; the session layer treats them all as fatal.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The string does not split into the three `header.payload.signature`
    /// segments every bearer token has.
    #[error("token is not a three-part bearer token")]
    Structure,

    /// The payload segment is not valid URL-safe base64.
    #[error("token payload is not valid base64: {0}")]
    Encoding(base64::DecodeError),

    /// The payload decoded to bytes but those bytes are not the expected
    /// JSON claim object (bad JSON, wrong field types, missing required
    /// fields, an out-of-range expiry).
    #[error("token payload is not a valid claim set: {0}")]
    Payload(serde_json::Error),

    /// The claim is present in the JSON but empty — an empty subject or
    /// an empty role set is as unusable as a missing one.
    #[error("token claim is empty: {0}")]
    EmptyClaim(&'static str),
}
