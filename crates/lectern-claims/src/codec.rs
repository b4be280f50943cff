//! The token decoder: opaque bearer string → typed [`Claims`].

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::{Claims, TokenError};

/// Decodes a bearer token's payload into its [`Claims`].
///
/// This is a pure function: no I/O, no clock reads, no retries. It
/// splits the token on `.`, base64url-decodes the middle segment, parses
/// the JSON claim object, and checks that the subject and role set are
/// non-empty. The signature segment is carried but never verified — see
/// the crate docs for why.
///
/// # Errors
///
/// Every failure is a [`TokenError`]; all of them are fatal to the login
/// attempt that produced the token:
/// - [`TokenError::Structure`] — not three dot-separated segments
/// - [`TokenError::Encoding`] — payload is not URL-safe base64
/// - [`TokenError::Payload`] — payload bytes are not the claim JSON
/// - [`TokenError::EmptyClaim`] — `sub` or `roles` present but empty
pub fn decode(token: &str) -> Result<Claims, TokenError> {
    let mut segments = token.split('.');
    let payload = match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        // Exactly three segments; the header and signature are opaque
        // to this layer.
        (Some(_header), Some(payload), Some(_signature), None) => payload,
        _ => return Err(TokenError::Structure),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(TokenError::Encoding)?;

    let claims: Claims =
        serde_json::from_slice(&bytes).map_err(TokenError::Payload)?;

    if claims.sub.is_empty() {
        return Err(TokenError::EmptyClaim("sub"));
    }
    if claims.roles.is_empty() {
        return Err(TokenError::EmptyClaim("roles"));
    }

    Ok(claims)
}

// =========================================================================
// Tests
// =========================================================================
