//! Request authentication from a bearer header or the session cookie.
//!
//! Header shape is checked before the token is looked at, so a badly formed
//! `Authorization` header (400) is never confused with a bad token (401).
//! Browser clients send only the `token` cookie; it is read when no
//! `Authorization` header is present.

use crate::{
    folio::session::session_token,
    keys::{Keys, SigningKey},
    token::{self, AuthError, Claims},
};
use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

const BEARER_PREFIX: &str = "Bearer ";

/// Strip the `Bearer ` scheme, returning the raw token.
fn bearer_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthError::MalformedHeader)?;

    if token.is_empty() || token.contains(' ') {
        return Err(AuthError::MalformedHeader);
    }

    Ok(token)
}

/// Resolve an `Authorization` header value into verified claims.
///
/// # Errors
/// [`AuthError::MalformedHeader`] unless the value is exactly `Bearer <token>`,
/// otherwise any error from [`token::verify`].
pub fn authenticate(header: &str, key: &SigningKey) -> Result<Claims, AuthError> {
    token::verify(bearer_token(header)?, key)
}

/// Same as [`authenticate`] with an explicit clock.
///
/// # Errors
/// See [`authenticate`].
pub fn authenticate_at(header: &str, key: &SigningKey, now: i64) -> Result<Claims, AuthError> {
    token::verify_at(bearer_token(header)?, key, now)
}

/// HTTP status for an authentication failure.
#[must_use]
pub const fn status_for(err: AuthError) -> StatusCode {
    match err {
        AuthError::MalformedHeader | AuthError::Malformed => StatusCode::BAD_REQUEST,
        AuthError::Missing | AuthError::SignatureInvalid | AuthError::Expired => {
            StatusCode::UNAUTHORIZED
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (status_for(self), self.to_string()).into_response()
    }
}

/// Authenticate a request from its headers.
///
/// An `Authorization` header wins when present and must be `Bearer <token>`.
/// Otherwise the `token` cookie is verified as is, and a request with neither
/// is [`AuthError::Missing`].
///
/// # Errors
/// Returns the classified [`AuthError`].
pub fn require_auth(headers: &HeaderMap, keys: &Keys) -> Result<Claims, AuthError> {
    let result = match headers.get(AUTHORIZATION) {
        Some(value) => value
            .to_str()
            .map_err(|_| AuthError::MalformedHeader)
            .and_then(|header| authenticate(header, &keys.signing)),
        None => session_token(headers)
            .ok_or(AuthError::Missing)
            .and_then(|cookie| token::verify(cookie, &keys.signing)),
    };

    match result {
        Ok(claims) => {
            debug!("Auth Success: token is valid");

            Ok(claims)
        }
        Err(err) => {
            warn!(category = err.category(), "Auth Error: {}", err);

            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{keys::CipherKey, token::IssueError};
    use axum::http::{header::COOKIE, HeaderValue};

    const NOW: i64 = 1_700_000_000;

    fn keys() -> Keys {
        match SigningKey::new(b"testkey") {
            Ok(signing) => Keys {
                signing,
                cipher: CipherKey::new([1u8; 32]),
            },
            Err(err) => panic!("test key: {err}"),
        }
    }

    #[test]
    fn header_shape_is_checked_first() {
        let keys = keys();
        for header in [
            "",
            "InvalidTokenFormat",
            "Bearer",
            "Bearer ",
            "bearer abc.def.ghi",
            "Bearer  abc.def.ghi",
            "Bearer abc def",
            "Basic dXNlcjpwYXNz",
        ] {
            assert_eq!(
                authenticate(header, &keys.signing),
                Err(AuthError::MalformedHeader),
                "header {header:?}"
            );
        }
    }

    #[test]
    fn valid_bearer_is_accepted() -> Result<(), IssueError> {
        let keys = keys();
        let token = token::issue(123, "test@example.com", &keys.signing)?;

        let claims = authenticate(&format!("Bearer {token}"), &keys.signing);
        assert_eq!(claims.map(|c| c.id), Ok(123));
        Ok(())
    }

    #[test]
    fn invalid_token_is_not_a_header_error() {
        let keys = keys();
        assert_eq!(
            authenticate("Bearer InvalidToken", &keys.signing),
            Err(AuthError::Malformed)
        );
        assert_eq!(
            authenticate("Bearer a.b.c", &keys.signing),
            Err(AuthError::SignatureInvalid)
        );
    }

    #[test]
    fn expiry_through_the_header() -> Result<(), IssueError> {
        let keys = keys();
        let token = token::issue_at(123, "test@example.com", &keys.signing, NOW)?;
        let header = format!("Bearer {token}");

        assert!(authenticate_at(&header, &keys.signing, NOW + 3599).is_ok());
        assert_eq!(
            authenticate_at(&header, &keys.signing, NOW + 3601),
            Err(AuthError::Expired)
        );
        Ok(())
    }

    #[test]
    fn status_mapping() {
        assert_eq!(status_for(AuthError::MalformedHeader), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(AuthError::Malformed), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(AuthError::SignatureInvalid), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(AuthError::Expired), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(AuthError::Missing), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn require_auth_reads_authorization_header() -> Result<(), IssueError> {
        let keys = keys();
        let mut headers = HeaderMap::new();
        assert_eq!(require_auth(&headers, &keys).err(), Some(AuthError::Missing));

        let token = token::issue(7, "a@example.com", &keys.signing)?;
        let value = HeaderValue::from_str(&format!("Bearer {token}"));
        assert!(value.is_ok());
        if let Ok(value) = value {
            headers.insert(AUTHORIZATION, value);
        }
        assert_eq!(
            require_auth(&headers, &keys).map(|c| c.email),
            Ok("a@example.com".to_string())
        );
        Ok(())
    }

    #[test]
    fn require_auth_falls_back_to_cookie() -> Result<(), IssueError> {
        let keys = keys();
        let token = token::issue(7, "a@example.com", &keys.signing)?;
        let mut headers = HeaderMap::new();

        let cookie = HeaderValue::from_str(&format!("theme=dark; token={token}"));
        assert!(cookie.is_ok());
        if let Ok(cookie) = cookie {
            headers.insert(COOKIE, cookie);
        }
        assert_eq!(require_auth(&headers, &keys).map(|c| c.id), Ok(7));

        headers.insert(COOKIE, HeaderValue::from_static("token=a.b.c"));
        assert_eq!(
            require_auth(&headers, &keys).err(),
            Some(AuthError::SignatureInvalid)
        );

        headers.insert(COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(require_auth(&headers, &keys).err(), Some(AuthError::Missing));
        Ok(())
    }

    #[test]
    fn authorization_header_wins_over_cookie() -> Result<(), IssueError> {
        let keys = keys();
        let token = token::issue(7, "a@example.com", &keys.signing)?;
        let mut headers = HeaderMap::new();

        let cookie = HeaderValue::from_str(&format!("token={token}"));
        assert!(cookie.is_ok());
        if let Ok(cookie) = cookie {
            headers.insert(COOKIE, cookie);
        }
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        assert_eq!(
            require_auth(&headers, &keys).err(),
            Some(AuthError::MalformedHeader)
        );
        Ok(())
    }
}
