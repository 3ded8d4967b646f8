//! Session grants: a fresh identity token delivered as body field, cookie and CSRF header.
//!
//! Login and registration hand a [`SessionGrant`] back as their response; the
//! cookie is read again by [`session_token`] on later requests.

use crate::{
    csrf,
    keys::SigningKey,
    token::{self, TOKEN_TTL_SECONDS},
};
use anyhow::{Context, Result};
use axum::{
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap, HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

pub const SESSION_COOKIE: &str = "token";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
}

#[derive(Debug)]
pub struct SessionGrant {
    message: &'static str,
    token: String,
    csrf_token: String,
}

impl SessionGrant {
    /// Issue a token and a CSRF token for the subject.
    ///
    /// # Errors
    /// Returns an error if the token cannot be signed or the random source fails.
    pub fn issue(id: i64, email: &str, message: &'static str, key: &SigningKey) -> Result<Self> {
        let token = token::issue(id, email, key).context("Error generating JWT")?;
        let csrf_token = csrf::generate()?;

        Ok(Self {
            message,
            token,
            csrf_token,
        })
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(SET_COOKIE, HeaderValue::from_str(&session_cookie(&self.token))?);
        headers.insert(
            HeaderName::from_static("x-csrf-token"),
            HeaderValue::from_str(&self.csrf_token)?,
        );
        Ok(headers)
    }
}

/// Token carried by the `token` cookie of a request, if any.
#[must_use]
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(COOKIE)?.to_str().ok()?;
    value
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| name.trim() == SESSION_COOKIE)
        .map(|(_, token)| token.trim())
}

/// `Set-Cookie` value carrying the token; lives exactly as long as the token.
#[must_use]
pub fn session_cookie(token: &str) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; Max-Age={TOKEN_TTL_SECONDS}; HttpOnly; Secure; SameSite=Strict"
    )
}

impl IntoResponse for SessionGrant {
    fn into_response(self) -> Response {
        match self.headers() {
            Ok(headers) => (
                headers,
                Json(SessionResponse {
                    message: self.message.to_string(),
                    token: self.token,
                }),
            )
                .into_response(),
            Err(err) => {
                error!("Failed to build session headers: {}", err);

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to issue session".to_string(),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_attributes() {
        let cookie = session_cookie("abc.def.ghi");
        assert!(cookie.starts_with("token=abc.def.ghi; "));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn grant_sets_cookie_and_csrf_header() -> Result<()> {
        let key = SigningKey::new(b"testkey")?;
        let grant = SessionGrant::issue(123, "test@example.com", "ok", &key)?;
        let issued = grant.token.clone();

        let response = grant.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);
        assert_eq!(cookie, Some(session_cookie(&issued)));

        let csrf_len = response
            .headers()
            .get("x-csrf-token")
            .map(HeaderValue::len);
        assert_eq!(csrf_len, Some(44));

        assert_eq!(token::verify(&issued, &key).map(|c| c.id), Ok(123));
        Ok(())
    }

    #[test]
    fn session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; other=1"));
        assert_eq!(session_token(&headers), None);

        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; token=abc.def.ghi; tokenx=nope"),
        );
        assert_eq!(session_token(&headers), Some("abc.def.ghi"));

        headers.insert(COOKIE, HeaderValue::from_static("token="));
        assert_eq!(session_token(&headers), Some(""));
    }
}
