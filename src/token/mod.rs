//! Signed identity tokens.
//!
//! Tokens are compact HS256 JWTs: `base64url(header).base64url(claims).base64url(mac)`.
//! The server keeps no session state; a token is valid when its MAC verifies
//! under the current signing key and `now < exp`.

mod error;

pub use error::{AuthError, IssueError};

use crate::keys::SigningKey;
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use utoipa::ToSchema;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of every issued token.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

const ALG_HS256: &str = "HS256";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenHeader {
    pub alg: String,
    pub typ: String,
}

impl TokenHeader {
    fn hs256() -> Self {
        Self {
            alg: ALG_HS256.to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Identity asserted by a token.
#[derive(ToSchema, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub id: i64,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Current unix time in seconds.
#[must_use]
pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
}

fn b64e_json<T: Serialize>(value: &T) -> Result<String, IssueError> {
    let json = serde_json::to_vec(value)?;
    Ok(Base64UrlUnpadded::encode_string(&json))
}

fn b64d_json<T: for<'de> Deserialize<'de>>(s: &str) -> Result<T, AuthError> {
    let bytes = Base64UrlUnpadded::decode_vec(s).map_err(|_| AuthError::Malformed)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::Malformed)
}

/// Issue a token for `id`/`email` that expires one hour from now.
///
/// # Errors
/// Returns an error if the header or claims cannot be encoded.
pub fn issue(id: i64, email: &str, key: &SigningKey) -> Result<String, IssueError> {
    issue_at(id, email, key, now_unix())
}

/// Same as [`issue`] with an explicit clock.
///
/// # Errors
/// Returns an error if the header or claims cannot be encoded.
pub fn issue_at(id: i64, email: &str, key: &SigningKey, now: i64) -> Result<String, IssueError> {
    let claims = Claims {
        id,
        email: email.to_string(),
        iat: now,
        exp: now.saturating_add(TOKEN_TTL_SECONDS),
    };

    sign(&TokenHeader::hs256(), &claims, key)
}

fn sign(header: &TokenHeader, claims: &Claims, key: &SigningKey) -> Result<String, IssueError> {
    let header_b64 = b64e_json(header)?;
    let claims_b64 = b64e_json(claims)?;
    let signing_input = format!("{header_b64}.{claims_b64}");

    let mut mac = HmacSha256::new_from_slice(key.bytes()).map_err(|_| IssueError::KeyLength)?;
    mac.update(signing_input.as_bytes());
    let signature_b64 = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());

    Ok(format!("{signing_input}.{signature_b64}"))
}

/// Verify a token against the current clock.
///
/// # Errors
/// See [`verify_at`].
pub fn verify(token: &str, key: &SigningKey) -> Result<Claims, AuthError> {
    verify_at(token, key, now_unix())
}

/// Verify a token and return its claims.
///
/// The MAC is checked over the raw `header.claims` text before either segment
/// is decoded, so any change inside a segment is reported as
/// [`AuthError::SignatureInvalid`]. A wrong key is indistinguishable from a
/// forged token.
///
/// # Errors
///
/// - [`AuthError::Malformed`] if the token does not have three segments, or
///   the header/claims are not valid base64url JSON, or the algorithm is not HS256;
/// - [`AuthError::SignatureInvalid`] if the MAC does not verify;
/// - [`AuthError::Expired`] if `now >= exp`.
pub fn verify_at(token: &str, key: &SigningKey, now: i64) -> Result<Claims, AuthError> {
    let mut parts = token.split('.');
    let header_b64 = parts.next().ok_or(AuthError::Malformed)?;
    let claims_b64 = parts.next().ok_or(AuthError::Malformed)?;
    let sig_b64 = parts.next().ok_or(AuthError::Malformed)?;
    if parts.next().is_some() {
        return Err(AuthError::Malformed);
    }

    let signature =
        Base64UrlUnpadded::decode_vec(sig_b64).map_err(|_| AuthError::SignatureInvalid)?;

    // Reject alternate spellings of the same signature bytes.
    if Base64UrlUnpadded::encode_string(&signature) != sig_b64 {
        return Err(AuthError::SignatureInvalid);
    }

    let mut mac =
        HmacSha256::new_from_slice(key.bytes()).map_err(|_| AuthError::SignatureInvalid)?;
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(claims_b64.as_bytes());
    mac.verify_slice(&signature)
        .map_err(|_| AuthError::SignatureInvalid)?;

    let header: TokenHeader = b64d_json(header_b64)?;
    if header.alg != ALG_HS256 {
        return Err(AuthError::Malformed);
    }

    let claims: Claims = b64d_json(claims_b64)?;
    if now >= claims.exp {
        return Err(AuthError::Expired);
    }

    Ok(claims)
}
