//! # Folio (identity tokens and share links)
//!
//! The security boundary of the portfolio backend:
//!
//! - [`token`] issues and verifies signed, one-hour identity tokens (HS256 JWT).
//! - [`cipher`] turns an internal identifier into an opaque pass token
//!   (AES-256-CFB, random IV, base64url) and back.
//! - [`csrf`] generates CSRF tokens returned alongside a session grant.
//! - [`folio`] is the HTTP surface: the uniform CORS boundary, the bearer
//!   request authenticator and the auth/pass/health endpoints.
//!
//! Keys are loaded once at startup ([`keys::Keys`]) and passed explicitly to
//! every call; a cipher key that does not decode to 32 bytes stops the process
//! before it binds a socket.

pub mod cipher;
pub mod cli;
pub mod csrf;
pub mod folio;
pub mod keys;
pub mod token;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
    }
}
