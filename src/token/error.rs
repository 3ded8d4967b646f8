use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum AuthError {
    #[error("No auth token provided")]
    Missing,
    #[error("Authorization header must be in format 'Bearer {{token}}'")]
    MalformedHeader,
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
}

impl AuthError {
    /// Short label for logs and metrics; never includes token material.
    #[must_use]
    pub const fn category(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::MalformedHeader => "malformed_header",
            Self::Malformed => "malformed_token",
            Self::SignatureInvalid => "signature_invalid",
            Self::Expired => "expired",
        }
    }
}

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
    #[error("invalid signing key length")]
    KeyLength,
}
