use thiserror::Error;

/// Token and permission failures. `Display` is the client-facing description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    MissingHeader,
    #[error("{0}")]
    InvalidHeader(String),
    #[error("Token expired.")]
    TokenExpired,
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,
    #[error("Permissions not included in JWT.")]
    PermissionsMissing,
    #[error("Permission not found.")]
    PermissionDenied,
    #[error("Unable to fetch signing keys.")]
    KeySetUnavailable,
}

impl AuthError {
    pub(crate) fn invalid_header(description: &str) -> Self {
        AuthError::InvalidHeader(description.to_string())
    }

    /// Stable machine-readable code for the error response
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "authorization_header_missing",
            AuthError::InvalidHeader(_) => "invalid_header",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::PermissionDenied => "invalid_permissions",
            AuthError::KeySetUnavailable => "jwks_unavailable",
        }
    }

    /// HTTP status: 401 for authentication failures, 403 for missing scopes.
    pub fn status(&self) -> u16 {
        match self {
            AuthError::PermissionsMissing | AuthError::PermissionDenied => 403,
            _ => 401,
        }
    }
}
