use thiserror::Error;

use crate::claims::TokenValidationError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("access token required")]
    MissingToken,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token has expired")]
    Expired,

    #[error("session has been logged out")]
    Revoked,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

impl AuthError {
    /// Whether the failure is the caller's fault (401) rather than ours (500).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::Hashing(_) | AuthError::Encoding(_))
    }
}

impl From<TokenValidationError> for AuthError {
    fn from(value: TokenValidationError) -> Self {
        match value {
            TokenValidationError::Expired => AuthError::Expired,
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}
