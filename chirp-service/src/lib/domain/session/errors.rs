use thiserror::Error;

use crate::user::errors::UserError;

/// Failure kinds surfaced by session operations.
///
/// Display strings are the safe messages handed to the request layer;
/// internal detail stays in the variant payloads and is only ever logged.
/// Raw tokens and secrets appear in neither.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error(transparent)]
    MissingCredential(#[from] auth::ExtractError),

    #[error("Invalid token")]
    InvalidToken(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Unknown refresh token")]
    RefreshNotFound,

    #[error("Refresh token is expired")]
    RefreshExpired,

    #[error("Refresh token is revoked")]
    RefreshRevoked,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Failed to sign access token")]
    SigningFailed(String),

    #[error("Service temporarily unavailable")]
    Unavailable(String),

    #[error("Database error")]
    DatabaseError(String),

    #[error("Internal error")]
    Unknown(String),
}

impl From<UserError> for AuthError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DatabaseError(detail) => AuthError::DatabaseError(detail),
            other => AuthError::Unknown(other.to_string()),
        }
    }
}

impl From<auth::JwtError> for AuthError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::TokenExpired => AuthError::TokenExpired,
            auth::JwtError::EncodingFailed(detail) => AuthError::SigningFailed(detail),
            other => AuthError::InvalidToken(other.to_string()),
        }
    }
}
