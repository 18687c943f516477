use thiserror::Error;

/// Error type for credential extraction from request headers.
///
/// Messages deliberately never echo header contents back.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Authorization header is missing")]
    MissingHeader,

    #[error("Authorization header uses the wrong scheme (expected {expected})")]
    InvalidScheme { expected: &'static str },

    #[error("Authorization header carries no credential")]
    MissingToken,

    #[error("Authorization header is malformed")]
    MalformedHeader,
}
