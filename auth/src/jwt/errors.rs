use thiserror::Error;

/// Error type for token issuance and validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Token codec is not initialized")]
    NotInitialized,

    #[error("Token codec is already initialized")]
    AlreadyInitialized,

    #[error("Invalid token settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature mismatch")]
    SignatureMismatch,

    #[error("Unexpected signing algorithm")]
    UnexpectedAlgorithm,

    #[error("Token is expired")]
    Expired,

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token claims are invalid: {0}")]
    InvalidClaims(String),
}
