use thiserror::Error;

/// Error type for token operations.
///
/// Validation variants carry no detail from the underlying decoder so that
/// nothing about the key or parser leaks to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token is malformed")]
    Malformed,

    #[error("Token signing algorithm is not accepted")]
    UnexpectedAlgorithm,

    #[error("Token signature is invalid")]
    WrongSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token is not yet valid")]
    NotYetValid,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signing secret is missing")]
    MissingSecret,
}
