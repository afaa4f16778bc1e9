//! Error types for GreetLink core

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, CodecError>;

/// Codec error types
#[derive(Debug, Error)]
pub enum CodecError {
    /// Token could not be decoded back into a greeting
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Payload could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Serialization(err.to_string())
    }
}
