//! Error types for upload signing

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, SigningError>;

/// Signing error types
#[derive(Debug, Error)]
pub enum SigningError {
    /// A required credential is not configured on the server
    #[error("Missing configuration: {0} is not set")]
    ConfigurationMissing(&'static str),
}
