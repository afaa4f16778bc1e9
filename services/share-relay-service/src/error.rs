//! Error types for the Share Relay Service

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Relay error types
#[derive(Debug, Error)]
pub enum RelayError {
    /// Shorten request carried no URL
    #[error("Missing url")]
    MissingUrl,

    /// Media upload credentials are not configured on this server
    #[error("Upload signing is not configured")]
    SigningUnconfigured,

    /// The upstream shortening service could not be used
    #[error("Shortener unavailable: {0}")]
    ShortenerUnavailable(String),
}

impl ResponseError for RelayError {
    fn error_response(&self) -> HttpResponse {
        match self {
            Self::MissingUrl => HttpResponse::BadRequest().json(serde_json::json!({
                "error": "missing_url",
                "message": self.to_string()
            })),
            Self::SigningUnconfigured => {
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "configuration_missing",
                    "message": self.to_string()
                }))
            }
            Self::ShortenerUnavailable(_) => HttpResponse::BadGateway().json(serde_json::json!({
                "error": "shortener_unavailable",
                "message": self.to_string()
            })),
        }
    }
}
