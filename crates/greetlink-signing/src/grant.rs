//! Upload grants

use serde::{Deserialize, Serialize};

/// A one-shot authorization for a direct client upload to the media API.
///
/// The grant is only honored by the upstream for a short window around
/// `timestamp`, and only for the exact `timestamp`/`folder` values the
/// signature was computed over; the client must submit them unmodified.
/// Grants are never persisted anywhere.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadGrant {
    /// Public API key of the media account
    pub api_key: String,
    /// Account (cloud) name, selects the upload endpoint
    pub cloud_name: String,
    /// Unix seconds the signature was computed at
    pub timestamp: i64,
    /// Hex SHA-1 over the canonical parameter string plus the API secret
    pub signature: String,
    /// Target folder, or empty
    pub folder: String,
}

impl UploadGrant {
    /// Upload endpoint this grant is valid against.
    pub fn upload_endpoint(&self) -> String {
        format!("https://api.cloudinary.com/v1_1/{}/upload", self.cloud_name)
    }
}
