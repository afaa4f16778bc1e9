//! Media API credentials and grant issuance

use std::fmt;

use sha1::{Digest, Sha1};
use tracing::debug;

use crate::error::{Result, SigningError};
use crate::grant::UploadGrant;

const ENV_API_KEY: &str = "CLOUDINARY_API_KEY";
const ENV_API_SECRET: &str = "CLOUDINARY_API_SECRET";
const ENV_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";

/// Credentials for the third-party media-upload API.
///
/// The secret stays inside this struct; grants carry only the derived
/// signature.
#[derive(Clone)]
pub struct SigningCredentials {
    api_key: String,
    cloud_name: String,
    api_secret: String,
}

impl fmt::Debug for SigningCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningCredentials")
            .field("api_key", &self.api_key)
            .field("cloud_name", &self.cloud_name)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

impl SigningCredentials {
    /// Create from explicit values
    pub fn new(
        api_key: impl Into<String>,
        cloud_name: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            cloud_name: cloud_name.into(),
            api_secret: api_secret.into(),
        }
    }

    /// Load credentials from the environment.
    ///
    /// Fails with [`SigningError::ConfigurationMissing`] naming the first
    /// variable that is absent or empty.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(
            require_env(ENV_API_KEY)?,
            require_env(ENV_CLOUD_NAME)?,
            require_env(ENV_API_SECRET)?,
        ))
    }

    /// Account (cloud) name
    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    /// Issue a grant stamped with the current Unix time.
    pub fn issue_grant_now(&self, folder: &str) -> UploadGrant {
        self.issue_grant(folder, chrono::Utc::now().timestamp())
    }

    /// Issue a grant for an explicit timestamp.
    ///
    /// The canonical parameter string is `timestamp=<ts>`, with
    /// `&folder=<folder>` appended when a folder is given; the signature is
    /// the hex SHA-1 of that string followed by the API secret. The upstream
    /// recomputes the same digest, so the grant only verifies for these exact
    /// parameter values.
    pub fn issue_grant(&self, folder: &str, timestamp: i64) -> UploadGrant {
        let mut params = format!("timestamp={}", timestamp);
        if !folder.is_empty() {
            params.push_str("&folder=");
            params.push_str(folder);
        }

        let signature = sign_params(&params, &self.api_secret);
        debug!(timestamp, folder, "issued upload grant");

        UploadGrant {
            api_key: self.api_key.clone(),
            cloud_name: self.cloud_name.clone(),
            timestamp,
            signature,
            folder: folder.to_string(),
        }
    }
}

/// Hex SHA-1 over the parameter string with the secret appended.
fn sign_params(params: &str, secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(params.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn require_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(SigningError::ConfigurationMissing(name)),
    }
}
