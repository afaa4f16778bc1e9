//! HTTP clients for the relay and the media-upload API

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use greetlink_signing::UploadGrant;

/// Timeout for relay round trips
const RELAY_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout for a single photo upload
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Client-side error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// The relay could not be reached or answered with an error
    #[error("Relay request failed: {0}")]
    Relay(String),

    /// The relay's shorten endpoint failed; caller falls back to the full link
    #[error("Shortener unavailable: {0}")]
    ShortenerUnavailable(String),

    /// One photo upload failed; caller skips the photo and continues
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    /// Photo file exceeds the configured size cap
    #[error("Photo too large: {size} bytes exceeds maximum {max}")]
    PhotoTooLarge { size: u64, max: u64 },

    /// Photo file could not be read
    #[error("Photo unreadable: {0}")]
    PhotoUnreadable(String),
}

/// Anything that can shorten a share link
#[async_trait]
pub trait Shortener: Send + Sync {
    async fn shorten(&self, url: &str) -> Result<String, ClientError>;
}

/// Anything that can turn a local photo into a hosted URL
#[async_trait]
pub trait PhotoUploader: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<String, ClientError>;
}

/// Client for the share relay service
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

/// Shorten response body
#[derive(Debug, Deserialize)]
struct ShortenResponse {
    shorturl: String,
}

impl RelayClient {
    /// Create a client against the relay at `base_url`.
    pub fn new(base_url: impl Into<String>) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(RELAY_TIMEOUT)
            .connect_timeout(RELAY_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Request a signed upload grant for `folder`.
    pub async fn sign(&self, folder: &str) -> Result<UploadGrant, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/v1/sign", self.base_url))
            .json(&serde_json::json!({ "folder": folder }))
            .send()
            .await
            .map_err(|e| ClientError::Relay(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Relay(format!("sign returned {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::Relay(e.to_string()))
    }
}

#[async_trait]
impl Shortener for RelayClient {
    async fn shorten(&self, url: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/api/v1/shorten", self.base_url))
            .json(&serde_json::json!({ "url": url }))
            .send()
            .await
            .map_err(|e| ClientError::ShortenerUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::ShortenerUnavailable(format!(
                "shorten returned {}",
                status
            )));
        }

        let body: ShortenResponse = response
            .json()
            .await
            .map_err(|e| ClientError::ShortenerUnavailable(e.to_string()))?;
        Ok(body.shorturl)
    }
}

/// Uploads photos directly to the media API under per-photo signed grants.
///
/// The relay only ever sees the grant request; file bytes go straight to the
/// upstream.
pub struct MediaUploader {
    relay: RelayClient,
    http: reqwest::Client,
    folder: String,
    max_photo_bytes: u64,
}

/// Media API upload response; the hosted URL arrives as `secure_url` with a
/// plain `url` fallback on older accounts.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    url: Option<String>,
}

impl MediaUploader {
    /// Create an uploader that signs through `relay`.
    pub fn new(
        relay: RelayClient,
        folder: impl Into<String>,
        max_photo_bytes: u64,
    ) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(UPLOAD_TIMEOUT).build()?;
        Ok(Self {
            relay,
            http,
            folder: folder.into(),
            max_photo_bytes,
        })
    }
}

#[async_trait]
impl PhotoUploader for MediaUploader {
    async fn upload(&self, path: &Path) -> Result<String, ClientError> {
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| ClientError::PhotoUnreadable(format!("{}: {}", path.display(), e)))?;
        if metadata.len() > self.max_photo_bytes {
            return Err(ClientError::PhotoTooLarge {
                size: metadata.len(),
                max: self.max_photo_bytes,
            });
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ClientError::PhotoUnreadable(format!("{}: {}", path.display(), e)))?;

        // One grant per upload; the signature only covers this
        // timestamp/folder pair
        let grant = self.relay.sign(&self.folder).await?;
        debug!(path = %path.display(), timestamp = grant.timestamp, "uploading photo");

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());

        let mut form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            )
            .text("timestamp", grant.timestamp.to_string())
            .text("api_key", grant.api_key.clone())
            .text("signature", grant.signature.clone());
        if !grant.folder.is_empty() {
            form = form.text("folder", grant.folder.clone());
        }

        let response = self
            .http
            .post(grant.upload_endpoint())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ClientError::UploadFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(%status, "media upload rejected");
            return Err(ClientError::UploadFailed(format!("{}: {}", status, text)));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ClientError::UploadFailed(e.to_string()))?;

        body.secure_url
            .or(body.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ClientError::UploadFailed("no url in upload response".to_string()))
    }
}
