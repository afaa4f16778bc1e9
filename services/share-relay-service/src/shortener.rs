//! Upstream link-shortener client
//!
//! Proxies long share links to a public shortening service so browser
//! clients never depend on that service's availability or CORS posture
//! directly. One GET per request, no retries; a failed upstream call is the
//! caller's cue to fall back to the full link.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RelayError;

/// Public shortening endpoint used in production
pub const DEFAULT_ENDPOINT: &str = "https://is.gd/create.php";

/// Client for the upstream shortening service
#[derive(Clone)]
pub struct UrlShortener {
    client: reqwest::Client,
    endpoint: String,
}

/// JSON body of a shortening response.
///
/// The upstream reports some failures as a 200 with `errormessage` set
/// instead of a non-success status.
#[derive(Debug, Deserialize)]
struct CreateResponse {
    shorturl: Option<String>,
    errormessage: Option<String>,
}

impl UrlShortener {
    /// Create a client against `endpoint` with a bounded per-request timeout.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// Shorten `url`, returning the short form.
    pub async fn shorten(&self, url: &str) -> Result<String, RelayError> {
        debug!(url, "forwarding to shortener upstream");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("url", url)])
            .send()
            .await
            .map_err(|e| RelayError::ShortenerUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "shortener upstream returned an error status");
            return Err(RelayError::ShortenerUnavailable(format!(
                "upstream status {}",
                status
            )));
        }

        let body: CreateResponse = response
            .json()
            .await
            .map_err(|e| RelayError::ShortenerUnavailable(e.to_string()))?;

        match body.shorturl {
            Some(short) if !short.is_empty() => Ok(short),
            _ => {
                let reason = body
                    .errormessage
                    .unwrap_or_else(|| "no shorturl in upstream response".to_string());
                warn!(reason = %reason, "shortener upstream rejected the url");
                Err(RelayError::ShortenerUnavailable(reason))
            }
        }
    }
}
