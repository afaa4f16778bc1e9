//! Greeting composition
//!
//! All selection state lives on the [`Composer`]; the orchestration functions
//! take the uploader and shortener as trait objects so every step can degrade
//! gracefully without aborting the whole share action.

use std::path::PathBuf;

use tracing::warn;

use greetlink_core::{build_share_url, GreetingPayload, Result as CodecResult, MAX_PHOTOS, SOFT_LINK_LIMIT};

use crate::client::{PhotoUploader, Shortener};

/// Composer state for one greeting
#[derive(Clone, Debug, Default)]
pub struct Composer {
    pub from: String,
    pub to: String,
    pub date: String,
    pub template: String,
    pub text: String,
    pub youtube: String,
    gifts: Vec<String>,
    photos: Vec<String>,
}

/// What happened to one selected photo
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhotoOutcome {
    /// Photo now lives at a hosted URL and is part of the payload
    Uploaded { path: PathBuf, url: String },
    /// Photo was skipped; the rest of the sequence continued
    Skipped { path: PathBuf, reason: String },
}

/// Result of generating a share link
#[derive(Clone, Debug)]
pub struct ShareOutcome {
    /// The link to hand to the user; never empty
    pub url: String,
    /// The full (un-shortened) link
    pub full_url: String,
    /// Whether `url` came back from the shortener
    pub shortened: bool,
    /// Whether the full link crossed the soft length threshold
    pub oversize: bool,
    /// User-facing warning when something degraded
    pub warning: Option<String>,
}

impl Composer {
    /// Create an empty composer
    pub fn new() -> Self {
        Self::default()
    }

    /// Select or deselect a gift token, preserving first-selection order.
    pub fn toggle_gift(&mut self, token: &str) {
        if let Some(idx) = self.gifts.iter().position(|g| g == token) {
            self.gifts.remove(idx);
        } else {
            self.gifts.push(token.to_string());
        }
    }

    /// Currently selected gifts in selection order
    pub fn gifts(&self) -> &[String] {
        &self.gifts
    }

    /// Uploaded photo URLs in selection order
    pub fn photos(&self) -> &[String] {
        &self.photos
    }

    /// Upload the selected photos one at a time.
    ///
    /// Only the first [`MAX_PHOTOS`] files are attempted; a failed upload is
    /// skipped with a warning and the remaining photos still go through, so
    /// the surviving URLs keep their selection order.
    pub async fn attach_photos(
        &mut self,
        paths: &[PathBuf],
        uploader: &dyn PhotoUploader,
    ) -> Vec<PhotoOutcome> {
        self.photos.clear();
        let mut outcomes = Vec::with_capacity(paths.len());

        for (idx, path) in paths.iter().enumerate() {
            if idx >= MAX_PHOTOS {
                outcomes.push(PhotoOutcome::Skipped {
                    path: path.clone(),
                    reason: format!("only the first {} photos are shared", MAX_PHOTOS),
                });
                continue;
            }

            match uploader.upload(path).await {
                Ok(url) => {
                    self.photos.push(url.clone());
                    outcomes.push(PhotoOutcome::Uploaded {
                        path: path.clone(),
                        url,
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), "photo upload failed: {}", e);
                    outcomes.push(PhotoOutcome::Skipped {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        outcomes
    }

    /// Assemble the payload from the current state.
    pub fn payload(&self) -> GreetingPayload {
        GreetingPayload {
            from: self.from.clone(),
            to: self.to.clone(),
            date: self.date.clone(),
            template: self.template.clone(),
            text: self.text.clone(),
            gifts: self.gifts.clone(),
            youtube: self.youtube.clone(),
            photos: self.photos.iter().take(MAX_PHOTOS).cloned().collect(),
        }
    }

    /// Encode the payload and produce the link to share.
    ///
    /// Shortening failures fall back to the full link with a warning; the
    /// share action itself never fails past encoding.
    pub async fn generate_link(
        &self,
        share_base: &str,
        shortener: &dyn Shortener,
    ) -> CodecResult<ShareOutcome> {
        let full_url = build_share_url(share_base, &self.payload())?;
        let oversize = full_url.len() > SOFT_LINK_LIMIT;

        match shortener.shorten(&full_url).await {
            Ok(shorturl) => Ok(ShareOutcome {
                url: shorturl,
                full_url: full_url.clone(),
                shortened: true,
                oversize,
                warning: None,
            }),
            Err(e) => {
                warn!("link shortening failed: {}", e);
                Ok(ShareOutcome {
                    url: full_url.clone(),
                    full_url,
                    shortened: false,
                    oversize,
                    warning: Some(
                        "Could not shorten the link (shortener unavailable). \
                         The full link is provided instead."
                            .to_string(),
                    ),
                })
            }
        }
    }
}

/// WhatsApp share URL for a generated link.
pub fn whatsapp_share_url(link: &str) -> String {
    let url = reqwest::Url::parse_with_params(
        "https://wa.me/",
        &[("text", format!("I made this for you: {}", link))],
    )
    .expect("static base url is valid");
    url.to_string()
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::client::ClientError;

    /// Uploader stub that fails for configured file names
    struct StubUploader {
        fail_on: Vec<&'static str>,
        calls: Mutex<Vec<PathBuf>>,
    }

    impl StubUploader {
        fn failing_on(fail_on: Vec<&'static str>) -> Self {
            Self {
                fail_on,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PhotoUploader for StubUploader {
        async fn upload(&self, path: &Path) -> Result<String, ClientError> {
            self.calls.lock().unwrap().push(path.to_path_buf());
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            if self.fail_on.iter().any(|f| *f == name) {
                Err(ClientError::UploadFailed("simulated failure".to_string()))
            } else {
                Ok(format!("https://res.example.com/{}", name))
            }
        }
    }

    struct StubShortener {
        result: Result<String, ()>,
    }

    #[async_trait]
    impl Shortener for StubShortener {
        async fn shorten(&self, _url: &str) -> Result<String, ClientError> {
            match &self.result {
                Ok(short) => Ok(short.clone()),
                Err(()) => Err(ClientError::ShortenerUnavailable(
                    "simulated outage".to_string(),
                )),
            }
        }
    }

    fn photo_paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn test_toggle_gift_preserves_selection_order() {
        let mut composer = Composer::new();
        composer.toggle_gift("🌹");
        composer.toggle_gift("💍");
        composer.toggle_gift("🍫");
        composer.toggle_gift("💍"); // deselect
        assert_eq!(composer.gifts(), ["🌹", "🍫"]);

        composer.toggle_gift("💍"); // re-select goes to the end
        assert_eq!(composer.gifts(), ["🌹", "🍫", "💍"]);
    }

    #[tokio::test]
    async fn test_failed_photo_is_skipped_order_preserved() {
        let mut composer = Composer::new();
        let uploader = StubUploader::failing_on(vec!["b.jpg"]);

        let outcomes = composer
            .attach_photos(&photo_paths(&["a.jpg", "b.jpg", "c.jpg"]), &uploader)
            .await;

        assert_eq!(
            composer.photos(),
            [
                "https://res.example.com/a.jpg",
                "https://res.example.com/c.jpg"
            ]
        );
        assert!(matches!(outcomes[1], PhotoOutcome::Skipped { .. }));
        // All three were attempted; the failure did not abort the sequence
        assert_eq!(uploader.calls.lock().unwrap().len(), 3);

        let payload = composer.payload();
        assert_eq!(payload.photos.len(), 2);
    }

    #[tokio::test]
    async fn test_photo_cap_applies() {
        let mut composer = Composer::new();
        let uploader = StubUploader::failing_on(vec![]);

        let outcomes = composer
            .attach_photos(
                &photo_paths(&["a.jpg", "b.jpg", "c.jpg", "d.jpg"]),
                &uploader,
            )
            .await;

        assert_eq!(composer.photos().len(), MAX_PHOTOS);
        assert!(matches!(outcomes[3], PhotoOutcome::Skipped { .. }));
        assert_eq!(uploader.calls.lock().unwrap().len(), MAX_PHOTOS);
    }

    #[tokio::test]
    async fn test_reattaching_clears_previous_photos() {
        let mut composer = Composer::new();
        let uploader = StubUploader::failing_on(vec![]);

        composer
            .attach_photos(&photo_paths(&["a.jpg"]), &uploader)
            .await;
        composer
            .attach_photos(&photo_paths(&["b.jpg"]), &uploader)
            .await;

        assert_eq!(composer.photos(), ["https://res.example.com/b.jpg"]);
    }

    #[tokio::test]
    async fn test_generate_link_shortened() {
        let mut composer = Composer::new();
        composer.to = "Maya".to_string();
        let shortener = StubShortener {
            result: Ok("https://is.gd/xyz".to_string()),
        };

        let outcome = composer
            .generate_link("https://greet.example.com/card", &shortener)
            .await
            .unwrap();

        assert_eq!(outcome.url, "https://is.gd/xyz");
        assert!(outcome.shortened);
        assert!(outcome.warning.is_none());
        assert!(outcome.full_url.contains("#data="));
    }

    #[tokio::test]
    async fn test_generate_link_falls_back_to_full_url() {
        let mut composer = Composer::new();
        composer.to = "Maya".to_string();
        let shortener = StubShortener { result: Err(()) };

        let outcome = composer
            .generate_link("https://greet.example.com/card", &shortener)
            .await
            .unwrap();

        assert!(!outcome.shortened);
        assert_eq!(outcome.url, outcome.full_url);
        assert!(!outcome.url.is_empty());
        assert!(outcome.warning.is_some());
    }

    #[tokio::test]
    async fn test_generate_link_flags_oversize() {
        let mut composer = Composer::new();
        composer.text = "x".repeat(SOFT_LINK_LIMIT * 2);
        let shortener = StubShortener { result: Err(()) };

        let outcome = composer
            .generate_link("https://greet.example.com/card", &shortener)
            .await
            .unwrap();
        assert!(outcome.oversize);
    }

    #[test]
    fn test_payload_carries_all_fields() {
        let mut composer = Composer::new();
        composer.from = "Alex".to_string();
        composer.to = "Maya".to_string();
        composer.date = "2026-02-14".to_string();
        composer.template = "hearts".to_string();
        composer.text = "hi".to_string();
        composer.youtube = "https://www.youtube.com/watch?v=abc".to_string();
        composer.toggle_gift("🌹");

        let payload = composer.payload();
        assert_eq!(payload.from, "Alex");
        assert_eq!(payload.to, "Maya");
        assert_eq!(payload.date, "2026-02-14");
        assert_eq!(payload.template, "hearts");
        assert_eq!(payload.gifts, ["🌹"]);
        assert_eq!(payload.youtube, "https://www.youtube.com/watch?v=abc");
    }

    #[test]
    fn test_whatsapp_share_url_encodes_text() {
        let url = whatsapp_share_url("https://is.gd/xyz");
        assert!(url.starts_with("https://wa.me/?text="));
        // form-urlencoded query: spaces become '+', the link itself is escaped
        assert!(url.contains("I+made+this+for+you"));
        assert!(!url.contains("https://is.gd/xyz"));
    }
}
