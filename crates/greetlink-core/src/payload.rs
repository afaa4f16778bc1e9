//! The greeting payload carried inside a share link

use serde::{Deserialize, Serialize};

/// Maximum number of photos a greeting may carry
pub const MAX_PHOTOS: usize = 3;

/// A composed greeting.
///
/// Every field defaults to empty so a payload decoded from an older or
/// sparser link still deserializes; unknown fields are ignored for the same
/// reason. `gifts` and `photos` keep their selection order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingPayload {
    /// Sender name
    pub from: String,
    /// Recipient name
    pub to: String,
    /// ISO date the greeting counts toward, or empty
    pub date: String,
    /// Greeting template identifier, or empty
    pub template: String,
    /// Free-form message text, may contain newlines
    pub text: String,
    /// Gift emoji tokens in selection order
    pub gifts: Vec<String>,
    /// Song link (YouTube URL), or empty
    pub youtube: String,
    /// Photo URLs or data URIs, at most [`MAX_PHOTOS`]
    pub photos: Vec<String>,
}

impl GreetingPayload {
    /// Create an empty payload
    pub fn new() -> Self {
        Self::default()
    }

    /// True when nothing has been filled in
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
