//! Share link construction and parsing
//!
//! A share link is `<origin><path>#data=<token>`. The fragment variant keeps
//! the token out of server logs and request lines entirely; the page (or CLI)
//! reads it back locally.

use crate::codec::encode;
use crate::error::Result;
use crate::payload::GreetingPayload;

/// Soft length threshold above which a link should be flagged to the user.
///
/// Long links still work, but shorteners and chat apps start mangling them
/// around this size.
pub const SOFT_LINK_LIMIT: usize = 1800;

/// Fragment parameter carrying the payload token
const DATA_FRAGMENT: &str = "#data=";

/// Build the full share URL for a payload.
///
/// `base` is the origin plus path of the viewer page, e.g.
/// `https://greet.example.com/card`.
pub fn build_share_url(base: &str, payload: &GreetingPayload) -> Result<String> {
    let token = encode(payload)?;
    Ok(format!("{}{}{}", base, DATA_FRAGMENT, token))
}

/// Extract the payload token from a share URL, if present.
///
/// The fragment is the last URL component, so everything after `#data=`
/// is the token.
pub fn extract_token(url: &str) -> Option<&str> {
    let start = url.find(DATA_FRAGMENT)? + DATA_FRAGMENT.len();
    let token = &url[start..];
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Pull the video id out of a YouTube watch URL (`v=` query parameter).
pub fn youtube_video_id(url: &str) -> Option<&str> {
    for (idx, _) in url.match_indices("v=") {
        let preceded = idx > 0 && matches!(url.as_bytes()[idx - 1], b'?' | b'&');
        if !preceded {
            continue;
        }
        let value = &url[idx + 2..];
        let end = value.find(['&', '#']).unwrap_or(value.len());
        let id = &value[..end];
        if !id.is_empty() {
            return Some(id);
        }
    }
    None
}
