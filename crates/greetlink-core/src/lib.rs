//! Core types and URL codec for GreetLink
//!
//! A greeting travels entirely inside its share link: the payload is
//! serialized to JSON and carried as a URL-safe base64 token in the URL
//! fragment. Nothing is stored server-side; the link IS the greeting.

pub mod codec;
pub mod error;
pub mod link;
pub mod payload;

pub use codec::{decode, encode};
pub use error::{CodecError, Result};
pub use link::{build_share_url, extract_token, youtube_video_id, SOFT_LINK_LIMIT};
pub use payload::{GreetingPayload, MAX_PHOTOS};
