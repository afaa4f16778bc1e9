//! URL-safe payload codec
//!
//! A payload is serialized to JSON, UTF-8 encoded, base64 encoded with the
//! URL-safe alphabet (`+` → `-`, `/` → `_`) and the `=` padding stripped, so
//! the token survives a URL fragment untouched.
//!
//! The token is neither compressed nor encrypted. Anyone holding the link can
//! decode the greeting; secrecy of the link is the only confidentiality the
//! format provides. That is a deliberate tradeoff of the format, not a gap to
//! fix here.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;

use crate::error::{CodecError, Result};
use crate::payload::GreetingPayload;

/// Encode a payload into a URL-safe token.
pub fn encode(payload: &GreetingPayload) -> Result<String> {
    let json = serde_json::to_string(payload)?;
    Ok(URL_SAFE_NO_PAD.encode(json.as_bytes()))
}

/// Decode a token back into a payload.
///
/// Accepts tokens with or without `=` padding and with either base64
/// alphabet, mirroring what lenient decoders did for links already in the
/// wild. Any failure along the way is a [`CodecError::MalformedPayload`].
pub fn decode(token: &str) -> Result<GreetingPayload> {
    let mut normalized: String = token
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    while normalized.len() % 4 != 0 {
        normalized.push('=');
    }

    let bytes = STANDARD
        .decode(normalized.as_bytes())
        .map_err(|e| CodecError::MalformedPayload(format!("invalid base64: {}", e)))?;

    let json = std::str::from_utf8(&bytes)
        .map_err(|e| CodecError::MalformedPayload(format!("invalid utf-8: {}", e)))?;

    serde_json::from_str(json)
        .map_err(|e| CodecError::MalformedPayload(format!("invalid payload json: {}", e)))
}
