//! Bearer token payload codec
//!
//! Reads the payload segment of a `header.payload.signature` token.
//!
//! **No signature verification is performed.** The decoded claims are for
//! UI convenience only (greeting the operator, hiding menu entries). They
//! must never be used as an authorization decision outside this process:
//! the backend validates the token on every request it receives.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde_json::Value as JsonValue;

use crate::errors::{ConsoleError, Result};
use crate::token::Claims;

/// Standard alphabet, padding optional, the same leniency a browser `atob` shows.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decode the claims of `token`, or empty claims on any failure.
///
/// Never panics and never returns an error: callers treat empty claims as
/// "not authenticated".
///
/// # Example
///
/// ```
/// use hrpay_core::token;
///
/// assert!(token::decode("not-a-token").is_empty());
/// ```
pub fn decode(token: &str) -> Claims {
    match try_decode(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("token decode failed, treating as anonymous: {}", e);
            Claims::default()
        }
    }
}

/// Decode the claims of `token`, reporting why decoding failed.
pub fn try_decode(token: &str) -> Result<Claims> {
    let segment = token
        .split('.')
        .nth(1)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ConsoleError::Decode("token has no payload segment".to_string()))?;

    let normalized = segment.replace('-', "+").replace('_', "/");

    let bytes = PAYLOAD_ENGINE
        .decode(normalized.as_bytes())
        .map_err(|e| ConsoleError::Decode(format!("payload is not base64: {}", e)))?;

    let text = String::from_utf8(bytes)
        .map_err(|e| ConsoleError::Decode(format!("payload is not UTF-8: {}", e)))?;

    let value: JsonValue = serde_json::from_str(&text)
        .map_err(|e| ConsoleError::Decode(format!("payload is not JSON: {}", e)))?;

    Claims::from_json(&value)
}
