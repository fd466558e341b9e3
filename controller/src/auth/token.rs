//! Best-effort introspection of bearer tokens.
//!
//! The middle segment of a token is base64url JSON. It is decoded here only
//! to show who is logged in; the signature is never checked, so nothing read
//! from the payload may be trusted as identity.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde_json::{Map, Value};

/// Standard alphabet, padding optional, lenient about trailing bits.
const FORGIVING: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Fields tried, in order, when looking for something to display.
const DISPLAY_FIELDS: [&str; 3] = ["email", "user", "username"];

/// Decoded, unverified token payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenPayload(Map<String, Value>);

impl TokenPayload {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn display_name(&self) -> Option<String> {
        DISPLAY_FIELDS
            .iter()
            .filter_map(|field| self.0.get(*field))
            .find_map(displayable)
    }
}

fn displayable(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Decodes the payload segment. Any malformed input yields `None`.
pub fn decode_token_payload(token: &str) -> Option<TokenPayload> {
    let segment = token.split('.').nth(1)?;
    let standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let bytes = FORGIVING.decode(standard.as_bytes()).ok()?;
    let json = String::from_utf8(bytes).ok()?;
    match serde_json::from_str(&json).ok()? {
        Value::Object(map) => Some(TokenPayload(map)),
        _ => None,
    }
}

/// Display name carried by the token, or an empty string.
pub fn display_name(token: &str) -> String {
    decode_token_payload(token)
        .and_then(|payload| payload.display_name())
        .unwrap_or_default()
}
