//! Bearer-token identity decoding.
//!
//! The stored token is a JWT whose payload carries the user identifier in
//! the `sub` claim. Decoding never touches the network and never fails
//! loudly: a malformed token means "no identity", which callers treat as
//! "not logged in".

use base64::Engine as _;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};

/// Extracts the user identifier from a bearer token.
///
/// Splits on `.`, base64url-decodes the middle segment (padded and
/// unpadded encodings are both accepted), parses it as JSON and reads the
/// `sub` claim. The claim may be a string or a number upstream; it is
/// always returned in string form.
pub fn decode_user_id(token: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.as_bytes())
        .or_else(|_| URL_SAFE.decode(payload.as_bytes()))
        .ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    match claims.get("sub")? {
        serde_json::Value::String(sub) => Some(sub.clone()),
        serde_json::Value::Number(sub) => Some(sub.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_with_payload(payload: &str) -> String {
        format!("header.{}.signature", URL_SAFE_NO_PAD.encode(payload))
    }

    #[test]
    fn reads_string_subject() {
        let token = token_with_payload(r#"{"sub":"42"}"#);
        assert_eq!(decode_user_id(&token), Some("42".to_string()));
    }

    #[test]
    fn coerces_numeric_subject_to_string() {
        let token = token_with_payload(r#"{"sub":42}"#);
        assert_eq!(decode_user_id(&token), Some("42".to_string()));
    }

    #[test]
    fn malformed_tokens_yield_no_identity() {
        assert_eq!(decode_user_id(""), None);
        assert_eq!(decode_user_id("no-dots-here"), None);
        assert_eq!(decode_user_id("a.!!!not-base64!!!.c"), None);
        let token = token_with_payload("not json");
        assert_eq!(decode_user_id(&token), None);
        let token = token_with_payload(r#"{"other":"claim"}"#);
        assert_eq!(decode_user_id(&token), None);
    }

    #[test]
    fn accepts_padded_payload_segments() {
        let payload = base64::engine::general_purpose::URL_SAFE.encode(r#"{"sub":"7"}"#);
        let token = format!("h.{payload}.s");
        assert_eq!(decode_user_id(&token), Some("7".to_string()));
    }
}
