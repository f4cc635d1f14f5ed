// litevault-core/src/token.rs
//! Compact-token (JWT-shaped) inspection.
//!
//! Only the payload segment is decoded and only its `exp` claim is used. No
//! signature is checked: the question answered here is "should the client
//! refresh before sending this", not "is this token authentic".
//!
//! License: MIT OR APACHE 2.0

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use chrono::Utc;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::errors::TokenError;

/// Buffer applied when the caller does not pick one.
pub const DEFAULT_BUFFER_SECONDS: i64 = 10;

/// URL-safe alphabet, padding optional on decode.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims decoded from the payload segment.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenClaims {
    /// Expiry in seconds since the epoch.
    pub exp: i64,
    pub claims: Map<String, Value>,
}

/// Reads `exp` as an integer. Integer-valued strings are accepted as well.
fn exp_claim(claims: &Map<String, Value>) -> Option<i64> {
    match claims.get("exp")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Decodes the payload of a compact token.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    if token.trim().is_empty() {
        return Err(TokenError::Missing);
    }

    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 {
        return Err(TokenError::MalformedSegments(segments.len()));
    }

    let payload = URL_SAFE_LENIENT
        .decode(segments[1])
        .map_err(|e| TokenError::PayloadEncoding(e.to_string()))?;

    let claims = match serde_json::from_slice::<Value>(&payload) {
        Ok(Value::Object(map)) => map,
        Ok(other) => return Err(TokenError::PayloadJson(format!("found {}", json_kind(&other)))),
        Err(e) => return Err(TokenError::PayloadJson(e.to_string())),
    };

    let exp = exp_claim(&claims).ok_or(TokenError::MissingExpiry)?;
    Ok(TokenClaims { exp, claims })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Milliseconds until the token expires, relative to `now_ms`. Negative once expired.
pub fn expires_in_ms(token: &str, now_ms: i64) -> Result<i64, TokenError> {
    let claims = decode_claims(token)?;
    Ok(claims.exp.saturating_mul(1000).saturating_sub(now_ms))
}

/// Whether `token` is expired or expires within `buffer_seconds`, using the
/// system clock.
///
/// Absent, blank, malformed or undecodable tokens count as expiring.
pub fn is_about_to_expire(token: Option<&str>, buffer_seconds: i64) -> bool {
    is_about_to_expire_at(token, buffer_seconds, Utc::now().timestamp_millis())
}

/// Same as [`is_about_to_expire`] with an explicit clock reading.
pub fn is_about_to_expire_at(token: Option<&str>, buffer_seconds: i64, now_ms: i64) -> bool {
    let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
        return true;
    };

    match expires_in_ms(token, now_ms) {
        Ok(diff_ms) => {
            let is_near = diff_ms < buffer_seconds.saturating_mul(1000);
            if is_near {
                debug!("Token near expiry: diff={}ms", diff_ms);
            }
            is_near
        }
        Err(e) => {
            warn!("Token parse failed: {}", e);
            true
        }
    }
}

/// `Authorization` header value for `token`, if it looks like a compact token.
pub fn bearer_header(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() || token.matches('.').count() < 2 {
        return None;
    }
    Some(format!("Bearer {}", token))
}

/// Builds an unsigned compact token around `claims`. Meant for tests and
/// local tooling; the signature segment is a fixed dummy.
pub fn encode_unsigned(claims: &Value) -> String {
    let header = URL_SAFE_LENIENT.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_LENIENT.encode(claims.to_string().as_bytes());
    format!("{}.{}.sig", header, payload)
}
