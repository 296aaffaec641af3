//! Access-token inspection.
//!
//! Tokens are opaque to the session layer; decoding the JWT payload is a
//! debugging aid only. Signatures are never verified here.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Map, Value};

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

/// Error returned by [`decode_claims`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Shape,
    #[error("token payload is not base64url: {0}")]
    Base64(String),
    #[error("token payload is not a JSON object: {0}")]
    Json(String),
}

/// Decoded JWT payload claims.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenClaims {
    /// `sub` claim.
    pub subject: Option<String>,
    /// `exp` claim, seconds since the Unix epoch.
    pub expires_at: Option<i64>,
    /// The full claim set.
    pub raw: Map<String, Value>,
}

impl TokenClaims {
    /// Whether `exp` is at or before `now_secs`. Tokens without `exp` never expire.
    #[must_use]
    pub fn is_expired(&self, now_secs: i64) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now_secs)
    }
}

/// Decode the payload segment of a JWT without verifying it.
///
/// # Errors
///
/// Returns [`TokenError`] when the token does not have three dot-separated
/// segments, the payload is not base64url, or it does not decode to a JSON object.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let parts: Vec<&str> = token.trim().split('.').collect();
    let [_header, payload, _signature] = parts.as_slice() else {
        return Err(TokenError::Shape);
    };
    if payload.is_empty() {
        return Err(TokenError::Shape);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Base64(e.to_string()))?;
    let raw = match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => map,
        Ok(other) => return Err(TokenError::Json(format!("expected object, got {other}"))),
        Err(e) => return Err(TokenError::Json(e.to_string())),
    };

    let subject = raw.get("sub").and_then(Value::as_str).map(str::to_owned);
    let expires_at = raw.get("exp").and_then(Value::as_i64);
    Ok(TokenClaims { subject, expires_at, raw })
}
