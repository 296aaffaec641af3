//! Debug inspection of the stored access token.
//!
//! Decode failures are logged and otherwise ignored; they never touch the
//! session or block a request.

use contracts::token::{TokenClaims, decode_claims};

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

/// Decode `token` for display, logging (not propagating) any failure.
pub fn inspect(token: &str) -> Option<TokenClaims> {
    match decode_claims(token) {
        Ok(claims) => Some(claims),
        Err(e) => {
            log::warn!("access token could not be decoded: {e}");
            None
        }
    }
}

/// Short human-readable expiry label for `claims` at `now_secs`.
#[must_use]
pub fn expiry_label(claims: &TokenClaims, now_secs: i64) -> String {
    match claims.expires_at {
        None => "no expiry".to_owned(),
        Some(_) if claims.is_expired(now_secs) => "expired".to_owned(),
        Some(exp) => {
            let minutes = (exp - now_secs) / 60;
            if minutes >= 60 { format!("expires in {}h", minutes / 60) } else { format!("expires in {minutes}m") }
        }
    }
}

/// Current time in seconds since the Unix epoch (browser clock).
#[must_use]
pub fn now_secs() -> i64 {
    #[cfg(feature = "csr")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let secs = (js_sys::Date::now() / 1000.0) as i64;
        secs
    }
    #[cfg(not(feature = "csr"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_secs()).unwrap_or(i64::MAX))
    }
}
