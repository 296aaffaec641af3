//! Shared HTTP contracts for the login, protected and summarization endpoints.
//!
//! This crate owns the request/response shapes used by both `client` and `cli`.
//! The login endpoint is an external contract that has answered with two
//! envelopes over time:
//!
//! - flat: `{ "token": ..., "user": {...} }`
//! - nested: `{ "success": true, "message": ..., "data": { "token": ..., "user": {...} } }`
//!
//! Both are accepted and normalized into a single [`LoginPayload`] at the
//! boundary so callers never branch on the envelope shape.

pub mod token;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};


/// Login endpoint path.
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Default protected resource used to validate a bearer token.
pub const PROFILE_PATH: &str = "/api/auth/me";

/// Chart summarization endpoint path.
pub const SUMMARIZE_PATH: &str = "/api/summarize";

/// Error returned by [`normalize_login_response`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractError {
    /// The endpoint answered with `success: false`.
    #[error("login rejected: {0}")]
    Rejected(String),
    /// A required field is absent from the normalized payload.
    #[error("login response missing `{0}`")]
    MissingField(&'static str),
    /// The body does not match either known envelope.
    #[error("invalid login response: {0}")]
    Malformed(String),
}

/// Credentials posted to [`LOGIN_PATH`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

/// User profile as returned by the login endpoint.
///
/// Only `email` is required. Fields this crate does not model are kept in
/// `extra` so a stored profile round-trips without loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned id. Numeric ids are kept as their decimal string.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "id_from_string_or_number")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(id)) => Ok(Some(id)),
        Some(Value::Number(id)) => Ok(Some(id.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("user id must be a string or number, got {other}"))),
    }
}

impl User {
    /// Display label: name when present, email otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().filter(|n| !n.is_empty()).unwrap_or(&self.email)
    }
}

/// Canonical login result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub token: String,
    pub user: User,
}

/// Which envelope a login response used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeShape {
    Flat,
    Nested,
}

impl EnvelopeShape {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Nested => "nested",
        }
    }
}

/// Body posted to [`SUMMARIZE_PATH`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummarizeRequest {
    pub data: Vec<Value>,
    #[serde(rename = "chartConfig")]
    pub chart_config: Map<String, Value>,
}

/// Detect the envelope shape of a login response body.
///
/// Returns `None` when the body is not a JSON object.
#[must_use]
pub fn envelope_shape(body: &Value) -> Option<EnvelopeShape> {
    let map = body.as_object()?;
    if map.get("data").is_some_and(Value::is_object) {
        Some(EnvelopeShape::Nested)
    } else {
        Some(EnvelopeShape::Flat)
    }
}

/// Normalize either login envelope into a [`LoginPayload`].
///
/// # Errors
///
/// Returns [`ContractError::Rejected`] when the body carries `success: false`,
/// [`ContractError::MissingField`] when `token` or `user` is absent, and
/// [`ContractError::Malformed`] for any other shape mismatch.
pub fn normalize_login_response(body: Value) -> Result<LoginPayload, ContractError> {
    let Value::Object(mut map) = body else {
        return Err(ContractError::Malformed("expected a JSON object".to_owned()));
    };

    if matches!(map.get("success"), Some(Value::Bool(false))) {
        let message = map.get("message").and_then(Value::as_str).unwrap_or("login failed");
        return Err(ContractError::Rejected(message.to_owned()));
    }

    let mut inner = match map.remove("data") {
        Some(Value::Object(data)) => data,
        Some(Value::Null) | None => map,
        Some(_) => return Err(ContractError::Malformed("`data` is not an object".to_owned())),
    };

    let token = match inner.remove("token") {
        Some(Value::String(token)) if !token.is_empty() => token,
        Some(Value::String(_) | Value::Null) | None => return Err(ContractError::MissingField("token")),
        Some(_) => return Err(ContractError::Malformed("`token` is not a string".to_owned())),
    };
    let user = inner.remove("user").ok_or(ContractError::MissingField("user"))?;
    let user: User = serde_json::from_value(user).map_err(|e| ContractError::Malformed(format!("user: {e}")))?;

    Ok(LoginPayload { token, user })
}

/// Value of an `Authorization` header carrying `token`.
#[must_use]
pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Pull a human-readable message out of an error response body.
///
/// Looks for `message` then `error`; falls back to the trimmed raw text.
#[must_use]
pub fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error"] {
            if let Some(message) = map.get(key).and_then(Value::as_str) {
                return message.to_owned();
            }
        }
    }
    body.trim().to_owned()
}
