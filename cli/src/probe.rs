//! HTTP probes against a running API.
//!
//! Each probe makes real requests with one shared timeout and turns the
//! outcome into a [`CliError`] the binary maps to an exit status. 401/403
//! are kept distinct from other failures so scripts can tell an expired or
//! bad credential apart from a broken server.

use std::time::Duration;

use contracts::{EnvelopeShape, LoginPayload, LoginRequest, SummarizeRequest};
use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::CliError;

#[cfg(test)]
#[path = "probe_test.rs"]
mod probe_test;

/// Result of a successful login probe.
#[derive(Debug)]
pub struct LoginOutcome {
    pub shape: EnvelopeShape,
    pub payload: LoginPayload,
}

impl LoginOutcome {
    /// Printable summary. The token itself is never echoed.
    pub fn report(&self) -> Value {
        json!({
            "envelope": self.shape.as_str(),
            "token_present": !self.payload.token.is_empty(),
            "user": self.payload.user,
        })
    }
}

pub struct Probe {
    client: reqwest::Client,
    base_url: String,
}

impl Probe {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CliError> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CliError::InvalidBaseUrl(base_url.to_owned()));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url: base_url.to_owned() })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    /// POST credentials and normalize whichever envelope comes back.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, CliError> {
        let response = self
            .client
            .post(self.url(contracts::LOGIN_PATH))
            .json(&LoginRequest::new(email, password))
            .send()
            .await?;
        let body = read_json(response).await?;
        let shape = contracts::envelope_shape(&body).unwrap_or(EnvelopeShape::Flat);
        let payload = contracts::normalize_login_response(body)?;
        Ok(LoginOutcome { shape, payload })
    }

    pub async fn protected(&self, token: &str, path: &str) -> Result<Value, CliError> {
        let response = self.client.get(self.url(path)).bearer_auth(token).send().await?;
        read_json(response).await
    }

    pub async fn summarize(&self, token: &str, request: &SummarizeRequest) -> Result<Value, CliError> {
        let response = self
            .client
            .post(self.url(contracts::SUMMARIZE_PATH))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, CliError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<Value>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let message = contracts::error_message(&body);
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        Err(CliError::Unauthorized { status: status.as_u16(), message })
    } else {
        Err(CliError::Status { status: status.as_u16(), message })
    }
}

/// Decode `token` into a printable report.
pub fn inspect_token(token: &str, now_secs: i64) -> Result<Value, CliError> {
    let claims = contracts::token::decode_claims(token)?;
    Ok(json!({
        "subject": claims.subject,
        "expires_at": claims.expires_at,
        "expired": claims.is_expired(now_secs),
        "claims": claims.raw,
    }))
}
