//! REST API helpers for communicating with the server.
//!
//! Browser builds (`csr`): real HTTP calls via `gloo-net`.
//! Native builds: stubs returning [`ApiError::Unavailable`].
//!
//! ERROR HANDLING
//! ==============
//! Authenticated helpers take the [`SessionStore`] explicitly and route every
//! failure through [`check_auth`], so a 401/403 from any of them tears the
//! session down and redirects to `/login` before the caller sees the error.

#![allow(clippy::unused_async)]

use contracts::{LoginPayload, LoginRequest, SummarizeRequest};
use serde_json::{Map, Value};

use crate::net::auth_error::check_auth;
use crate::net::error::ApiError;
use crate::state::session::SessionStore;

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

fn require_token(session: &SessionStore) -> Result<String, ApiError> {
    session.access_token().ok_or(ApiError::MissingToken)
}

fn summarize_body(data: Vec<Value>, chart_config: Map<String, Value>) -> SummarizeRequest {
    SummarizeRequest { data, chart_config }
}

#[cfg(feature = "csr")]
async fn read_json(resp: gloo_net::http::Response) -> Result<Value, ApiError> {
    if !resp.ok() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(ApiError::from_response(status, &body));
    }
    resp.json::<Value>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

/// Post credentials to the login endpoint and persist the normalized session.
///
/// A storage failure while persisting is logged; the payload is still returned.
///
/// # Errors
///
/// Returns [`ApiError`] if the request fails, the server rejects the
/// credentials, or the response matches neither login envelope.
pub async fn login(session: &SessionStore, email: &str, password: &str) -> Result<LoginPayload, ApiError> {
    let request = LoginRequest::new(email, password);
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::post(contracts::LOGIN_PATH)
            .json(&request)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body = read_json(resp).await?;
        let payload = contracts::normalize_login_response(body)?;
        if let Err(e) = session.store_login(&payload) {
            log::warn!("login succeeded but session could not be stored: {e}");
        }
        Ok(payload)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (session, request);
        Err(ApiError::Unavailable)
    }
}

async fn get_json(session: &SessionStore, path: &str) -> Result<Value, ApiError> {
    let token = require_token(session)?;
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::get(path)
            .header("Authorization", &contracts::bearer(&token))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (token, path);
        Err(ApiError::Unavailable)
    }
}

async fn post_json(session: &SessionStore, path: &str, body: &impl serde::Serialize) -> Result<Value, ApiError> {
    let token = require_token(session)?;
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::post(path)
            .header("Authorization", &contracts::bearer(&token))
            .json(body)
            .map_err(|e| ApiError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        read_json(resp).await
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (token, path, body);
        Err(ApiError::Unavailable)
    }
}

/// GET a protected resource with the stored bearer token.
///
/// # Errors
///
/// Returns [`ApiError::MissingToken`] without a stored token, or the request
/// error (after auth-failure handling) otherwise.
pub async fn fetch_protected(session: &SessionStore, path: &str) -> Result<Value, ApiError> {
    check_auth(get_json(session, path).await, session)
}

/// Ask the server to summarize chart data.
///
/// # Errors
///
/// Same as [`fetch_protected`].
pub async fn summarize(
    session: &SessionStore,
    data: Vec<Value>,
    chart_config: Map<String, Value>,
) -> Result<Value, ApiError> {
    let body = summarize_body(data, chart_config);
    check_auth(post_json(session, contracts::SUMMARIZE_PATH, &body).await, session)
}
