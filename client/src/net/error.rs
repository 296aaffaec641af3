//! Error type shared by the REST helpers.

use contracts::ContractError;

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure of an HTTP call made by the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Network(String),
    /// The server answered with a non-success status.
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    /// The body could not be decoded.
    #[error("response decode failed: {0}")]
    Decode(String),
    /// The login envelope did not normalize.
    #[error(transparent)]
    Contract(#[from] ContractError),
    /// An authenticated call was attempted without a stored token.
    #[error("no access token stored")]
    MissingToken,
    /// Called outside a browser build.
    #[error("not available outside the browser")]
    Unavailable,
}

impl ApiError {
    /// Build a status error from a raw response body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = contracts::error_message(body);
        let message = if message.is_empty() { format!("HTTP {status}") } else { message };
        Self::Status { status, message }
    }

    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
