//! Authorization-failure handling for HTTP call sites.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every authenticated REST helper passes its error through
//! [`handle_auth_error`]. A 401 or 403 from any endpoint invalidates the
//! session: storage is cleared and the browser is sent to `/login`,
//! whichever page issued the call. The two statuses are not told apart and
//! nothing is retried. Repeated failures simply clear and redirect again.

use crate::net::error::ApiError;
use crate::state::session::SessionStore;

#[cfg(test)]
#[path = "auth_error_test.rs"]
mod auth_error_test;

/// `true` for statuses that invalidate the session.
#[must_use]
pub fn is_auth_failure(status: u16) -> bool {
    matches!(status, 401 | 403)
}

/// Clear the session and redirect when `error` is an auth failure.
///
/// Returns `true` when the error was handled this way, `false` when it was
/// left for the caller (no storage or navigation side effects).
pub fn handle_auth_error(error: &ApiError, session: &SessionStore) -> bool {
    match error.status() {
        Some(status) if is_auth_failure(status) => {
            log::warn!("request rejected with {status}; clearing session");
            session.clear_session();
            true
        }
        _ => false,
    }
}

/// Route a call result through [`handle_auth_error`] and hand it back unchanged.
///
/// # Errors
///
/// Returns the original error.
pub fn check_auth<T>(result: Result<T, ApiError>, session: &SessionStore) -> Result<T, ApiError> {
    if let Err(error) = &result {
        handle_auth_error(error, session);
    }
    result
}
