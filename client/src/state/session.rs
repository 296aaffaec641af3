//! Browser session: access token + user profile.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is created once in `App` and provided through Leptos
//! context. Pages and API helpers receive it explicitly; nothing else reads
//! the `token`/`user` keys.
//!
//! DESIGN
//! ======
//! - Persistent store holds `token`, `user` and the legacy `userData` copy.
//! - Transient store (`sessionStorage`) is cleared wholesale on teardown,
//!   not key by key.
//! - Teardown is best-effort for storage and unconditional for navigation:
//!   every removal is attempted, failures are logged, and `/login` is
//!   always reached.
//! - A profile without a token is an error state. It is reported by
//!   [`SessionStore::has_orphaned_profile`] and never repaired here.

use std::sync::Arc;

use contracts::{LoginPayload, User};

use crate::util::navigate::{BrowserNavigator, Navigator};
use crate::util::storage::{BrowserStore, KeyValueStore, StorageError};

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

/// Persistent key holding the access token.
pub const TOKEN_KEY: &str = "token";
/// Persistent key holding the JSON user profile.
pub const USER_KEY: &str = "user";
/// Legacy duplicate of [`USER_KEY`] still read by older pages.
pub const USER_DATA_KEY: &str = "userData";
/// Every persistent key owned by the session.
pub const SESSION_KEYS: [&str; 3] = [TOKEN_KEY, USER_KEY, USER_DATA_KEY];
/// Where teardown sends the browser.
pub const LOGIN_ROUTE: &str = "/login";

/// Explicit handle over the session stores and navigation.
#[derive(Clone)]
pub struct SessionStore {
    persistent: Arc<dyn KeyValueStore>,
    transient: Arc<dyn KeyValueStore>,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new(
        persistent: Arc<dyn KeyValueStore>,
        transient: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self { persistent, transient, navigator }
    }

    /// `localStorage` + `sessionStorage` + `location.href`.
    #[must_use]
    pub fn browser() -> Self {
        Self::new(Arc::new(BrowserStore::local()), Arc::new(BrowserStore::session()), Arc::new(BrowserNavigator))
    }

    /// Stored access token, if any. Empty strings count as absent.
    pub fn access_token(&self) -> Option<String> {
        match self.persistent.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("session token read failed: {e}");
                None
            }
        }
    }

    /// Stored user profile. Falls back to the legacy `userData` key.
    ///
    /// A blob that does not decode is logged and treated as absent.
    pub fn user(&self) -> Option<User> {
        [USER_KEY, USER_DATA_KEY].into_iter().find_map(|key| self.read_user(key))
    }

    fn read_user(&self, key: &str) -> Option<User> {
        let raw = match self.persistent.get_item(key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("session {key} read failed: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("session {key} is not a valid profile: {e}");
                None
            }
        }
    }

    /// `true` iff a non-empty access token is stored.
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    /// A profile is stored but the token is gone.
    pub fn has_orphaned_profile(&self) -> bool {
        !self.is_authenticated() && self.user().is_some()
    }

    /// Persist a successful login.
    ///
    /// # Errors
    ///
    /// Returns the first [`StorageError`] hit; keys written before the
    /// failure are left in place.
    pub fn store_login(&self, payload: &LoginPayload) -> Result<(), StorageError> {
        let user = serde_json::to_string(&payload.user).map_err(|e| StorageError::Encode(e.to_string()))?;
        self.persistent.set_item(TOKEN_KEY, &payload.token)?;
        self.persistent.set_item(USER_KEY, &user)?;
        self.persistent.set_item(USER_DATA_KEY, &user)?;
        Ok(())
    }

    /// Drop every session key, wipe the transient store, and go to `/login`.
    ///
    /// Never fails: storage errors are logged and the next step still runs.
    pub fn clear_session(&self) {
        for key in SESSION_KEYS {
            if let Err(e) = self.persistent.remove_item(key) {
                log::warn!("session clear: removing {key} failed: {e}");
            }
        }
        if let Err(e) = self.transient.clear() {
            log::warn!("session clear: transient store clear failed: {e}");
        }
        self.navigator.navigate(LOGIN_ROUTE);
    }

    /// Explicit user logout.
    pub fn logout(&self) {
        log::info!("logging out");
        self.clear_session();
    }
}
