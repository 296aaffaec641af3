//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior.

use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::{LOGIN_ROUTE, SessionStore};

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

/// Whether a page guarded by a session should bounce to `/login`.
pub fn should_redirect_unauth(session: &SessionStore) -> bool {
    if session.has_orphaned_profile() {
        log::warn!("user profile stored without an access token");
    }
    !session.is_authenticated()
}

/// Redirect to `/login` once mounted when no access token is stored.
pub fn install_unauth_redirect<F>(session: SessionStore, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        if should_redirect_unauth(&session) {
            navigate(LOGIN_ROUTE, NavigateOptions::default());
        }
    });
}
