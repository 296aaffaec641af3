use std::sync::Arc;

use super::*;
use crate::state::session::{TOKEN_KEY, USER_KEY};
use crate::util::navigate::RecordingNavigator;
use crate::util::storage::MemoryStore;

fn session(items: &[(&str, &str)]) -> SessionStore {
    SessionStore::new(
        Arc::new(MemoryStore::with_items(items.iter().copied())),
        Arc::new(MemoryStore::new()),
        Arc::new(RecordingNavigator::new()),
    )
}

#[test]
fn should_redirect_when_token_missing() {
    assert!(should_redirect_unauth(&session(&[])));
}

#[test]
fn should_redirect_orphaned_profile() {
    assert!(should_redirect_unauth(&session(&[(USER_KEY, r#"{"email":"a@b.c"}"#)])));
}

#[test]
fn should_not_redirect_with_token() {
    assert!(!should_redirect_unauth(&session(&[(TOKEN_KEY, "abc")])));
}
