use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::state::session::{LOGIN_ROUTE, TOKEN_KEY, USER_KEY};
use crate::util::navigate::RecordingNavigator;
use crate::util::storage::{KeyValueStore, MemoryStore, StorageError};

/// Memory store that counts every mutating call.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    mutations: AtomicUsize,
}

impl CountingStore {
    fn seeded() -> Self {
        Self {
            inner: MemoryStore::with_items([(TOKEN_KEY, "t"), (USER_KEY, r#"{"email":"a@b.c"}"#)]),
            ..Self::default()
        }
    }

    fn mutations(&self) -> usize {
        self.mutations.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for CountingStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_item(key)
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.mutations.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

struct Harness {
    session: SessionStore,
    persistent: Arc<CountingStore>,
    transient: Arc<CountingStore>,
    nav: Arc<RecordingNavigator>,
}

fn harness() -> Harness {
    let persistent = Arc::new(CountingStore::seeded());
    let transient = Arc::new(CountingStore::default());
    let nav = Arc::new(RecordingNavigator::new());
    let session = SessionStore::new(persistent.clone(), transient.clone(), nav.clone());
    Harness { session, persistent, transient, nav }
}

fn status(code: u16) -> ApiError {
    ApiError::Status { status: code, message: format!("HTTP {code}") }
}

#[test]
fn is_auth_failure_matches_401_and_403_only() {
    assert!(is_auth_failure(401));
    assert!(is_auth_failure(403));
    for code in [200, 204, 400, 402, 404, 409, 429, 500, 503] {
        assert!(!is_auth_failure(code), "{code} should not be an auth failure");
    }
}

#[test]
fn auth_statuses_clear_once_and_redirect() {
    for code in [401, 403] {
        let h = harness();
        assert!(handle_auth_error(&status(code), &h.session));

        // three key removals + one transient clear
        assert_eq!(h.persistent.mutations(), 3);
        assert_eq!(h.transient.mutations(), 1);
        assert_eq!(h.nav.visited(), vec![LOGIN_ROUTE.to_owned()]);
        assert!(!h.session.is_authenticated());
    }
}

#[test]
fn other_statuses_are_not_handled() {
    for code in [400, 404, 500] {
        let h = harness();
        assert!(!handle_auth_error(&status(code), &h.session));
        assert_eq!(h.persistent.mutations(), 0);
        assert_eq!(h.transient.mutations(), 0);
        assert!(h.nav.visited().is_empty());
        assert!(h.session.is_authenticated());
    }
}

#[test]
fn errors_without_status_are_not_handled() {
    let errors = [
        ApiError::Network("offline".to_owned()),
        ApiError::Decode("eof".to_owned()),
        ApiError::MissingToken,
        ApiError::Unavailable,
    ];
    for error in errors {
        let h = harness();
        assert!(!handle_auth_error(&error, &h.session), "{error} should not be handled");
        assert_eq!(h.persistent.mutations(), 0);
        assert!(h.nav.visited().is_empty());
    }
}

#[test]
fn repeated_failures_redirect_each_time() {
    let h = harness();
    for _ in 0..3 {
        assert!(handle_auth_error(&status(401), &h.session));
    }
    assert_eq!(h.nav.visited().len(), 3);
    assert!(!h.session.is_authenticated());
}

#[test]
fn check_auth_passes_results_through() {
    let h = harness();
    assert_eq!(check_auth(Ok::<_, ApiError>(7), &h.session), Ok(7));
    assert_eq!(check_auth::<()>(Err(status(500)), &h.session), Err(status(500)));
    assert!(h.nav.visited().is_empty());

    assert_eq!(check_auth::<()>(Err(status(403)), &h.session), Err(status(403)));
    assert_eq!(h.nav.visited(), vec![LOGIN_ROUTE.to_owned()]);
}
