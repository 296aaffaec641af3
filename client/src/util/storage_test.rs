use super::*;

#[test]
fn memory_store_set_get_remove() {
    let store = MemoryStore::new();
    assert_eq!(store.get_item("token"), Ok(None));

    store.set_item("token", "abc").unwrap();
    assert_eq!(store.get_item("token"), Ok(Some("abc".to_owned())));

    store.remove_item("token").unwrap();
    assert_eq!(store.get_item("token"), Ok(None));
}

#[test]
fn memory_store_remove_absent_key_is_ok() {
    let store = MemoryStore::new();
    assert_eq!(store.remove_item("missing"), Ok(()));
}

#[test]
fn memory_store_clear_removes_everything() {
    let store = MemoryStore::with_items([("a", "1"), ("b", "2")]);
    assert_eq!(store.keys(), vec!["a".to_owned(), "b".to_owned()]);
    store.clear().unwrap();
    assert!(store.is_empty());
}

#[test]
fn browser_store_kinds() {
    assert_eq!(BrowserStore::local().kind(), StorageKind::Local);
    assert_eq!(BrowserStore::session().kind(), StorageKind::Session);
}

#[cfg(not(feature = "csr"))]
#[test]
fn browser_store_is_unavailable_off_browser() {
    let store = BrowserStore::local();
    assert_eq!(store.get_item("token"), Err(StorageError::Unavailable));
    assert_eq!(store.set_item("token", "x"), Err(StorageError::Unavailable));
    assert_eq!(store.remove_item("token"), Err(StorageError::Unavailable));
    assert_eq!(store.clear(), Err(StorageError::Unavailable));
}

#[test]
fn storage_error_display_names_operation_and_key() {
    let err = StorageError::Operation { op: "remove", key: "user".to_owned(), message: "QuotaExceeded".to_owned() };
    assert_eq!(err.to_string(), "storage operation `remove` failed for `user`: QuotaExceeded");
}
