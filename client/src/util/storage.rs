//! Key/value storage seam over browser `localStorage` and `sessionStorage`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session layer never touches `web-sys` directly. It talks to a
//! [`KeyValueStore`] so the same clearing policy runs against the browser
//! stores in WASM and against [`MemoryStore`] in native tests.
//!
//! TRADE-OFFS
//! ==========
//! [`BrowserStore`] resolves the storage object on every call instead of
//! caching the `web_sys::Storage` handle, which keeps the type `Send + Sync`
//! for Leptos context at the cost of one window lookup per operation.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

/// Failure of a single storage operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    /// No storage backend is reachable (no window, storage disabled, or native build).
    #[error("storage unavailable")]
    Unavailable,
    /// The backend rejected the operation (quota, security error, ...).
    #[error("storage operation `{op}` failed for `{key}`: {message}")]
    Operation { op: &'static str, key: String, message: String },
    /// A value could not be encoded for storage.
    #[error("storage encode failed: {0}")]
    Encode(String),
}

/// Minimal string key/value store.
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the removal.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend rejects the clear.
    fn clear(&self) -> Result<(), StorageError>;
}

// =============================================================================
// BROWSER STORE
// =============================================================================

/// Which browser store to address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageKind {
    /// `localStorage`: persists across tabs and restarts.
    Local,
    /// `sessionStorage`: per-tab, transient.
    Session,
}

/// Browser-backed store. Every operation fails with
/// [`StorageError::Unavailable`] outside a `csr` build.
#[derive(Clone, Copy, Debug)]
pub struct BrowserStore {
    kind: StorageKind,
}

impl BrowserStore {
    #[must_use]
    pub fn local() -> Self {
        Self { kind: StorageKind::Local }
    }

    #[must_use]
    pub fn session() -> Self {
        Self { kind: StorageKind::Session }
    }

    #[must_use]
    pub fn kind(&self) -> StorageKind {
        self.kind
    }

    #[cfg(feature = "csr")]
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let storage = match self.kind {
            StorageKind::Local => window.local_storage(),
            StorageKind::Session => window.session_storage(),
        };
        storage.ok().flatten().ok_or(StorageError::Unavailable)
    }
}

#[cfg(feature = "csr")]
fn js_error(op: &'static str, key: &str, err: &wasm_bindgen::JsValue) -> StorageError {
    StorageError::Operation { op, key: key.to_owned(), message: format!("{err:?}") }
}

impl KeyValueStore for BrowserStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "csr")]
        {
            self.storage()?.get_item(key).map_err(|e| js_error("get", key, &e))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            self.storage()?.set_item(key, value).map_err(|e| js_error("set", key, &e))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            self.storage()?.remove_item(key).map_err(|e| js_error("remove", key, &e))
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn clear(&self) -> Result<(), StorageError> {
        #[cfg(feature = "csr")]
        {
            self.storage()?.clear().map_err(|e| js_error("clear", "*", &e))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(StorageError::Unavailable)
        }
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store used off the browser and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `pairs`.
    #[must_use]
    pub fn with_items<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let items = pairs.into_iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect();
        Self { items: Mutex::new(items) }
    }

    /// Snapshot of the stored keys in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map is still structurally valid; keep serving it.
        self.items.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.lock().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.lock().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.lock().clear();
        Ok(())
    }
}
