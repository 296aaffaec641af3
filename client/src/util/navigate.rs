//! Hard navigation seam.
//!
//! Session teardown must leave the app in a clean state, so it navigates by
//! assigning `location.href` (full page load) rather than through the router.

use std::sync::Mutex;

/// Navigates the browser to a path.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Assigns `window.location.href`. No-op outside a `csr` build.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        #[cfg(feature = "csr")]
        {
            let Some(window) = web_sys::window() else {
                log::error!("navigation to {path} failed: no window");
                return;
            };
            if let Err(e) = window.location().set_href(path) {
                log::error!("navigation to {path} failed: {e:?}");
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            log::debug!("navigation to {path} skipped outside the browser");
        }
    }
}

/// Records requested paths instead of navigating.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths navigated to so far, oldest first.
    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(path.to_owned());
        }
    }
}
