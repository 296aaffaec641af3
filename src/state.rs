//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! carries the single database handle opened at start-up; handlers never
//! open connections of their own.

use crate::db::Database;

// =============================================================================
// APP STATE
// =============================================================================

/// Clone is required by Axum; `Database` clones share one pool.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
