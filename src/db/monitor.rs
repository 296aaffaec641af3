//! Connection monitor: periodic probe with transition logging.
//!
//! DESIGN
//! ======
//! A background task pings the store on a fixed interval and feeds each
//! result to a [`HealthTracker`]. Only transitions are logged, so a store
//! that stays down produces one `Disconnected` line, not one per tick.
//! Errors that leave the connection usable (a failing query) are logged
//! every time as `Error`. Nothing here is fatal; the pool reconnects on its
//! own and the tracker reports `Reconnected` once a probe succeeds again.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::Database;

#[cfg(test)]
#[path = "monitor_test.rs"]
mod monitor_test;

/// Observable connection events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A probe failed but the store is still reachable.
    Error(String),
    /// The store became unreachable.
    Disconnected(String),
    /// A probe succeeded after a disconnect.
    Reconnected,
}

/// Whether the error means the store cannot be reached at all.
fn is_connectivity_error(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
    )
}

/// Turns a stream of probe results into transition events.
#[derive(Debug)]
pub struct HealthTracker {
    reachable: bool,
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthTracker {
    /// A tracker for a connection that was just established.
    #[must_use]
    pub fn new() -> Self {
        Self { reachable: true }
    }

    #[must_use]
    pub fn is_reachable(&self) -> bool {
        self.reachable
    }

    pub fn observe(&mut self, result: &Result<(), sqlx::Error>) -> Option<ConnectionEvent> {
        match result {
            Ok(()) if self.reachable => None,
            Ok(()) => {
                self.reachable = true;
                Some(ConnectionEvent::Reconnected)
            }
            Err(e) if is_connectivity_error(e) => {
                if !self.reachable {
                    return None;
                }
                self.reachable = false;
                Some(ConnectionEvent::Disconnected(e.to_string()))
            }
            Err(e) => Some(ConnectionEvent::Error(e.to_string())),
        }
    }
}

fn log_event(endpoint: &str, event: &ConnectionEvent) {
    match event {
        ConnectionEvent::Error(message) => error!(%endpoint, error = %message, "database error"),
        ConnectionEvent::Disconnected(message) => warn!(%endpoint, error = %message, "database disconnected"),
        ConnectionEvent::Reconnected => info!(%endpoint, "database reconnected"),
    }
}

/// Spawn the monitor task. Exits on its own once the pool is closed.
pub fn spawn_monitor(db: Database, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut tracker = HealthTracker::new();
        loop {
            interval.tick().await;
            if db.pool().is_closed() {
                break;
            }
            let result = db.ping().await;
            if let Some(event) = tracker.observe(&result) {
                log_event(db.endpoint(), &event);
            }
            debug!(reachable = tracker.is_reachable(), "database probe");
        }
    })
}
