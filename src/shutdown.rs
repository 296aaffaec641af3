//! Termination hook.
//!
//! The server future is driven with [`shutdown_signal`] as its graceful
//! shutdown trigger. Once it returns, the database is closed before the
//! process exits, so no connection outlives the listener.

use std::future::Future;

use tokio::signal;
use tracing::{error, info};

use crate::db::Database;

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_test;

pub const EXIT_OK: u8 = 0;
pub const EXIT_SERVER_ERROR: u8 = 1;

/// Resolves on Ctrl+C, or SIGTERM on unix.
///
/// A handler that cannot be installed never fires; the other one still can.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("interrupt received, shutting down"),
        () = terminate => info!("SIGTERM received, shutting down"),
    }
}

/// Drive `serve` to completion, then close the database.
///
/// Returns the process exit status: [`EXIT_OK`] after a clean shutdown,
/// [`EXIT_SERVER_ERROR`] when the server itself failed. The database is
/// closed in both cases.
pub async fn run_until_shutdown<F>(db: &Database, serve: F) -> u8
where
    F: Future<Output = std::io::Result<()>>,
{
    let status = match serve.await {
        Ok(()) => EXIT_OK,
        Err(e) => {
            error!(error = %e, "server failed");
            EXIT_SERVER_ERROR
        }
    };
    db.close().await;
    status
}
