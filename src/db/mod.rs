//! Database connection bootstrap.
//!
//! SYSTEM CONTEXT
//! ==============
//! `main` calls [`connect`] once before binding the listener. The returned
//! [`Database`] is the process-wide connection handle: it lives in
//! `AppState`, is observed by [`monitor`], and is closed by
//! [`crate::shutdown::run_until_shutdown`].
//!
//! TRADE-OFFS
//! ==========
//! Exactly one connect attempt is made. A server that cannot reach its store
//! at start-up exits instead of serving degraded responses; after start-up
//! the pool owns reconnection and failures are only logged.

pub mod monitor;

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Connection, PgConnection, PgPool};

use crate::config::DbConfig;


pub const DEFAULT_DATABASE_NAME: &str = "insightdeck";
pub const DEFAULT_DATABASE_URL: &str = "postgres://127.0.0.1:5432/insightdeck";
const APPLICATION_NAME: &str = "insightdeck";
const STATEMENT_CACHE_CAPACITY: usize = 100;

/// Errors produced while establishing the connection.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The URI does not parse as a connection string.
    #[error("invalid database url {endpoint}: {source}")]
    InvalidUrl {
        endpoint: String,
        #[source]
        source: sqlx::Error,
    },
    /// The single connect attempt failed.
    #[error("database connect failed for {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: sqlx::Error,
    },
    /// The single connect attempt did not finish within the connect timeout.
    #[error("database connect to {endpoint} timed out after {after:?}")]
    Timeout { endpoint: String, after: Duration },
}

/// Lifecycle of the connection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No live connection is held (not yet connected, or every connection dropped).
    Disconnected,
    /// At least one live connection is pooled.
    Connected,
    /// Closed on shutdown. Terminal.
    Closed,
}

/// Process-wide connection handle. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    endpoint: String,
}

impl Database {
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Connection target with credentials redacted, safe to log.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[must_use]
    pub fn state(&self) -> ConnectionState {
        if self.pool.is_closed() {
            ConnectionState::Closed
        } else if self.pool.size() == 0 {
            ConnectionState::Disconnected
        } else {
            ConnectionState::Connected
        }
    }

    /// Round-trip a trivial query.
    ///
    /// # Errors
    ///
    /// Returns the driver error when the store cannot be reached.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close every pooled connection and refuse new acquisitions.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!(endpoint = %self.endpoint, state = ?self.state(), "database connection closed");
    }
}

/// Resolve the configured URI, applying the local default and default
/// database name.
///
/// - `None` or blank: [`DEFAULT_DATABASE_URL`]
/// - no database path (`postgres://host:5432`): `/insightdeck` is appended
#[must_use]
pub fn resolve_uri(raw: Option<&str>) -> String {
    let Some(uri) = raw.map(str::trim).filter(|u| !u.is_empty()) else {
        return DEFAULT_DATABASE_URL.to_owned();
    };
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_owned();
    };
    let (location, query) = match rest.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (rest, None),
    };
    let has_database = location.split_once('/').is_some_and(|(_, db)| !db.is_empty());
    if has_database {
        return uri.to_owned();
    }

    let host = location.trim_end_matches('/');
    match query {
        Some(query) => format!("{scheme}://{host}/{DEFAULT_DATABASE_NAME}?{query}"),
        None => format!("{scheme}://{host}/{DEFAULT_DATABASE_NAME}"),
    }
}

/// Strip credentials from a URI for logging.
#[must_use]
pub fn redact(uri: &str) -> String {
    match uri.split_once("://") {
        Some((scheme, rest)) => match rest.rsplit_once('@') {
            Some((_, host)) => format!("{scheme}://***@{host}"),
            None => uri.to_owned(),
        },
        None => uri.to_owned(),
    }
}

fn connect_options(uri: &str) -> Result<PgConnectOptions, DbError> {
    let options: PgConnectOptions =
        uri.parse().map_err(|source| DbError::InvalidUrl { endpoint: redact(uri), source })?;
    Ok(options
        .application_name(APPLICATION_NAME)
        .statement_cache_capacity(STATEMENT_CACHE_CAPACITY))
}

/// Fixed pool topology applied to every connection.
fn pool_options(config: &DbConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.connect_timeout)
        .test_before_acquire(true)
}

/// Open the connection with a single attempt, then build the pool over it.
///
/// The attempt is one direct connection bounded by `connect_timeout`. The
/// pool's own connect loop retries refused connections with backoff, so it
/// only takes over once the store has answered once.
///
/// # Errors
///
/// Returns [`DbError::InvalidUrl`] when the URI does not parse,
/// [`DbError::Connect`] with the driver error when the attempt fails, and
/// [`DbError::Timeout`] when it does not finish in time. Nothing is retried.
pub async fn connect(config: &DbConfig) -> Result<Database, DbError> {
    let uri = resolve_uri(config.url.as_deref());
    let endpoint = redact(&uri);
    let options = connect_options(&uri)?;

    tracing::info!(%endpoint, "connecting to database");
    let conn = match tokio::time::timeout(config.connect_timeout, PgConnection::connect_with(&options)).await {
        Ok(Ok(conn)) => conn,
        Ok(Err(source)) => return Err(DbError::Connect { endpoint, source }),
        Err(_) => return Err(DbError::Timeout { endpoint, after: config.connect_timeout }),
    };
    if let Err(e) = conn.close().await {
        tracing::warn!(%endpoint, error = %e, "closing bootstrap connection failed");
    }

    let pool = pool_options(config).min_connections(1).connect_lazy_with(options);
    tracing::info!(%endpoint, "database connected");
    Ok(Database { pool, endpoint })
}

/// Handle over a pool that has not connected yet.
#[cfg(test)]
pub(crate) fn connect_lazy(config: &DbConfig) -> Result<Database, DbError> {
    let uri = resolve_uri(config.url.as_deref());
    let endpoint = redact(&uri);
    let pool = pool_options(config).connect_lazy_with(connect_options(&uri)?);
    Ok(Database { pool, endpoint })
}
