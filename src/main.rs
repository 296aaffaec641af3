mod config;
mod db;
mod routes;
mod shutdown;
mod state;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    // Fatal on purpose: one attempt, no retry.
    let db = match db::connect(&config.db).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "database connection failed");
            return ExitCode::FAILURE;
        }
    };

    let _monitor = db::monitor::spawn_monitor(db.clone(), config.db.monitor_interval);

    let app = routes::app(state::AppState::new(db.clone()), &config.static_dir);
    let listener = match tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, port = config.port, "failed to bind");
            db.close().await;
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(port = config.port, "insightdeck listening");
    let serve = axum::serve(listener, app).with_graceful_shutdown(shutdown::shutdown_signal());
    let status = shutdown::run_until_shutdown(&db, async move { serve.await }).await;
    ExitCode::from(status)
}
