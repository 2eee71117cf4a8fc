use axum::http::Uri;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

use crate::clock::Clock;
use crate::config::Config;
use crate::db::{create_pool, migrations};
use crate::error::AppError;
use crate::handlers;
use crate::state::AppState;

/// Build the application state and Axum router from a [`Config`].
///
/// Creates the database pool and brings the schema up to date before any
/// request is served.
pub fn build_app(
    config: Config,
    clock: Arc<dyn Clock>,
) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let db = create_pool(&config.database_path)?;

    {
        let conn = db.get()?;
        let applied = migrations::run_migrations(&conn, &config.migrations_path)?;
        if applied > 0 {
            tracing::info!(applied, "Applied database migrations");
        }
    }

    let state = AppState::new(db, config, clock);
    let app = router(state.clone());

    Ok((state, app))
}

/// The full HTTP surface over an existing state.
pub fn router(state: AppState) -> Router {
    handlers::routes(&state)
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<()>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok((actual_port, handle))
}
