use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::{create_pool, migrations};
use crate::handlers;
use crate::state::AppState;

/// Build the application state and Axum router from a [`Config`].
///
/// Creates the database pool, runs pending migrations and attaches the
/// middleware stack. Returns the shared state and a ready-to-serve router.
pub fn build_app(config: Config) -> Result<(AppState, Router), Box<dyn std::error::Error>> {
    let db = create_pool(&config.database_path)?;

    {
        let mut conn = db.get()?;
        let applied = migrations::run_migrations(&mut conn, &config.migrations_path)?;
        tracing::info!(applied, "Database migrations complete");
    }

    let state = AppState::new(db, config);

    let app = Router::new()
        .merge(handlers::routes())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    Ok((state, app))
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(
    app: Router,
    host: &str,
    port: u16,
) -> Result<(u16, JoinHandle<std::io::Result<()>>), Box<dyn std::error::Error>> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move { axum::serve(listener, app).await });

    Ok((actual_port, handle))
}
