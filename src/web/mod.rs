//! HTTP server for the comparison UI.

pub mod page;
pub mod routes;

use anyhow::{Context, Result};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::compare::Comparator;

/// Application state shared across handlers.
pub struct AppState {
    pub comparator: Comparator,
}

impl AppState {
    pub fn new(comparator: Comparator) -> Self {
        Self { comparator }
    }
}

pub type SharedState = Arc<AppState>;

/// Build the router with every route mounted.
pub fn router(state: SharedState) -> Router {
    Router::new()
        .merge(routes::page_routes())
        .merge(routes::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve on a bound listener until `shutdown` resolves.
pub async fn serve<F>(state: SharedState, listener: TcpListener, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}
