//! API Server - HTTP front end for the dispatcher

use axum::{
    routing::get,
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};

/// HTTP server exposing the send endpoints
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    pub fn new(state: AppState, addr: String) -> Self {
        Self {
            state: Arc::new(state),
            addr,
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        Router::new()
            .route(
                "/send",
                get(handlers::send_by_slug).post(handlers::send_inline),
            )
            .route("/health", get(handlers::health))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve until `shutdown` resolves, then finish in-flight requests
    pub async fn run<F>(&self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        info!("Starting API server on {}", listener.local_addr()?);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("API server stopped accepting requests");
        Ok(())
    }
}
