//! HTTP surface for the model router: the three public operations
//! (`GET /models`, `PUT /models`, `POST /route`) plus a `/health` liveness
//! endpoint. No auth, billing, rate-limiting, or CORS/CSRF middleware —
//! this service sits behind whatever edge already handles that.

mod dto;
mod handlers;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use router_core::{Preset, RouterService};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Assembled server: the routed `axum::Router` plus the address it will
/// bind. The builder/`serve` split lets tests drive the router directly
/// without binding a real socket.
pub struct Server {
    state: AppState,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server around an already-constructed [`RouterService`].
    /// Wiring the service together (registry, classifiers, client pool) is
    /// the `router` binary's job, not this crate's — `router-server` only
    /// knows how to expose one over HTTP.
    pub fn new(service: Arc<RouterService>, listen_address: SocketAddr) -> Self {
        Self { state: AppState::new(service), listen_address }
    }

    /// Override the preset a `/route` request falls back to when it omits
    /// `priorityPreset`. Defaults to [`Preset::default`].
    #[must_use]
    pub fn with_default_preset(mut self, preset: Preset) -> Self {
        self.state = self.state.with_default_preset(preset);
        self
    }

    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/models", get(handlers::get_models).put(handlers::put_models))
            .route("/route", post(handlers::post_route))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Consume the server and return the inner router — used directly by
    /// tests that manage their own listener.
    pub fn into_router(self) -> Router {
        Self::build_router(self.state)
    }

    /// Bind and serve until `shutdown` is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails.
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "router listening");

        axum::serve(listener, Self::build_router(self.state))
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
