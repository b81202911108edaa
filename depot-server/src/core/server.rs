//! HTTP server assembly and lifecycle

use std::time::Duration;

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, ServerState};

pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Serve the API until ctrl-c, then shut background tasks down cleanly
    pub async fn run(self) -> anyhow::Result<()> {
        let mut tasks = BackgroundTasks::new();
        self.spawn_status_advance(&mut tasks);

        let app = build_router(self.state.clone());
        let addr = format!("0.0.0.0:{}", self.config.http_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(%addr, "Depot server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tasks.shutdown().await;
        Ok(())
    }

    /// Periodic sweep persisting the Approved → Active promotion once an
    /// order's start date arrives
    fn spawn_status_advance(&self, tasks: &mut BackgroundTasks) {
        let token = tasks.shutdown_token();
        let manager = self.state.orders.clone();
        let interval = Duration::from_secs(self.config.status_advance_interval_secs.max(1));

        tasks.spawn("status_advance", TaskKind::Periodic, async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match manager.advance_approved(shared::util::today()).await {
                            Ok(0) => {}
                            Ok(count) => {
                                tracing::info!(count, "activated approved orders");
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "status advance sweep failed");
                            }
                        }
                    }
                }
            }
        });
    }
}

/// Assemble the full API router with shared middleware
pub fn build_router(state: ServerState) -> Router {
    Router::new()
        .merge(api::health::router())
        .merge(api::inventory::router())
        .merge(api::clients::router())
        .merge(api::discounts::router())
        .merge(api::orders::router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install ctrl-c handler");
    }
}
