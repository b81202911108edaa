//! Order API module
//!
//! All mutations go through `OrdersManager`; handlers stay thin.

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::submit))
        .route("/quote", post(handler::quote))
        .route("/search", get(handler::search))
        .route("/{id}", get(handler::get_by_id))
        // Lifecycle transitions
        .route("/{id}/approve", post(handler::approve))
        .route("/{id}/reject", post(handler::reject))
        .route("/{id}/activate", post(handler::activate))
        .route("/{id}/pull-back", post(handler::pull_back))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/complete", post(handler::complete))
        // Return flow and settlement
        .route("/{id}/return", post(handler::process_return))
        .route("/{id}/settle", post(handler::settle))
        // Admin escape hatch
        .route("/{id}/override-status", post(handler::override_status))
}
