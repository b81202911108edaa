//! Client API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use shared::error::ErrorCode;
use shared::models::{Client, ClientCreate, ClientUpdate};

use crate::core::ServerState;
use crate::db::repository::{ClientRepository, OrderRepository, Repository};
use crate::utils::{AppError, AppResult};

/// GET /api/clients
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Client>>> {
    let repo = ClientRepository::new(state.db.clone());
    let clients = repo.find_all().await?;
    Ok(Json(clients))
}

/// GET /api/clients/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Client>> {
    let repo = ClientRepository::new(state.db.clone());
    let client = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ClientNotFound))?;
    Ok(Json(client))
}

/// POST /api/clients
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClientCreate>,
) -> AppResult<Json<Client>> {
    let repo = ClientRepository::new(state.db.clone());
    let client = repo.create(payload).await?;
    crate::audit_log!("admin", "create", &format!("client:{}", client.id));
    Ok(Json(client))
}

/// PUT /api/clients/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ClientUpdate>,
) -> AppResult<Json<Client>> {
    let repo = ClientRepository::new(state.db.clone());
    let client = repo.update(id, payload).await?;
    crate::audit_log!("admin", "update", &format!("client:{}", id));
    Ok(Json(client))
}

/// DELETE /api/clients/:id - refused while the client has open orders
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let orders = OrderRepository::new(state.db.clone());
    if orders.has_open_orders(id).await? {
        return Err(AppError::new(ErrorCode::ClientHasOpenOrders).with_detail("client_id", id));
    }

    let repo = ClientRepository::new(state.db.clone());
    let removed = repo.delete(id).await?;
    if removed {
        crate::audit_log!("admin", "delete", &format!("client:{}", id));
    }
    Ok(Json(removed))
}
