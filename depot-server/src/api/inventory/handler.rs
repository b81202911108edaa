//! Inventory API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;

use shared::models::{
    InventoryItem, InventoryItemCreate, InventoryItemUpdate, ItemAvailability,
};

use crate::core::ServerState;
use crate::db::repository::{InventoryRepository, Repository};
use crate::utils::{AppError, AppResult};

/// GET /api/inventory - full catalog
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<InventoryItem>>> {
    let repo = InventoryRepository::new(state.db.clone());
    let items = repo.find_all().await?;
    Ok(Json(items))
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// GET /api/inventory/availability?start=&end= - derived availability for a
/// date range
pub async fn availability(
    State(state): State<ServerState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<ItemAvailability>>> {
    let snapshot = state.orders.availability(query.start, query.end).await?;
    Ok(Json(snapshot))
}

/// GET /api/inventory/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<InventoryItem>> {
    let repo = InventoryRepository::new(state.db.clone());
    let item = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("inventory item {}", id)))?;
    Ok(Json(item))
}

/// POST /api/inventory
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<InventoryItemCreate>,
) -> AppResult<Json<InventoryItem>> {
    let repo = InventoryRepository::new(state.db.clone());
    let item = repo.create(payload).await?;
    crate::audit_log!("admin", "create", &format!("inventory:{}", item.id));
    Ok(Json(item))
}

/// PUT /api/inventory/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<InventoryItemUpdate>,
) -> AppResult<Json<InventoryItem>> {
    let repo = InventoryRepository::new(state.db.clone());
    let item = repo.update(id, payload).await?;
    crate::audit_log!("admin", "update", &format!("inventory:{}", id));
    Ok(Json(item))
}

/// DELETE /api/inventory/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = InventoryRepository::new(state.db.clone());
    let removed = repo.delete(id).await?;
    if removed {
        crate::audit_log!("admin", "delete", &format!("inventory:{}", id));
    }
    Ok(Json(removed))
}
