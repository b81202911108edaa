//! Discount API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use shared::error::ErrorCode;
use shared::models::{Discount, DiscountCreate, DiscountRedemption, DiscountUpdate};
use shared::util::today;

use crate::core::ServerState;
use crate::db::repository::{DiscountRepository, RedemptionRepository, Repository};
use crate::pricing::DiscountError;
use crate::utils::{AppError, AppResult};

/// GET /api/discounts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Discount>>> {
    let repo = DiscountRepository::new(state.db.clone());
    let discounts = repo.find_all().await?;
    Ok(Json(discounts))
}

/// GET /api/discounts/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Discount>> {
    let repo = DiscountRepository::new(state.db.clone());
    let discount = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DiscountNotFound))?;
    Ok(Json(discount))
}

/// POST /api/discounts
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiscountCreate>,
) -> AppResult<Json<Discount>> {
    let repo = DiscountRepository::new(state.db.clone());
    let discount = repo.create(payload).await?;
    crate::audit_log!("admin", "create", &format!("discount:{}", discount.id));
    Ok(Json(discount))
}

/// PUT /api/discounts/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<DiscountUpdate>,
) -> AppResult<Json<Discount>> {
    let repo = DiscountRepository::new(state.db.clone());
    let discount = repo.update(id, payload).await?;
    crate::audit_log!("admin", "update", &format!("discount:{}", id));
    Ok(Json(discount))
}

/// DELETE /api/discounts/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let repo = DiscountRepository::new(state.db.clone());
    let removed = repo.delete(id).await?;
    if removed {
        crate::audit_log!("admin", "delete", &format!("discount:{}", id));
    }
    Ok(Json(removed))
}

/// GET /api/discounts/:id/redemptions - usage audit trail
pub async fn redemptions(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<DiscountRedemption>>> {
    let repo = RedemptionRepository::new(state.db.clone());
    let log = repo.list_for_discount(id).await?;
    Ok(Json(log))
}

#[derive(Debug, Deserialize)]
pub struct ValidateQuery {
    pub code: String,
    pub client_id: Option<i64>,
}

/// Outcome of a preview validation
#[derive(Debug, Serialize)]
pub struct DiscountValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Discount>,
}

/// GET /api/discounts/validate?code=&client_id=
///
/// Advisory only: the UI debounces calls to this as the code is typed.
/// Submission runs the same rule set again inside the write lock, so a
/// code that expires between preview and confirm still aborts the order.
pub async fn validate(
    State(state): State<ServerState>,
    Query(query): Query<ValidateQuery>,
) -> AppResult<Json<DiscountValidation>> {
    match state
        .orders
        .engine()
        .validate_code(&query.code, query.client_id, today())
        .await
    {
        Ok(discount) => Ok(Json(DiscountValidation {
            valid: true,
            reason: None,
            discount: Some(discount),
        })),
        Err(DiscountError::Storage(msg)) => Err(AppError::storage(msg)),
        Err(err) => Ok(Json(DiscountValidation {
            valid: false,
            reason: Some(err.to_string()),
            discount: None,
        })),
    }
}
