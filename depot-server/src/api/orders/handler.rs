//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use shared::models::{
    Order, OrderStatus, OrderSubmit, Quote, QuoteRequest, ReturnRequest, SettlePaymentRequest,
    SettlementResult, StatusOverrideRequest,
};
use shared::util::today;

use crate::core::ServerState;
use crate::orders::status::effective_status;
use crate::utils::AppResult;

/// Apply the display-time status derivation before an order leaves the API
fn present(mut order: Order) -> Order {
    order.status = effective_status(order.status, order.start_date, today());
    order
}

/// POST /api/orders/quote - price a cart without persisting anything
pub async fn quote(
    State(state): State<ServerState>,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<Quote>> {
    let quote = state.orders.quote(payload).await?;
    Ok(Json(quote))
}

/// POST /api/orders - submit an order
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<OrderSubmit>,
) -> AppResult<Json<Order>> {
    let order = state.orders.submit(payload).await?;
    Ok(Json(order))
}

/// GET /api/orders
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Order>>> {
    let orders = state.orders.list().await?;
    Ok(Json(orders.into_iter().map(present).collect()))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub status: Option<OrderStatus>,
    pub limit: Option<usize>,
}

/// GET /api/orders/search?q=&status=&limit=
pub async fn search(
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = state
        .orders
        .search(&query.q, query.status, query.limit.unwrap_or(50))
        .await?;
    Ok(Json(orders.into_iter().map(present).collect()))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let order = state.orders.get(id).await?;
    Ok(Json(present(order)))
}

/// POST /api/orders/:id/approve
pub async fn approve(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.approve(id).await?))
}

/// POST /api/orders/:id/reject
pub async fn reject(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.reject(id).await?))
}

/// POST /api/orders/:id/activate - explicit handout
pub async fn activate(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.activate(id).await?))
}

/// POST /api/orders/:id/pull-back - withdraw an approval
pub async fn pull_back(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.pull_back(id).await?))
}

/// POST /api/orders/:id/cancel
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.cancel(id).await?))
}

/// POST /api/orders/:id/complete - close without the return flow
pub async fn complete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.complete(id).await?))
}

/// Return processing response: the updated order plus the settlement
/// breakdown for the desk receipt
#[derive(Debug, Serialize)]
pub struct ReturnResponse {
    pub order: Order,
    pub settlement: SettlementResult,
}

/// POST /api/orders/:id/return
pub async fn process_return(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ReturnRequest>,
) -> AppResult<Json<ReturnResponse>> {
    let (order, settlement) = state.orders.process_return(id, payload).await?;
    Ok(Json(ReturnResponse { order, settlement }))
}

/// POST /api/orders/:id/settle - further payment against a settlement balance
pub async fn settle(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<SettlePaymentRequest>,
) -> AppResult<Json<Order>> {
    Ok(Json(state.orders.settle_payment(id, payload.amount).await?))
}

/// POST /api/orders/:id/override-status - admin escape hatch
pub async fn override_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<StatusOverrideRequest>,
) -> AppResult<Json<Order>> {
    let order = state
        .orders
        .override_status(id, payload.status, payload.reason.as_deref())
        .await?;
    Ok(Json(order))
}
