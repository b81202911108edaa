//! Order orchestration
//!
//! [`manager::OrdersManager`] owns every order mutation: submission,
//! lifecycle transitions, return processing, settlement payments, and the
//! admin override. The pricing core stays pure; this module is where its
//! outputs get persisted together with stock accounting and redemption
//! recording.

pub mod manager;
pub mod status;

pub use manager::OrdersManager;

use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;
use thiserror::Error;

use crate::db::RepoError;
use crate::pricing::{DiscountError, PricingError, SettlementError};

/// Order orchestration failures
#[derive(Debug, Clone, Error)]
pub enum OrderError {
    #[error("order {0} not found")]
    NotFound(i64),

    #[error("client {0} not found")]
    ClientNotFound(i64),

    #[error("order has no line items")]
    Empty,

    #[error("inventory item {0} not found")]
    ItemNotFound(i64),

    #[error("inventory item {0} is not available for rental")]
    ItemInactive(i64),

    #[error("insufficient stock for item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: i64,
        requested: i32,
        available: i32,
    },

    #[error("cannot transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order is not in a returnable state ({0})")]
    NotReturnable(OrderStatus),

    #[error(transparent)]
    Discount(#[from] DiscountError),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Settlement(#[from] SettlementError),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(id) => {
                AppError::new(ErrorCode::OrderNotFound).with_detail("order_id", id)
            }
            OrderError::ClientNotFound(id) => {
                AppError::new(ErrorCode::ClientNotFound).with_detail("client_id", id)
            }
            OrderError::Empty => AppError::new(ErrorCode::OrderEmpty),
            OrderError::ItemNotFound(id) => {
                AppError::new(ErrorCode::ItemNotFound).with_detail("item_id", id)
            }
            OrderError::ItemInactive(id) => {
                AppError::new(ErrorCode::ItemInactive).with_detail("item_id", id)
            }
            OrderError::InsufficientStock {
                item_id,
                requested,
                available,
            } => AppError::new(ErrorCode::InsufficientStock)
                .with_detail("item_id", item_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            OrderError::InvalidTransition { from, to } => {
                AppError::new(ErrorCode::InvalidTransition)
                    .with_detail("from", from.to_string())
                    .with_detail("to", to.to_string())
            }
            OrderError::NotReturnable(status) => AppError::new(ErrorCode::OrderNotReturnable)
                .with_detail("status", status.to_string()),
            OrderError::Discount(inner) => inner.into(),
            OrderError::Pricing(inner) => inner.into(),
            OrderError::Settlement(inner) => inner.into(),
            OrderError::Repo(inner) => inner.into(),
        }
    }
}
