//! Pricing and settlement core
//!
//! Pure calculation first: [`calculator`] prices carts and orders,
//! [`settlement`] audits returns. [`engine`] is the only stateful piece —
//! it checks discount codes against the catalog and redemption log.

pub mod calculator;
pub mod engine;
pub mod settlement;

pub use calculator::{PricingError, price_order, rental_days};
pub use engine::{DiscountEngine, DiscountError};
pub use settlement::{SettlementError, compute_settlement};

use shared::error::{AppError, ErrorCode};

impl From<PricingError> for AppError {
    fn from(err: PricingError) -> Self {
        match &err {
            PricingError::InvalidDateRange { .. } => {
                AppError::with_message(ErrorCode::InvalidDateRange, err.to_string())
            }
            PricingError::Validation(msg) => {
                AppError::with_message(ErrorCode::ValidationFailed, msg.clone())
            }
        }
    }
}

impl From<SettlementError> for AppError {
    fn from(err: SettlementError) -> Self {
        match &err {
            SettlementError::NegativePayment => AppError::new(ErrorCode::NegativePayment),
            SettlementError::InsufficientPayment => AppError::new(ErrorCode::InsufficientPayment),
            SettlementError::PaymentExceedsMaximum => {
                AppError::new(ErrorCode::PaymentExceedsMaximum)
            }
            SettlementError::QuantityMismatch { .. }
            | SettlementError::UnknownItem(_)
            | SettlementError::MissingAudit(_) => {
                AppError::with_message(ErrorCode::ReturnQuantityMismatch, err.to_string())
            }
            SettlementError::NegativeAuditQuantity(_) => {
                AppError::with_message(ErrorCode::ValidationFailed, err.to_string())
            }
            SettlementError::Pricing(inner) => inner.clone().into(),
        }
    }
}
