//! Money calculation utilities using rust_decimal for precision
//!
//! This module is the pricing core: every total shown to a client or
//! persisted on an order comes out of [`price_order`]. All calculations are
//! done using `Decimal` internally, then converted to `f64` for
//! storage/serialization.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use shared::models::{AppliedDiscount, CartLine, DiscountKind, Quote};
use thiserror::Error;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed per-day price per item (€1,000,000)
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line
const MAX_QUANTITY: i32 = 9999;
/// Maximum allowed payment amount (€1,000,000)
pub const MAX_PAYMENT_AMOUNT: f64 = 1_000_000.0;

/// Pricing failures, all recoverable by the caller
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    #[error("end date {end} precedes start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("{0}")]
    Validation(String),
}

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), PricingError> {
    if !value.is_finite() {
        return Err(PricingError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate a cart line before pricing
pub fn validate_cart_line(line: &CartLine) -> Result<(), PricingError> {
    require_finite(line.unit_price, "unit_price")?;
    if line.unit_price < 0.0 {
        return Err(PricingError::Validation(format!(
            "unit_price must be non-negative, got {}",
            line.unit_price
        )));
    }
    if line.unit_price > MAX_PRICE {
        return Err(PricingError::Validation(format!(
            "unit_price exceeds maximum allowed ({}), got {}",
            MAX_PRICE, line.unit_price
        )));
    }

    if line.quantity <= 0 {
        return Err(PricingError::Validation(format!(
            "quantity must be positive, got {}",
            line.quantity
        )));
    }
    if line.quantity > MAX_QUANTITY {
        return Err(PricingError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, line.quantity
        )));
    }

    Ok(())
}

/// Validate an ad-hoc or catalog discount descriptor before applying it
pub fn validate_discount(discount: &AppliedDiscount) -> Result<(), PricingError> {
    require_finite(discount.value, "discount value")?;
    if discount.value < 0.0 {
        return Err(PricingError::Validation(format!(
            "discount value must be non-negative, got {}",
            discount.value
        )));
    }
    if discount.kind == DiscountKind::Percentage && discount.value > 100.0 {
        return Err(PricingError::Validation(format!(
            "percentage discount must be between 0 and 100, got {}",
            discount.value
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Number of billable rental days between two calendar dates, inclusive.
///
/// A same-day rental bills as one day; picking up on the 1st and returning
/// on the 3rd bills three days. Defined only for `end >= start` — callers
/// validate the range before pricing (see [`price_order`]).
pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Days an order came back after its planned end date (0 when on time or
/// early). Exclusive count: planned 01-10, actual 01-13 is 3 late days.
pub fn days_late(planned_end: NaiveDate, actual_return: NaiveDate) -> i64 {
    (actual_return - planned_end).num_days().max(0)
}

/// Compute the discount amount for a subtotal.
///
/// - `FIXED`: `min(subtotal, value)` — a fixed discount never exceeds the
///   subtotal, so the discounted total cannot go negative.
/// - `PERCENTAGE`: `subtotal * value / 100`, not capped here. The 0–100
///   range is enforced when the discount is created, not at pricing time.
pub fn discount_amount(subtotal: Decimal, kind: DiscountKind, value: f64) -> Decimal {
    match kind {
        DiscountKind::Fixed => to_decimal(value).min(subtotal),
        DiscountKind::Percentage => (subtotal * to_decimal(value) / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero),
    }
}

/// Line total over the rental duration: `unit_price * quantity * days`
pub fn line_total(line: &CartLine, days: i64) -> Decimal {
    let total = to_decimal(line.unit_price) * Decimal::from(line.quantity) * Decimal::from(days);
    total.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Rental subtotal for a cart: sum of line totals
pub fn order_subtotal(lines: &[CartLine], days: i64) -> Decimal {
    lines.iter().map(|line| line_total(line, days)).sum()
}

/// Price an order: the one total formula.
///
/// 1. `days = rental_days(start, end)`
/// 2. `subtotal = Σ unit_price × quantity × days`
/// 3. `subtotal = max(0, subtotal - discount_amount)` when a discount applies
/// 4. `total = subtotal + penalty`
///
/// Quote previews, authoritative submission totals, order display, and
/// settlement recomputation all go through this function; a preview that
/// differs from the persisted total is a bug, not a rounding artifact.
pub fn price_order(
    lines: &[CartLine],
    start: NaiveDate,
    end: NaiveDate,
    discount: Option<&AppliedDiscount>,
    penalty: f64,
) -> Result<Quote, PricingError> {
    if end < start {
        return Err(PricingError::InvalidDateRange { start, end });
    }
    for line in lines {
        validate_cart_line(line)?;
    }
    require_finite(penalty, "penalty")?;
    if penalty < 0.0 {
        return Err(PricingError::Validation(format!(
            "penalty must be non-negative, got {}",
            penalty
        )));
    }

    let days = rental_days(start, end);
    let subtotal = order_subtotal(lines, days);

    let discount_applied = match discount {
        Some(d) => discount_amount(subtotal, d.kind, d.value),
        None => Decimal::ZERO,
    };
    let discounted = (subtotal - discount_applied).max(Decimal::ZERO);

    let total = discounted + to_decimal(penalty);

    Ok(Quote {
        days,
        subtotal: to_f64(subtotal),
        discount_amount: to_f64(discount_applied),
        total: to_f64(total),
    })
}
