//! Return settlement calculation
//!
//! When equipment comes back, the desk records the actual return date, a
//! per-line audit (returned / lost / damaged), and a payment. Settlement
//! re-derives the rental subtotal over the *actual* duration rather than
//! reusing the quoted figure, re-applies the originally recorded discount,
//! adds late/loss/damage fees, and decides whether the order closes as
//! `COMPLETED` or parks in `SETTLEMENT` with an outstanding balance.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use shared::models::{Order, OrderStatus, ReturnAuditLine, SettlementResult};
use thiserror::Error;

use super::calculator::{
    self, MAX_PAYMENT_AMOUNT, PricingError, days_late, to_decimal, to_f64,
};

/// Settlement failures, all recoverable by the caller
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettlementError {
    #[error("payment amount is negative")]
    NegativePayment,

    #[error("a strictly positive payment is required to settle a return")]
    InsufficientPayment,

    #[error("payment amount exceeds maximum allowed ({MAX_PAYMENT_AMOUNT})")]
    PaymentExceedsMaximum,

    #[error(
        "audit for item {item_id} does not reconcile: \
         {returned} returned + {lost} lost + {damaged} damaged != {ordered} ordered"
    )]
    QuantityMismatch {
        item_id: i64,
        returned: i32,
        lost: i32,
        damaged: i32,
        ordered: i32,
    },

    #[error("audit has negative quantities for item {0}")]
    NegativeAuditQuantity(i64),

    #[error("audit references item {0} which is not on the order")]
    UnknownItem(i64),

    #[error("audit line missing for item {0}")]
    MissingAudit(i64),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Validate a payment amount: strictly positive, finite, bounded.
///
/// Zero and negative payments are distinct failures — a zero payment is
/// not silently treated as "no payment".
pub fn validate_payment(amount: f64) -> Result<(), SettlementError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(SettlementError::NegativePayment);
    }
    if amount == 0.0 {
        return Err(SettlementError::InsufficientPayment);
    }
    if amount > MAX_PAYMENT_AMOUNT {
        return Err(SettlementError::PaymentExceedsMaximum);
    }
    Ok(())
}

/// Check the audit against the order lines and accumulate loss/damage fees.
///
/// Every order line must be audited exactly once, with non-negative
/// quantities reconciling to the ordered quantity. Audit lines naming
/// items not on the order are rejected.
fn reconcile_audit(
    order: &Order,
    audit: &[ReturnAuditLine],
) -> Result<(Decimal, Decimal), SettlementError> {
    for line in audit {
        if !order.items.iter().any(|item| item.item_id == line.item_id) {
            return Err(SettlementError::UnknownItem(line.item_id));
        }
    }

    let mut loss_fee = Decimal::ZERO;
    let mut damage_fee = Decimal::ZERO;

    for item in &order.items {
        let line = audit
            .iter()
            .find(|line| line.item_id == item.item_id)
            .ok_or(SettlementError::MissingAudit(item.item_id))?;

        if line.returned_quantity < 0 || line.lost_quantity < 0 || line.damaged_quantity < 0 {
            return Err(SettlementError::NegativeAuditQuantity(item.item_id));
        }

        let accounted = line.returned_quantity + line.lost_quantity + line.damaged_quantity;
        if accounted != item.quantity {
            return Err(SettlementError::QuantityMismatch {
                item_id: item.item_id,
                returned: line.returned_quantity,
                lost: line.lost_quantity,
                damaged: line.damaged_quantity,
                ordered: item.quantity,
            });
        }

        let cost = to_decimal(item.replacement_cost);
        loss_fee += cost * Decimal::from(line.lost_quantity);
        damage_fee += cost * Decimal::from(line.damaged_quantity);
    }

    Ok((loss_fee, damage_fee))
}

/// Compute the settlement for a returned order.
///
/// `late_fee_per_day` comes from configuration; `payment_amount` is the
/// payment taken at the return desk and must be strictly positive.
pub fn compute_settlement(
    order: &Order,
    actual_return: NaiveDate,
    audit: &[ReturnAuditLine],
    late_fee_per_day: f64,
    payment_amount: f64,
) -> Result<SettlementResult, SettlementError> {
    validate_payment(payment_amount)?;
    let (loss_fee, damage_fee) = reconcile_audit(order, audit)?;

    let late_days = days_late(order.end_date, actual_return);
    let late_fee = Decimal::from(late_days) * to_decimal(late_fee_per_day);

    let penalty = late_fee + loss_fee + damage_fee;

    // Rebill over the actual duration. An early return still bills at
    // least the pickup day, so the billing end never precedes the start.
    let billing_end = actual_return.max(order.start_date);
    let lines: Vec<_> = order.items.iter().map(|item| item.as_cart_line()).collect();
    let quote = calculator::price_order(
        &lines,
        order.start_date,
        billing_end,
        order.discount.as_ref(),
        to_f64(penalty),
    )?;

    let revised_total = to_decimal(quote.total);
    let paid = to_decimal(order.paid_amount) + to_decimal(payment_amount);
    let balance = revised_total - paid;

    let status = if balance <= Decimal::ZERO {
        OrderStatus::Completed
    } else {
        OrderStatus::Settlement
    };

    Ok(SettlementResult {
        days_late: late_days,
        late_fee: to_f64(late_fee),
        loss_fee: to_f64(loss_fee),
        damage_fee: to_f64(damage_fee),
        revised_total: to_f64(revised_total),
        balance: to_f64(balance),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{AppliedDiscount, DiscountKind, OrderItem};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn item(id: i64, price: f64, qty: i32, replacement: f64) -> OrderItem {
        OrderItem {
            item_id: id,
            name: format!("Item {}", id),
            quantity: qty,
            unit_price: price,
            replacement_cost: replacement,
            returned_quantity: 0,
            lost_quantity: 0,
            damaged_quantity: 0,
        }
    }

    fn order(items: Vec<OrderItem>, start: &str, end: &str) -> Order {
        Order {
            id: 1,
            reference: "DPT-TEST0001".to_string(),
            client_id: 10,
            client_name: "Ada Lovelace".to_string(),
            client_phone: None,
            client_email: None,
            status: OrderStatus::Active,
            start_date: date(start),
            end_date: date(end),
            closed_date: None,
            total: 0.0,
            paid_amount: 0.0,
            penalty_amount: 0.0,
            discount: None,
            items,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn full_return(order: &Order) -> Vec<ReturnAuditLine> {
        order
            .items
            .iter()
            .map(|item| ReturnAuditLine {
                item_id: item.item_id,
                returned_quantity: item.quantity,
                lost_quantity: 0,
                damaged_quantity: 0,
            })
            .collect()
    }

    #[test]
    fn test_on_time_return_has_no_late_fee() {
        let order = order(vec![item(1, 10.0, 2, 100.0)], "2024-01-01", "2024-01-10");
        let audit = full_return(&order);
        let result =
            compute_settlement(&order, date("2024-01-10"), &audit, 50.0, 200.0).unwrap();
        assert_eq!(result.days_late, 0);
        assert_eq!(result.late_fee, 0.0);
    }

    #[test]
    fn test_early_return_has_no_late_fee() {
        let order = order(vec![item(1, 10.0, 2, 100.0)], "2024-01-01", "2024-01-10");
        let audit = full_return(&order);
        let result = compute_settlement(&order, date("2024-01-05"), &audit, 50.0, 100.0).unwrap();
        assert_eq!(result.late_fee, 0.0);
        // Rebilled over 5 actual days, not the 10 planned: 10 * 2 * 5
        assert_eq!(result.revised_total, 100.0);
    }

    #[test]
    fn test_scenario_e_three_days_late() {
        // planned end 2024-01-10, actual 2024-01-13, 50/day -> 150 late fee
        let order = order(vec![item(1, 10.0, 1, 100.0)], "2024-01-01", "2024-01-10");
        let audit = full_return(&order);
        let result = compute_settlement(&order, date("2024-01-13"), &audit, 50.0, 10.0).unwrap();
        assert_eq!(result.days_late, 3);
        assert_eq!(result.late_fee, 150.0);
        // Rebilled over the actual 13-day duration plus the late fee
        assert_eq!(result.revised_total, 10.0 * 13.0 + 150.0);
    }

    #[test]
    fn test_loss_and_damage_fees() {
        let order = order(vec![item(1, 10.0, 4, 250.0)], "2024-01-01", "2024-01-02");
        let audit = vec![ReturnAuditLine {
            item_id: 1,
            returned_quantity: 1,
            lost_quantity: 2,
            damaged_quantity: 1,
        }];
        let result = compute_settlement(&order, date("2024-01-02"), &audit, 50.0, 10.0).unwrap();
        assert_eq!(result.loss_fee, 500.0);
        assert_eq!(result.damage_fee, 250.0);
        // subtotal 10*4*2 = 80, penalties 750
        assert_eq!(result.revised_total, 830.0);
    }

    #[test]
    fn test_discount_reapplied_over_actual_duration() {
        let mut order = order(vec![item(1, 100.0, 1, 500.0)], "2024-01-01", "2024-01-04");
        order.discount = Some(AppliedDiscount {
            name: "Loyal".to_string(),
            kind: DiscountKind::Percentage,
            value: 10.0,
        });
        let audit = full_return(&order);
        // Returned two days late: 6 actual days
        let result = compute_settlement(&order, date("2024-01-06"), &audit, 25.0, 10.0).unwrap();
        // subtotal 600, 10% discount 60, late fee 2*25
        assert_eq!(result.revised_total, 600.0 - 60.0 + 50.0);
    }

    #[test]
    fn test_balance_nonpositive_iff_completed() {
        let order = order(vec![item(1, 10.0, 1, 100.0)], "2024-01-01", "2024-01-02");
        let audit = full_return(&order);

        // Total is 20; paying exactly 20 completes
        let paid = compute_settlement(&order, date("2024-01-02"), &audit, 50.0, 20.0).unwrap();
        assert_eq!(paid.balance, 0.0);
        assert_eq!(paid.status, OrderStatus::Completed);

        // Paying less parks the order in settlement
        let partial = compute_settlement(&order, date("2024-01-02"), &audit, 50.0, 5.0).unwrap();
        assert_eq!(partial.balance, 15.0);
        assert_eq!(partial.status, OrderStatus::Settlement);

        // Overpaying still completes
        let over = compute_settlement(&order, date("2024-01-02"), &audit, 50.0, 25.0).unwrap();
        assert!(over.balance < 0.0);
        assert_eq!(over.status, OrderStatus::Completed);
    }

    #[test]
    fn test_prior_payments_count_toward_balance() {
        let mut order = order(vec![item(1, 10.0, 1, 100.0)], "2024-01-01", "2024-01-02");
        order.paid_amount = 15.0;
        let audit = full_return(&order);
        let result = compute_settlement(&order, date("2024-01-02"), &audit, 50.0, 5.0).unwrap();
        assert_eq!(result.balance, 0.0);
        assert_eq!(result.status, OrderStatus::Completed);
    }

    #[test]
    fn test_zero_payment_rejected_as_insufficient() {
        let order = order(vec![item(1, 10.0, 1, 100.0)], "2024-01-01", "2024-01-02");
        let audit = full_return(&order);
        let err = compute_settlement(&order, date("2024-01-02"), &audit, 50.0, 0.0).unwrap_err();
        assert_eq!(err, SettlementError::InsufficientPayment);
    }

    #[test]
    fn test_negative_payment_rejected_distinctly() {
        let order = order(vec![item(1, 10.0, 1, 100.0)], "2024-01-01", "2024-01-02");
        let audit = full_return(&order);
        let err = compute_settlement(&order, date("2024-01-02"), &audit, 50.0, -5.0).unwrap_err();
        assert_eq!(err, SettlementError::NegativePayment);
    }

    #[test]
    fn test_unreconciled_audit_rejected() {
        let order = order(vec![item(1, 10.0, 3, 100.0)], "2024-01-01", "2024-01-02");
        let audit = vec![ReturnAuditLine {
            item_id: 1,
            returned_quantity: 1,
            lost_quantity: 0,
            damaged_quantity: 1,
        }];
        let err = compute_settlement(&order, date("2024-01-02"), &audit, 50.0, 10.0).unwrap_err();
        assert!(matches!(err, SettlementError::QuantityMismatch { item_id: 1, .. }));
    }

    #[test]
    fn test_unknown_audit_item_rejected() {
        let order = order(vec![item(1, 10.0, 1, 100.0)], "2024-01-01", "2024-01-02");
        let audit = vec![
            ReturnAuditLine {
                item_id: 1,
                returned_quantity: 1,
                lost_quantity: 0,
                damaged_quantity: 0,
            },
            ReturnAuditLine {
                item_id: 99,
                returned_quantity: 1,
                lost_quantity: 0,
                damaged_quantity: 0,
            },
        ];
        let err = compute_settlement(&order, date("2024-01-02"), &audit, 50.0, 10.0).unwrap_err();
        assert_eq!(err, SettlementError::UnknownItem(99));
    }

    #[test]
    fn test_missing_audit_line_rejected() {
        let order = order(
            vec![item(1, 10.0, 1, 100.0), item(2, 5.0, 1, 50.0)],
            "2024-01-01",
            "2024-01-02",
        );
        let audit = vec![ReturnAuditLine {
            item_id: 1,
            returned_quantity: 1,
            lost_quantity: 0,
            damaged_quantity: 0,
        }];
        let err = compute_settlement(&order, date("2024-01-02"), &audit, 50.0, 10.0).unwrap_err();
        assert_eq!(err, SettlementError::MissingAudit(2));
    }

    #[test]
    fn test_return_before_start_bills_pickup_day() {
        let order = order(vec![item(1, 10.0, 1, 100.0)], "2024-06-10", "2024-06-12");
        let audit = full_return(&order);
        let result = compute_settlement(&order, date("2024-06-09"), &audit, 50.0, 10.0).unwrap();
        // Clamped to the pickup day: one billable day
        assert_eq!(result.revised_total, 10.0);
    }
}
