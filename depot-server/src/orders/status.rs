//! Order status state machine
//!
//! The normal lifecycle runs Pending → Approved → Active → Completed, with
//! Rejected/Canceled exits early on and Settlement parked between return
//! and final payment. Admin overrides bypass this table entirely (see
//! `OrdersManager::override_status`).

use chrono::NaiveDate;
use shared::models::OrderStatus;

/// Whether `from → to` is a legal transition in the normal lifecycle
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    use OrderStatus::*;
    matches!(
        (from, to),
        (Pending, Approved)
            | (Pending, Rejected)
            | (Pending, Canceled)
            | (Approved, Active)
            // Pull-back: an approval can be withdrawn before handout
            | (Approved, Pending)
            | (Approved, Canceled)
            | (Active, Completed)
            | (Active, Settlement)
            | (Settlement, Completed)
    )
}

/// Status as it should display today.
///
/// An approved order whose start date has arrived reads as active even if
/// the periodic sweep has not persisted the transition yet. Every display
/// path goes through this one helper so they cannot disagree.
pub fn effective_status(status: OrderStatus, start_date: NaiveDate, today: NaiveDate) -> OrderStatus {
    if status == OrderStatus::Approved && start_date <= today {
        OrderStatus::Active
    } else {
        status
    }
}
