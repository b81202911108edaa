//! Order Model
//!
//! Orders snapshot everything they need at submission time: client contact
//! details, per-line unit prices, replacement costs, and the applied
//! discount descriptor. Later catalog edits never change what an existing
//! order is worth.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::discount::DiscountKind;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Submitted, waiting for an admin decision
    Pending,
    /// Accepted; equipment reserved for the date range
    Approved,
    /// Declined by an admin
    Rejected,
    /// Equipment handed out
    Active,
    /// Returned and fully paid (or closed without penalty)
    Completed,
    /// Returned and audited, but a balance remains
    Settlement,
    /// Withdrawn by the client before handout
    Canceled,
}

impl OrderStatus {
    /// Terminal states accept no further transitions outside the admin
    /// override escape hatch.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected | Self::Canceled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Settlement => "SETTLEMENT",
            Self::Canceled => "CANCELED",
        };
        write!(f, "{}", s)
    }
}

/// A cart line as submitted by the client
///
/// `unit_price` is the per-day price snapshotted when the line was added to
/// the cart, so a catalog price edit does not retroactively reprice an
/// in-progress cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    pub item_id: i64,
    pub quantity: i32,
    /// Per-day price frozen at add-to-cart time
    pub unit_price: f64,
}

/// An order line with its post-return audit fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub item_id: i64,
    /// Item name snapshot (for invoices and historical display)
    pub name: String,
    pub quantity: i32,
    /// Per-day price frozen at order time
    pub unit_price: f64,
    /// Replacement cost frozen at order time (loss/damage fees)
    pub replacement_cost: f64,
    /// Units returned in good condition
    #[serde(default)]
    pub returned_quantity: i32,
    /// Units not returned
    #[serde(default)]
    pub lost_quantity: i32,
    /// Units returned damaged
    #[serde(default)]
    pub damaged_quantity: i32,
}

impl OrderItem {
    /// The cart-line view of this order line, used when settlement re-runs
    /// the pricing formula over the actual rental duration.
    pub fn as_cart_line(&self) -> CartLine {
        CartLine {
            item_id: self.item_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
        }
    }
}

/// Discount descriptor denormalized onto an order
///
/// Display cache only: the redemption log (for catalog discounts) is the
/// authoritative record. Settlement re-applies the discount at this
/// recorded kind/value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppliedDiscount {
    pub name: String,
    pub kind: DiscountKind,
    pub value: f64,
}

/// Rental order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// Opaque public-facing reference, derived from `id`
    pub reference: String,
    pub client_id: i64,
    /// Client identity captured at order time, not a live reference
    pub client_name: String,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
    pub status: OrderStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Actual return date, set when the return is processed
    pub closed_date: Option<NaiveDate>,
    /// Authoritative grand total (after discount, including penalties)
    pub total: f64,
    pub paid_amount: f64,
    /// Late + loss + damage fees accrued at return time
    pub penalty_amount: f64,
    pub discount: Option<AppliedDiscount>,
    pub items: Vec<OrderItem>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Outstanding balance (negative means overpaid)
    pub fn balance(&self) -> f64 {
        self.total - self.paid_amount
    }
}

/// Order submission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderSubmit {
    pub client_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lines: Vec<CartLine>,
    /// Catalog discount code (validated and redeemed at submission)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    /// Ad-hoc discount entered directly on the order; mutually exclusive
    /// with `discount_code`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_discount: Option<AppliedDiscount>,
}

/// Quote request — same inputs as a submission, minus the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub lines: Vec<CartLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_discount: Option<AppliedDiscount>,
    /// Lets the preview surface `DiscountAlreadyUsed` for one-time codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i64>,
}

/// Priced preview of an order
///
/// Produced by the same aggregator that prices submissions, so the preview
/// can never drift from the persisted total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub days: i64,
    pub subtotal: f64,
    pub discount_amount: f64,
    pub total: f64,
}

/// Per-line audit entered when equipment comes back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnAuditLine {
    pub item_id: i64,
    pub returned_quantity: i32,
    #[serde(default)]
    pub lost_quantity: i32,
    #[serde(default)]
    pub damaged_quantity: i32,
}

/// Return processing payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnRequest {
    pub actual_return_date: NaiveDate,
    /// Payment taken at the return desk; must be strictly positive
    pub payment_amount: f64,
    pub lines: Vec<ReturnAuditLine>,
}

/// Computed outcome of a return audit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettlementResult {
    pub days_late: i64,
    pub late_fee: f64,
    pub loss_fee: f64,
    pub damage_fee: f64,
    /// Grand total over the actual rental duration, discount re-applied,
    /// penalties included
    pub revised_total: f64,
    /// Remaining after all payments, including the one taken at the desk
    pub balance: f64,
    pub status: OrderStatus,
}

/// Follow-up payment against an order in settlement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlePaymentRequest {
    pub amount: f64,
}

/// Admin escape hatch: force a status outside the transition graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOverrideRequest {
    pub status: OrderStatus,
    pub reason: Option<String>,
}
