//! Discount Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Discount kind enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    /// Fixed amount off the subtotal, capped at the subtotal
    Fixed,
    /// Percentage of the subtotal (value is the percentage, e.g. 10 = 10%)
    Percentage,
}

/// Duration policy enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DurationPolicy {
    /// Redeemable once per client
    OneTime,
    /// No usage constraints
    Unlimited,
    /// Valid only inside [start_date, end_date]
    Period,
}

/// Stored discount status
///
/// `Expired` can also be derived from the period dates; see
/// [`Discount::effective_status`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountStatus {
    Active,
    Disabled,
    Expired,
}

/// Approval strategy for orders carrying this discount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalMode {
    #[default]
    Auto,
    Manual,
}

/// Catalog discount entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount {
    pub id: i64,
    pub name: String,
    /// Unique redemption code entered at checkout
    pub code: String,
    pub kind: DiscountKind,
    /// Fixed amount or percentage, depending on `kind`
    pub value: f64,
    pub duration: DurationPolicy,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: DiscountStatus,
    pub approval: ApprovalMode,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Discount {
    /// Status with date-based expiry applied on top of the stored status.
    ///
    /// A `PERIOD` discount whose end date has passed reads as `Expired`
    /// even if the stored status was never flipped.
    pub fn effective_status(&self, today: NaiveDate) -> DiscountStatus {
        if self.status == DiscountStatus::Active
            && self.duration == DurationPolicy::Period
            && let Some(end) = self.end_date
            && today > end
        {
            return DiscountStatus::Expired;
        }
        self.status
    }
}

/// Create discount payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCreate {
    pub name: String,
    pub code: String,
    pub kind: DiscountKind,
    pub value: f64,
    pub duration: DurationPolicy,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub approval: Option<ApprovalMode>,
}

/// Update discount payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    pub kind: Option<DiscountKind>,
    pub value: Option<f64>,
    pub duration: Option<DurationPolicy>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<DiscountStatus>,
    pub approval: Option<ApprovalMode>,
}

/// Recorded redemption of a discount against an order
///
/// `amount_applied` is the capped monetary amount actually taken off the
/// order, not the raw fixed/percentage value — the redemption log is the
/// authoritative source for usage and impact reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountRedemption {
    pub id: i64,
    pub discount_id: i64,
    pub order_id: i64,
    pub client_id: i64,
    pub amount_applied: f64,
    pub redeemed_at: i64,
}
