//! Discount Redemption Repository
//!
//! Append-only audit log of discount usage. Kept separate from the
//! discount definitions so usage counts and impact reports never mutate
//! the discount itself, and so the log stays authoritative for "what was
//! actually taken off" (the capped amount, not the configured value).

use std::sync::Arc;

use shared::models::DiscountRedemption;
use shared::util::{now_millis, snowflake_id};

use super::RepoResult;
use crate::db::MemoryDb;

#[derive(Clone)]
pub struct RedemptionRepository {
    db: Arc<MemoryDb>,
}

impl RedemptionRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }

    /// Append a redemption to the log
    pub async fn record(
        &self,
        discount_id: i64,
        order_id: i64,
        client_id: i64,
        amount_applied: f64,
    ) -> RepoResult<DiscountRedemption> {
        let redemption = DiscountRedemption {
            id: snowflake_id(),
            discount_id,
            order_id,
            client_id,
            amount_applied,
            redeemed_at: now_millis(),
        };
        self.db.redemptions.write().push(redemption.clone());
        Ok(redemption)
    }

    /// Whether a client has already redeemed a given discount
    pub async fn exists_for(&self, discount_id: i64, client_id: i64) -> RepoResult<bool> {
        Ok(self
            .db
            .redemptions
            .read()
            .iter()
            .any(|r| r.discount_id == discount_id && r.client_id == client_id))
    }

    /// All redemptions of a discount, oldest first
    pub async fn list_for_discount(&self, discount_id: i64) -> RepoResult<Vec<DiscountRedemption>> {
        Ok(self
            .db
            .redemptions
            .read()
            .iter()
            .filter(|r| r.discount_id == discount_id)
            .cloned()
            .collect())
    }
}
