//! In-process store backing the repositories

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use shared::models::{Client, Discount, DiscountRedemption, InventoryItem};

use super::records::OrderRecord;

/// In-memory tables, keyed by snowflake ID.
///
/// The redemption log is append-only and kept in insertion order, matching
/// how an audit table would behave.
#[derive(Debug, Default)]
pub struct MemoryDb {
    pub(crate) inventory: DashMap<i64, InventoryItem>,
    pub(crate) clients: DashMap<i64, Client>,
    pub(crate) discounts: DashMap<i64, Discount>,
    pub(crate) orders: DashMap<i64, OrderRecord>,
    pub(crate) redemptions: RwLock<Vec<DiscountRedemption>>,
}

impl MemoryDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}
