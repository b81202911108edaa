//! Order Repository
//!
//! Orders are stored as [`OrderRecord`] rows; the adapter in
//! `db::records` is the only mapping point between the row shape and the
//! domain model.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use shared::models::{Order, OrderStatus};

use super::{RepoError, RepoResult};
use crate::db::MemoryDb;
use crate::db::records::OrderRecord;

/// Statuses that hold stock for their date range. Terminal states release
/// it, and settlement means the equipment is already back or written off.
const STOCK_HOLDING: [OrderStatus; 3] =
    [OrderStatus::Pending, OrderStatus::Approved, OrderStatus::Active];

#[derive(Clone)]
pub struct OrderRepository {
    db: Arc<MemoryDb>,
}

impl OrderRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }

    pub async fn insert(&self, order: &Order) -> RepoResult<()> {
        self.db.orders.insert(order.id, OrderRecord::from_model(order));
        Ok(())
    }

    pub async fn update(&self, order: &Order) -> RepoResult<()> {
        if !self.db.orders.contains_key(&order.id) {
            return Err(RepoError::NotFound(format!("order {} not found", order.id)));
        }
        self.db.orders.insert(order.id, OrderRecord::from_model(order));
        Ok(())
    }

    pub async fn find_by_id(&self, id: i64) -> RepoResult<Option<Order>> {
        Ok(self.db.orders.get(&id).map(|entry| entry.clone().into_model()))
    }

    /// All orders, most recently created first
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let mut orders: Vec<Order> = self
            .db
            .orders
            .iter()
            .map(|entry| entry.clone().into_model())
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Search by public reference, client name, phone, or email.
    ///
    /// The term matches case-insensitively as a substring; an optional
    /// status filter narrows the result before the limit applies.
    pub async fn search(
        &self,
        term: &str,
        status: Option<OrderStatus>,
        limit: usize,
    ) -> RepoResult<Vec<Order>> {
        let needle = term.trim().to_lowercase();
        let mut orders: Vec<Order> = self
            .db
            .orders
            .iter()
            .map(|entry| entry.clone().into_model())
            .filter(|order| status.is_none_or(|s| order.status == s))
            .filter(|order| {
                if needle.is_empty() {
                    return true;
                }
                order.reference.to_lowercase().contains(&needle)
                    || order.client_name.to_lowercase().contains(&needle)
                    || order
                        .client_phone
                        .as_deref()
                        .is_some_and(|p| p.to_lowercase().contains(&needle))
                    || order
                        .client_email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&needle))
            })
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit);
        Ok(orders)
    }

    /// Units committed per item across open orders overlapping a date range.
    ///
    /// Subtracting this from stock totals yields the available counts for
    /// an availability snapshot or a submission stock check.
    pub async fn committed_quantities(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepoResult<HashMap<i64, i32>> {
        let mut committed: HashMap<i64, i32> = HashMap::new();
        for entry in self.db.orders.iter() {
            if !STOCK_HOLDING.contains(&entry.status) {
                continue;
            }
            // Date ranges are inclusive on both ends
            if entry.end_date < start || entry.start_date > end {
                continue;
            }
            for item in &entry.items {
                *committed.entry(item.item_id).or_insert(0) += item.quantity;
            }
        }
        Ok(committed)
    }

    /// Whether a client has any non-terminal order
    pub async fn has_open_orders(&self, client_id: i64) -> RepoResult<bool> {
        Ok(self
            .db
            .orders
            .iter()
            .any(|entry| entry.client_id == client_id && !entry.status.is_terminal()))
    }

    /// Approved orders whose start date has arrived (status-advance sweep)
    pub async fn due_for_activation(&self, today: NaiveDate) -> RepoResult<Vec<Order>> {
        Ok(self
            .db
            .orders
            .iter()
            .filter(|entry| entry.status == OrderStatus::Approved && entry.start_date <= today)
            .map(|entry| entry.clone().into_model())
            .collect())
    }
}
