//! Inventory Repository

use std::sync::Arc;

use shared::models::{InventoryItem, InventoryItemCreate, InventoryItemUpdate};
use shared::util::{now_millis, snowflake_id};

use super::{RepoError, RepoResult, Repository};
use crate::db::MemoryDb;

#[derive(Clone)]
pub struct InventoryRepository {
    db: Arc<MemoryDb>,
}

impl InventoryRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }

    /// Find an item by name (case-insensitive)
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<InventoryItem>> {
        Ok(self
            .db
            .inventory
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
            .map(|entry| entry.clone()))
    }

    fn validate(daily_rate: f64, replacement_cost: f64, stock_total: i32) -> RepoResult<()> {
        if !daily_rate.is_finite() || daily_rate < 0.0 {
            return Err(RepoError::Validation(format!(
                "daily_rate must be non-negative, got {}",
                daily_rate
            )));
        }
        if !replacement_cost.is_finite() || replacement_cost < 0.0 {
            return Err(RepoError::Validation(format!(
                "replacement_cost must be non-negative, got {}",
                replacement_cost
            )));
        }
        if stock_total < 0 {
            return Err(RepoError::Validation(format!(
                "stock_total must be non-negative, got {}",
                stock_total
            )));
        }
        Ok(())
    }
}

impl Repository<InventoryItem, InventoryItemCreate, InventoryItemUpdate> for InventoryRepository {
    /// All items, catalog order (sort_order, then name)
    async fn find_all(&self) -> RepoResult<Vec<InventoryItem>> {
        let mut items: Vec<InventoryItem> =
            self.db.inventory.iter().map(|entry| entry.clone()).collect();
        items.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(items)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<InventoryItem>> {
        Ok(self.db.inventory.get(&id).map(|entry| entry.clone()))
    }

    async fn create(&self, data: InventoryItemCreate) -> RepoResult<InventoryItem> {
        Self::validate(data.daily_rate, data.replacement_cost, data.stock_total)?;
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "inventory item '{}' already exists",
                data.name
            )));
        }

        let now = now_millis();
        let item = InventoryItem {
            id: snowflake_id(),
            name: data.name,
            category: data.category,
            daily_rate: data.daily_rate,
            replacement_cost: data.replacement_cost,
            stock_total: data.stock_total,
            sort_order: data.sort_order.unwrap_or(0),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.db.inventory.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: i64, data: InventoryItemUpdate) -> RepoResult<InventoryItem> {
        if let Some(new_name) = &data.name
            && let Some(existing) = self.find_by_name(new_name).await?
            && existing.id != id
        {
            return Err(RepoError::Duplicate(format!(
                "inventory item '{}' already exists",
                new_name
            )));
        }

        let mut entry = self
            .db
            .inventory
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("inventory item {} not found", id)))?;

        // Apply to a copy first so a failed validation leaves the row untouched
        let mut item = entry.clone();
        if let Some(name) = data.name {
            item.name = name;
        }
        if let Some(category) = data.category {
            item.category = Some(category);
        }
        if let Some(rate) = data.daily_rate {
            item.daily_rate = rate;
        }
        if let Some(cost) = data.replacement_cost {
            item.replacement_cost = cost;
        }
        if let Some(stock) = data.stock_total {
            item.stock_total = stock;
        }
        if let Some(order) = data.sort_order {
            item.sort_order = order;
        }
        if let Some(active) = data.is_active {
            item.is_active = active;
        }
        Self::validate(item.daily_rate, item.replacement_cost, item.stock_total)?;
        item.updated_at = now_millis();
        *entry.value_mut() = item.clone();
        Ok(item)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.db.inventory.remove(&id).is_some())
    }
}
