//! Inventory Item Model

use serde::{Deserialize, Serialize};

/// Rental inventory item entity
///
/// `daily_rate` is the rental price per billable day; `replacement_cost`
/// is charged per unit for lost equipment (and per unit for damage, at the
/// same rate). Both are non-negative — enforced at create/update time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    /// Rental price per day
    pub daily_rate: f64,
    /// Charged per lost/damaged unit
    pub replacement_cost: f64,
    /// Units owned by the depot
    pub stock_total: i32,
    /// Display ordering in listings
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create inventory item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemCreate {
    pub name: String,
    pub category: Option<String>,
    pub daily_rate: f64,
    pub replacement_cost: f64,
    pub stock_total: i32,
    pub sort_order: Option<i32>,
}

/// Update inventory item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItemUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub daily_rate: Option<f64>,
    pub replacement_cost: Option<f64>,
    pub stock_total: Option<i32>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Per-item availability for a requested date range
///
/// `available` is derived per request (stock total minus units committed to
/// overlapping open orders), never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemAvailability {
    pub item_id: i64,
    pub name: String,
    pub category: Option<String>,
    pub daily_rate: f64,
    pub replacement_cost: f64,
    pub stock_total: i32,
    pub available: i32,
    pub sort_order: i32,
}

impl ItemAvailability {
    /// Snapshot an item together with its derived availability
    pub fn from_item(item: &InventoryItem, available: i32) -> Self {
        Self {
            item_id: item.id,
            name: item.name.clone(),
            category: item.category.clone(),
            daily_rate: item.daily_rate,
            replacement_cost: item.replacement_cost,
            stock_total: item.stock_total,
            available,
            sort_order: item.sort_order,
        }
    }
}
