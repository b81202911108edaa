use std::sync::Arc;

use crate::core::Config;
use crate::db::MemoryDb;
use crate::orders::OrdersManager;

/// Server state - shared handles for all request handlers
///
/// Cloning is shallow: the store and manager live behind `Arc`.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// In-process store backing the repositories
    pub db: Arc<MemoryDb>,
    /// Order orchestration (pricing, lifecycle, returns)
    pub orders: Arc<OrdersManager>,
}

impl ServerState {
    /// Build the state for a fresh server: empty store, manager wired to it
    pub fn initialize(config: &Config) -> Self {
        let db = MemoryDb::new();
        let orders = OrdersManager::new(db.clone(), config.late_fee_per_day);
        Self {
            config: config.clone(),
            db,
            orders,
        }
    }
}
