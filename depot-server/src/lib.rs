//! Depot Server - rental equipment management
//!
//! # Architecture overview
//!
//! The pricing and settlement core is pure: every total comes out of
//! `pricing::calculator::price_order`, and return audits go through
//! `pricing::settlement::compute_settlement`. Everything around it is
//! orchestration:
//!
//! - **Pricing** (`pricing`): duration, totals, discounts, settlement
//! - **Orders** (`orders`): status machine and the orchestration manager
//! - **Storage** (`db`): repositories over an in-process store
//! - **HTTP API** (`api`): per-resource routers and handlers
//!
//! # Module structure
//!
//! ```text
//! depot-server/src/
//! ├── core/          # config, state, server, background tasks
//! ├── pricing/       # calculator, discount engine, settlement
//! ├── orders/        # status machine, orders manager
//! ├── db/            # repositories, records, in-process store
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # logging
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod orders;
pub mod pricing;
pub mod utils;

// Re-export public types
pub use crate::core::{Config, Server, ServerState};
pub use crate::orders::OrdersManager;
pub use crate::pricing::{DiscountEngine, compute_settlement, price_order, rental_days};
pub use crate::utils::{AppError, AppResult};

// Re-export logger functions
pub use crate::utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    ____                   __
   / __ \___  ____  ____  / /_
  / / / / _ \/ __ \/ __ \/ __/
 / /_/ /  __/ /_/ / /_/ / /_
/_____/\___/ .___/\____/\__/
          /_/
    "#
    );
}
