//! API routing module
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`inventory`] - catalog and availability
//! - [`clients`] - client management
//! - [`discounts`] - discount administration and code validation
//! - [`orders`] - quoting, submission, lifecycle, returns, search

pub mod clients;
pub mod discounts;
pub mod health;
pub mod inventory;
pub mod orders;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
