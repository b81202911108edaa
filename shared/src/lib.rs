//! Shared types for the Depot rental platform
//!
//! This crate holds the domain model and error system shared between the
//! depot server and any future client crates:
//!
//! - **Models** (`models`): inventory, clients, discounts, orders
//! - **Errors** (`error`): unified error codes and the [`AppError`] type
//! - **Responses** (`response`): the API envelope returned by every handler
//! - **Utilities** (`util`): timestamps, snowflake IDs, public order references

pub mod error;
pub mod models;
pub mod response;
pub mod util;

pub use error::{ApiResult, AppError, ErrorCategory, ErrorCode};
pub use response::ApiResponse;
