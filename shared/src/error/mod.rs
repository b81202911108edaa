//! Unified error system for the Depot platform
//!
//! - [`ErrorCode`]: standardized error codes for all error types
//! - [`ErrorCategory`]: classification of errors by domain
//! - [`AppError`]: rich error type with codes, messages, and details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Client errors
//! - 2xxx: Inventory errors
//! - 3xxx: Discount errors
//! - 4xxx: Order errors
//! - 5xxx: Payment / settlement errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::DiscountExpired);
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "quantity must be positive");
//! let err = AppError::validation("missing end date").with_detail("field", "end_date");
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResult, AppError};
