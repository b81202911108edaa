//! Utility module - logging plus handler-facing error aliases

pub mod logger;

pub use shared::error::{AppError, ErrorCode};

/// Result type returned by every HTTP handler
pub type AppResult<T> = Result<T, AppError>;
