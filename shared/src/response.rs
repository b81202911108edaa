//! API Response types
//!
//! Standardized API response structure returned by every handler

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};

/// Unified API response structure
///
/// All API responses follow this format:
/// ```json
/// {
///     "code": 0,
///     "message": "Success",
///     "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response code (0 = success, others = error codes)
    pub code: u16,
    /// Human-readable message
    pub message: String,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            code: ErrorCode::Success.as_u16(),
            message: "Success".to_string(),
            data: Some(data),
        }
    }

    /// Create a successful response with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success.as_u16(),
            message: message.into(),
            data: Some(data),
        }
    }

    /// Create an error response from an [`AppError`]
    pub fn from_error(err: &AppError) -> Self {
        Self {
            code: err.code.as_u16(),
            message: err.message.clone(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_envelope() {
        let resp = ApiResponse::ok(42);
        assert_eq!(resp.code, 0);
        assert_eq!(resp.data, Some(42));
    }

    #[test]
    fn test_error_envelope() {
        let err = AppError::new(ErrorCode::InsufficientStock);
        let resp = ApiResponse::<()>::from_error(&err);
        assert_eq!(resp.code, 2003);
        assert!(resp.data.is_none());
    }
}
