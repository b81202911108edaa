//! HTTP status code mapping and axum response conversion

use super::codes::ErrorCode;
use super::types::AppError;
use crate::response::ApiResponse;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::ClientNotFound
            | Self::ItemNotFound
            | Self::DiscountNotFound
            | Self::OrderNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::ClientPhoneExists
            | Self::ClientHasOpenOrders
            | Self::ItemNameExists
            | Self::InsufficientStock
            | Self::DiscountCodeExists
            | Self::InvalidTransition
            | Self::OrderAlreadyClosed => StatusCode::CONFLICT,

            // 402 Payment Required
            Self::InsufficientPayment => StatusCode::PAYMENT_REQUIRED,

            // 500 Internal Server Error
            Self::InternalError | Self::StorageError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        let body = axum::Json(ApiResponse::<()>::from_error(&self));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::OrderNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::DiscountNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ItemNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::InsufficientStock.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::InvalidTransition.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::DiscountCodeExists.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_payment_required_status() {
        assert_eq!(
            ErrorCode::InsufficientPayment.http_status(),
            StatusCode::PAYMENT_REQUIRED
        );
    }

    #[test]
    fn test_internal_error_status() {
        assert_eq!(
            ErrorCode::StorageError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_bad_request_default() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::DiscountExpired.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::NegativePayment.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
