//! Unified error codes for the Depot platform
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Client errors
//! - 2xxx: Inventory errors
//! - 3xxx: Discount errors
//! - 4xxx: Order errors
//! - 5xxx: Payment / settlement errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// End date precedes start date
    InvalidDateRange = 6,
    /// Value out of range
    ValueOutOfRange = 7,

    // ==================== 1xxx: Client ====================
    /// Client not found
    ClientNotFound = 1001,
    /// A client with this phone number already exists
    ClientPhoneExists = 1002,
    /// Client still has open orders
    ClientHasOpenOrders = 1003,

    // ==================== 2xxx: Inventory ====================
    /// Inventory item not found
    ItemNotFound = 2001,
    /// An item with this name already exists
    ItemNameExists = 2002,
    /// Not enough stock available for the requested date range
    InsufficientStock = 2003,
    /// Item is not available for rental
    ItemInactive = 2004,

    // ==================== 3xxx: Discount ====================
    /// No discount matches this code
    DiscountNotFound = 3001,
    /// Discount is not active
    DiscountInactive = 3002,
    /// Discount period has not started yet
    DiscountNotYetActive = 3003,
    /// Discount period has ended
    DiscountExpired = 3004,
    /// One-time discount already redeemed by this client
    DiscountAlreadyUsed = 3005,
    /// A discount with this code already exists
    DiscountCodeExists = 3006,
    /// Percentage discounts must be between 0 and 100
    DiscountValueOutOfRange = 3007,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no line items
    OrderEmpty = 4002,
    /// Status transition not allowed
    InvalidTransition = 4003,
    /// Order is not in a returnable state
    OrderNotReturnable = 4004,
    /// Returned + lost + damaged quantities do not match the ordered quantity
    ReturnQuantityMismatch = 4005,
    /// Order is already closed
    OrderAlreadyClosed = 4006,

    // ==================== 5xxx: Payment / Settlement ====================
    /// Payment amount is negative
    NegativePayment = 5001,
    /// Settlement requires a strictly positive payment
    InsufficientPayment = 5002,
    /// Payment amount exceeds the allowed maximum
    PaymentExceedsMaximum = 5003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Storage layer error
    StorageError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::InvalidDateRange => "End date precedes start date",
            Self::ValueOutOfRange => "Value out of range",

            Self::ClientNotFound => "Client not found",
            Self::ClientPhoneExists => "A client with this phone number already exists",
            Self::ClientHasOpenOrders => "Client still has open orders",

            Self::ItemNotFound => "Inventory item not found",
            Self::ItemNameExists => "An item with this name already exists",
            Self::InsufficientStock => "Not enough stock available for the requested dates",
            Self::ItemInactive => "Item is not available for rental",

            Self::DiscountNotFound => "No discount matches this code",
            Self::DiscountInactive => "Discount is not active",
            Self::DiscountNotYetActive => "Discount period has not started yet",
            Self::DiscountExpired => "Discount period has ended",
            Self::DiscountAlreadyUsed => "Discount already redeemed by this client",
            Self::DiscountCodeExists => "A discount with this code already exists",
            Self::DiscountValueOutOfRange => "Percentage discounts must be between 0 and 100",

            Self::OrderNotFound => "Order not found",
            Self::OrderEmpty => "Order has no line items",
            Self::InvalidTransition => "Status transition not allowed",
            Self::OrderNotReturnable => "Order is not in a returnable state",
            Self::ReturnQuantityMismatch => {
                "Returned, lost and damaged quantities do not match the ordered quantity"
            }
            Self::OrderAlreadyClosed => "Order is already closed",

            Self::NegativePayment => "Payment amount is negative",
            Self::InsufficientPayment => "A strictly positive payment is required",
            Self::PaymentExceedsMaximum => "Payment amount exceeds the allowed maximum",

            Self::InternalError => "Internal server error",
            Self::StorageError => "Storage layer error",
            Self::ConfigError => "Configuration error",
        }
    }

    /// Numeric value of this code
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", *self as u16)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

/// Error returned when deserializing an unknown error code value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::InvalidDateRange,
            7 => Self::ValueOutOfRange,

            1001 => Self::ClientNotFound,
            1002 => Self::ClientPhoneExists,
            1003 => Self::ClientHasOpenOrders,

            2001 => Self::ItemNotFound,
            2002 => Self::ItemNameExists,
            2003 => Self::InsufficientStock,
            2004 => Self::ItemInactive,

            3001 => Self::DiscountNotFound,
            3002 => Self::DiscountInactive,
            3003 => Self::DiscountNotYetActive,
            3004 => Self::DiscountExpired,
            3005 => Self::DiscountAlreadyUsed,
            3006 => Self::DiscountCodeExists,
            3007 => Self::DiscountValueOutOfRange,

            4001 => Self::OrderNotFound,
            4002 => Self::OrderEmpty,
            4003 => Self::InvalidTransition,
            4004 => Self::OrderNotReturnable,
            4005 => Self::ReturnQuantityMismatch,
            4006 => Self::OrderAlreadyClosed,

            5001 => Self::NegativePayment,
            5002 => Self::InsufficientPayment,
            5003 => Self::PaymentExceedsMaximum,

            9001 => Self::InternalError,
            9002 => Self::StorageError,
            9003 => Self::ConfigError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_u16() {
        for code in [
            ErrorCode::Success,
            ErrorCode::InvalidDateRange,
            ErrorCode::DiscountAlreadyUsed,
            ErrorCode::ReturnQuantityMismatch,
            ErrorCode::InsufficientPayment,
            ErrorCode::StorageError,
        ] {
            let value: u16 = code.into();
            assert_eq!(ErrorCode::try_from(value), Ok(code));
        }
    }

    #[test]
    fn test_unknown_value_rejected() {
        assert_eq!(ErrorCode::try_from(777), Err(InvalidErrorCode(777)));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(ErrorCode::DiscountNotFound.to_string(), "E3001");
        assert_eq!(ErrorCode::Success.to_string(), "E0000");
    }
}
