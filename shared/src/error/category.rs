//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Client errors
/// - 2xxx: Inventory errors
/// - 3xxx: Discount errors
/// - 4xxx: Order errors
/// - 5xxx: Payment / settlement errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Client errors (1xxx)
    Client,
    /// Inventory errors (2xxx)
    Inventory,
    /// Discount errors (3xxx)
    Discount,
    /// Order errors (4xxx)
    Order,
    /// Payment / settlement errors (5xxx)
    Payment,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Client,
            2000..3000 => Self::Inventory,
            3000..4000 => Self::Discount,
            4000..5000 => Self::Order,
            5000..6000 => Self::Payment,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Client => "client",
            Self::Inventory => "inventory",
            Self::Discount => "discount",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(*self as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        assert_eq!(ErrorCode::ValidationFailed.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::ClientNotFound.category(), ErrorCategory::Client);
        assert_eq!(ErrorCode::InsufficientStock.category(), ErrorCategory::Inventory);
        assert_eq!(ErrorCode::DiscountExpired.category(), ErrorCategory::Discount);
        assert_eq!(ErrorCode::InvalidTransition.category(), ErrorCategory::Order);
        assert_eq!(ErrorCode::NegativePayment.category(), ErrorCategory::Payment);
        assert_eq!(ErrorCode::StorageError.category(), ErrorCategory::System);
    }
}
