//! Discount Engine
//!
//! Validates discount codes against the catalog and the redemption log.
//! The same rule set runs in two places: advisory at preview time (as the
//! client types a code) and authoritatively inside order submission. A
//! code that stops being valid between preview and confirm aborts the
//! submission rather than silently dropping the discount.

use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use shared::error::{AppError, ErrorCode};
use shared::models::{Discount, DiscountRedemption, DiscountStatus, DurationPolicy};

use crate::db::repository::{DiscountRepository, RedemptionRepository};
use crate::db::{MemoryDb, RepoError, RepoResult};

/// Discount validation failures, in the order the checks run
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DiscountError {
    #[error("no discount matches this code")]
    NotFound,

    #[error("discount is not active")]
    Inactive,

    #[error("discount period has not started yet")]
    NotYetActive,

    #[error("discount period has ended")]
    Expired,

    #[error("discount already redeemed by this client")]
    AlreadyUsed,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepoError> for DiscountError {
    fn from(err: RepoError) -> Self {
        DiscountError::Storage(err.to_string())
    }
}

impl From<DiscountError> for AppError {
    fn from(err: DiscountError) -> Self {
        let code = match &err {
            DiscountError::NotFound => ErrorCode::DiscountNotFound,
            DiscountError::Inactive => ErrorCode::DiscountInactive,
            DiscountError::NotYetActive => ErrorCode::DiscountNotYetActive,
            DiscountError::Expired => ErrorCode::DiscountExpired,
            DiscountError::AlreadyUsed => ErrorCode::DiscountAlreadyUsed,
            DiscountError::Storage(msg) => {
                return AppError::with_message(ErrorCode::StorageError, msg.clone());
            }
        };
        AppError::new(code)
    }
}

/// Check a period-bounded discount's date window
fn check_period(discount: &Discount, today: NaiveDate) -> Result<(), DiscountError> {
    if discount.duration != DurationPolicy::Period {
        return Ok(());
    }
    if let Some(start) = discount.start_date
        && today < start
    {
        return Err(DiscountError::NotYetActive);
    }
    if let Some(end) = discount.end_date
        && today > end
    {
        return Err(DiscountError::Expired);
    }
    Ok(())
}

/// Discount Engine - validates codes and records redemptions
#[derive(Clone)]
pub struct DiscountEngine {
    discounts: DiscountRepository,
    redemptions: RedemptionRepository,
}

impl DiscountEngine {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self {
            discounts: DiscountRepository::new(db.clone()),
            redemptions: RedemptionRepository::new(db),
        }
    }

    /// Validate a discount code for a client on a given day.
    ///
    /// `client_id` is optional so anonymous previews can still check a
    /// code; the one-time-use rule only applies when the client is known,
    /// and submission always passes it.
    pub async fn validate_code(
        &self,
        code: &str,
        client_id: Option<i64>,
        today: NaiveDate,
    ) -> Result<Discount, DiscountError> {
        let discount = self
            .discounts
            .find_by_code(code)
            .await?
            .ok_or(DiscountError::NotFound)?;

        match discount.effective_status(today) {
            DiscountStatus::Active => {}
            DiscountStatus::Disabled => return Err(DiscountError::Inactive),
            DiscountStatus::Expired => return Err(DiscountError::Expired),
        }

        check_period(&discount, today)?;

        if discount.duration == DurationPolicy::OneTime
            && let Some(client_id) = client_id
            && self.redemptions.exists_for(discount.id, client_id).await?
        {
            return Err(DiscountError::AlreadyUsed);
        }

        Ok(discount)
    }

    /// Record a redemption with the capped amount actually applied
    pub async fn record_redemption(
        &self,
        discount_id: i64,
        order_id: i64,
        client_id: i64,
        amount_applied: f64,
    ) -> RepoResult<DiscountRedemption> {
        self.redemptions
            .record(discount_id, order_id, client_id, amount_applied)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::Repository;
    use shared::models::{DiscountCreate, DiscountKind, DiscountUpdate};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn seed(
        engine_db: &Arc<MemoryDb>,
        code: &str,
        duration: DurationPolicy,
        window: Option<(&str, &str)>,
    ) -> Discount {
        let repo = DiscountRepository::new(engine_db.clone());
        repo.create(DiscountCreate {
            name: format!("Discount {}", code),
            code: code.to_string(),
            kind: DiscountKind::Percentage,
            value: 10.0,
            duration,
            start_date: window.map(|(s, _)| date(s)),
            end_date: window.map(|(_, e)| date(e)),
            approval: None,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_unknown_code_not_found() {
        let db = MemoryDb::new();
        let engine = DiscountEngine::new(db);
        let err = engine
            .validate_code("NOPE", None, date("2024-06-01"))
            .await
            .unwrap_err();
        assert_eq!(err, DiscountError::NotFound);
    }

    #[tokio::test]
    async fn test_code_lookup_is_case_insensitive() {
        let db = MemoryDb::new();
        seed(&db, "SUMMER", DurationPolicy::Unlimited, None).await;
        let engine = DiscountEngine::new(db);
        let found = engine
            .validate_code("summer", None, date("2024-06-01"))
            .await
            .unwrap();
        assert_eq!(found.code, "SUMMER");
    }

    #[tokio::test]
    async fn test_disabled_discount_is_inactive() {
        let db = MemoryDb::new();
        let discount = seed(&db, "OFF", DurationPolicy::Unlimited, None).await;
        let repo = DiscountRepository::new(db.clone());
        repo.update(
            discount.id,
            DiscountUpdate {
                name: None,
                code: None,
                kind: None,
                value: None,
                duration: None,
                start_date: None,
                end_date: None,
                status: Some(DiscountStatus::Disabled),
                approval: None,
            },
        )
        .await
        .unwrap();

        let engine = DiscountEngine::new(db);
        let err = engine
            .validate_code("OFF", None, date("2024-06-01"))
            .await
            .unwrap_err();
        assert_eq!(err, DiscountError::Inactive);
    }

    #[tokio::test]
    async fn test_period_window_boundaries() {
        let db = MemoryDb::new();
        seed(&db, "MARCH", DurationPolicy::Period, Some(("2024-03-01", "2024-03-31"))).await;
        let engine = DiscountEngine::new(db);

        let err = engine
            .validate_code("MARCH", None, date("2024-02-29"))
            .await
            .unwrap_err();
        assert_eq!(err, DiscountError::NotYetActive);

        // Both boundary days are inside the window
        assert!(engine.validate_code("MARCH", None, date("2024-03-01")).await.is_ok());
        assert!(engine.validate_code("MARCH", None, date("2024-03-31")).await.is_ok());

        let err = engine
            .validate_code("MARCH", None, date("2024-04-01"))
            .await
            .unwrap_err();
        assert_eq!(err, DiscountError::Expired);
    }

    #[tokio::test]
    async fn test_one_time_blocks_second_redemption_for_same_client() {
        let db = MemoryDb::new();
        let discount = seed(&db, "ONCE", DurationPolicy::OneTime, None).await;
        let engine = DiscountEngine::new(db);

        assert!(engine.validate_code("ONCE", Some(7), date("2024-06-01")).await.is_ok());

        engine.record_redemption(discount.id, 100, 7, 25.0).await.unwrap();

        let err = engine
            .validate_code("ONCE", Some(7), date("2024-06-01"))
            .await
            .unwrap_err();
        assert_eq!(err, DiscountError::AlreadyUsed);

        // A different client can still redeem
        assert!(engine.validate_code("ONCE", Some(8), date("2024-06-01")).await.is_ok());

        // An anonymous preview cannot evaluate the one-time rule
        assert!(engine.validate_code("ONCE", None, date("2024-06-01")).await.is_ok());
    }

    #[tokio::test]
    async fn test_redemption_records_capped_amount() {
        let db = MemoryDb::new();
        let discount = seed(&db, "BIG", DurationPolicy::Unlimited, None).await;
        let engine = DiscountEngine::new(db.clone());

        // The order subtotal capped the configured value down to 600
        engine.record_redemption(discount.id, 42, 7, 600.0).await.unwrap();

        let log = RedemptionRepository::new(db)
            .list_for_discount(discount.id)
            .await
            .unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].amount_applied, 600.0);
        assert_eq!(log[0].order_id, 42);
    }
}
