//! Discount Repository

use std::sync::Arc;

use shared::models::{Discount, DiscountCreate, DiscountKind, DiscountStatus, DiscountUpdate};
use shared::util::{now_millis, snowflake_id};

use super::{RepoError, RepoResult, Repository};
use crate::db::MemoryDb;

#[derive(Clone)]
pub struct DiscountRepository {
    db: Arc<MemoryDb>,
}

impl DiscountRepository {
    pub fn new(db: Arc<MemoryDb>) -> Self {
        Self { db }
    }

    /// Find a discount by its redemption code (case-insensitive)
    pub async fn find_by_code(&self, code: &str) -> RepoResult<Option<Discount>> {
        Ok(self
            .db
            .discounts
            .iter()
            .find(|entry| entry.code.eq_ignore_ascii_case(code))
            .map(|entry| entry.clone()))
    }

    /// The 0–100 range for percentages is enforced here, at admin time —
    /// the pricing function deliberately does not re-check it.
    fn validate_value(kind: DiscountKind, value: f64) -> RepoResult<()> {
        if !value.is_finite() || value < 0.0 {
            return Err(RepoError::Validation(format!(
                "discount value must be non-negative, got {}",
                value
            )));
        }
        if kind == DiscountKind::Percentage && value > 100.0 {
            return Err(RepoError::Validation(format!(
                "percentage discount must be between 0 and 100, got {}",
                value
            )));
        }
        Ok(())
    }
}

impl Repository<Discount, DiscountCreate, DiscountUpdate> for DiscountRepository {
    /// All discounts, most recently created first
    async fn find_all(&self) -> RepoResult<Vec<Discount>> {
        let mut discounts: Vec<Discount> =
            self.db.discounts.iter().map(|entry| entry.clone()).collect();
        discounts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(discounts)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Discount>> {
        Ok(self.db.discounts.get(&id).map(|entry| entry.clone()))
    }

    async fn create(&self, data: DiscountCreate) -> RepoResult<Discount> {
        Self::validate_value(data.kind, data.value)?;
        let code = data.code.trim().to_uppercase();
        if code.is_empty() {
            return Err(RepoError::Validation("discount code is required".to_string()));
        }
        if self.find_by_code(&code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "discount code '{}' already exists",
                code
            )));
        }
        if let (Some(start), Some(end)) = (data.start_date, data.end_date)
            && end < start
        {
            return Err(RepoError::Validation(
                "discount end date precedes start date".to_string(),
            ));
        }

        let now = now_millis();
        let discount = Discount {
            id: snowflake_id(),
            name: data.name,
            code,
            kind: data.kind,
            value: data.value,
            duration: data.duration,
            start_date: data.start_date,
            end_date: data.end_date,
            status: DiscountStatus::Active,
            approval: data.approval.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.db.discounts.insert(discount.id, discount.clone());
        Ok(discount)
    }

    async fn update(&self, id: i64, data: DiscountUpdate) -> RepoResult<Discount> {
        let normalized_code = match &data.code {
            Some(code) => {
                let code = code.trim().to_uppercase();
                if let Some(existing) = self.find_by_code(&code).await?
                    && existing.id != id
                {
                    return Err(RepoError::Duplicate(format!(
                        "discount code '{}' already exists",
                        code
                    )));
                }
                Some(code)
            }
            None => None,
        };

        let mut entry = self
            .db
            .discounts
            .get_mut(&id)
            .ok_or_else(|| RepoError::NotFound(format!("discount {} not found", id)))?;

        let mut discount = entry.clone();
        if let Some(name) = data.name {
            discount.name = name;
        }
        if let Some(code) = normalized_code {
            discount.code = code;
        }
        if let Some(kind) = data.kind {
            discount.kind = kind;
        }
        if let Some(value) = data.value {
            discount.value = value;
        }
        if let Some(duration) = data.duration {
            discount.duration = duration;
        }
        if let Some(start) = data.start_date {
            discount.start_date = Some(start);
        }
        if let Some(end) = data.end_date {
            discount.end_date = Some(end);
        }
        if let Some(status) = data.status {
            discount.status = status;
        }
        if let Some(approval) = data.approval {
            discount.approval = approval;
        }
        Self::validate_value(discount.kind, discount.value)?;
        discount.updated_at = now_millis();
        *entry.value_mut() = discount.clone();
        Ok(discount)
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.db.discounts.remove(&id).is_some())
    }
}
