//! Repository Module
//!
//! CRUD access to the store, one repository per resource. Repositories are
//! the persistence boundary: the manager and API layers never touch
//! [`super::MemoryDb`] tables directly.

pub mod client;
pub mod discount;
pub mod inventory;
pub mod order;
pub mod redemption;

pub use client::ClientRepository;
pub use discount::DiscountRepository;
pub use inventory::InventoryRepository;
pub use order::OrderRepository;
pub use redemption::RedemptionRepository;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RepoError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match &err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg.clone()),
            RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::AlreadyExists, msg.clone())
            }
            RepoError::Conflict(msg) => {
                AppError::with_message(ErrorCode::InvalidRequest, msg.clone())
            }
            RepoError::Validation(msg) => {
                AppError::with_message(ErrorCode::ValidationFailed, msg.clone())
            }
            RepoError::Storage(msg) => AppError::with_message(ErrorCode::StorageError, msg.clone()),
        }
    }
}

/// Common repository trait for basic CRUD
#[allow(async_fn_in_trait)]
pub trait Repository<T, CreateDto, UpdateDto> {
    async fn find_all(&self) -> RepoResult<Vec<T>>;
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<T>>;
    async fn create(&self, data: CreateDto) -> RepoResult<T>;
    async fn update(&self, id: i64, data: UpdateDto) -> RepoResult<T>;
    async fn delete(&self, id: i64) -> RepoResult<bool>;
}
