//! Storage layer
//!
//! The original system delegated persistence to a hosted database service.
//! Here the boundary is the repository layer: an in-process store backs it
//! so the server runs self-contained, and a real backend can replace
//! [`MemoryDb`] without touching pricing or orchestration code.

pub mod memory;
pub mod records;
pub mod repository;

pub use memory::MemoryDb;
pub use repository::{
    ClientRepository, DiscountRepository, InventoryRepository, OrderRepository, RedemptionRepository,
    RepoError, RepoResult,
};
