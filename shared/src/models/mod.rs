//! Domain models shared across the platform

pub mod client;
pub mod discount;
pub mod inventory;
pub mod order;

pub use client::{Client, ClientCreate, ClientUpdate};
pub use discount::{
    ApprovalMode, Discount, DiscountCreate, DiscountKind, DiscountRedemption, DiscountStatus,
    DiscountUpdate, DurationPolicy,
};
pub use inventory::{InventoryItem, InventoryItemCreate, InventoryItemUpdate, ItemAvailability};
pub use order::{
    AppliedDiscount, CartLine, Order, OrderItem, OrderStatus, OrderSubmit, Quote, QuoteRequest,
    ReturnAuditLine, ReturnRequest, SettlePaymentRequest, SettlementResult, StatusOverrideRequest,
};
