//! Storage records and model adapters
//!
//! The stored row shape is kept separate from the domain model, and these
//! adapters are the only place the two meet. The applied discount is
//! flattened into three nullable columns on the order row, the way the
//! original schema denormalized it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared::models::{AppliedDiscount, DiscountKind, Order, OrderItem, OrderStatus};

/// Stored order row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: i64,
    pub reference: String,
    pub client_id: i64,
    pub client_name: String,
    pub client_phone: Option<String>,
    pub client_email: Option<String>,
    pub status: OrderStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub closed_date: Option<NaiveDate>,
    pub total: f64,
    pub paid_amount: f64,
    pub penalty_amount: f64,
    /// Denormalized discount columns (all set or all null)
    pub discount_name: Option<String>,
    pub discount_kind: Option<DiscountKind>,
    pub discount_value: Option<f64>,
    pub items: Vec<OrderItemRecord>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Stored order line row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRecord {
    pub item_id: i64,
    pub name: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub replacement_cost: f64,
    pub returned_quantity: i32,
    pub lost_quantity: i32,
    pub damaged_quantity: i32,
}

impl OrderRecord {
    pub fn from_model(order: &Order) -> Self {
        Self {
            id: order.id,
            reference: order.reference.clone(),
            client_id: order.client_id,
            client_name: order.client_name.clone(),
            client_phone: order.client_phone.clone(),
            client_email: order.client_email.clone(),
            status: order.status,
            start_date: order.start_date,
            end_date: order.end_date,
            closed_date: order.closed_date,
            total: order.total,
            paid_amount: order.paid_amount,
            penalty_amount: order.penalty_amount,
            discount_name: order.discount.as_ref().map(|d| d.name.clone()),
            discount_kind: order.discount.as_ref().map(|d| d.kind),
            discount_value: order.discount.as_ref().map(|d| d.value),
            items: order.items.iter().map(OrderItemRecord::from_model).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }

    pub fn into_model(self) -> Order {
        let discount = match (self.discount_name, self.discount_kind, self.discount_value) {
            (Some(name), Some(kind), Some(value)) => Some(AppliedDiscount { name, kind, value }),
            _ => None,
        };

        Order {
            id: self.id,
            reference: self.reference,
            client_id: self.client_id,
            client_name: self.client_name,
            client_phone: self.client_phone,
            client_email: self.client_email,
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
            closed_date: self.closed_date,
            total: self.total,
            paid_amount: self.paid_amount,
            penalty_amount: self.penalty_amount,
            discount,
            items: self.items.into_iter().map(OrderItemRecord::into_model).collect(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrderItemRecord {
    fn from_model(item: &OrderItem) -> Self {
        Self {
            item_id: item.item_id,
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            replacement_cost: item.replacement_cost,
            returned_quantity: item.returned_quantity,
            lost_quantity: item.lost_quantity,
            damaged_quantity: item.damaged_quantity,
        }
    }

    fn into_model(self) -> OrderItem {
        OrderItem {
            item_id: self.item_id,
            name: self.name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            replacement_cost: self.replacement_cost,
            returned_quantity: self.returned_quantity,
            lost_quantity: self.lost_quantity,
            damaged_quantity: self.damaged_quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_columns_roundtrip() {
        let order = Order {
            id: 7,
            reference: "DPT-00000007".to_string(),
            client_id: 1,
            client_name: "Grace Hopper".to_string(),
            client_phone: Some("555-0100".to_string()),
            client_email: None,
            status: OrderStatus::Pending,
            start_date: "2024-05-01".parse().unwrap(),
            end_date: "2024-05-03".parse().unwrap(),
            closed_date: None,
            total: 540.0,
            paid_amount: 0.0,
            penalty_amount: 0.0,
            discount: Some(AppliedDiscount {
                name: "Spring".to_string(),
                kind: DiscountKind::Percentage,
                value: 10.0,
            }),
            items: vec![],
            created_at: 1,
            updated_at: 1,
        };

        let record = OrderRecord::from_model(&order);
        assert_eq!(record.discount_name.as_deref(), Some("Spring"));
        assert_eq!(record.discount_value, Some(10.0));

        let back = record.into_model();
        assert_eq!(back.discount, order.discount);
    }

    #[test]
    fn test_missing_discount_columns_map_to_none() {
        let record = OrderRecord {
            id: 1,
            reference: "DPT-00000001".to_string(),
            client_id: 1,
            client_name: "X".to_string(),
            client_phone: None,
            client_email: None,
            status: OrderStatus::Pending,
            start_date: "2024-05-01".parse().unwrap(),
            end_date: "2024-05-01".parse().unwrap(),
            closed_date: None,
            total: 0.0,
            paid_amount: 0.0,
            penalty_amount: 0.0,
            discount_name: Some("orphan".to_string()),
            discount_kind: None,
            discount_value: None,
            items: vec![],
            created_at: 0,
            updated_at: 0,
        };

        // A partially populated discount row is treated as no discount
        assert!(record.into_model().discount.is_none());
    }
}
