//! End-to-end order lifecycle tests against the orders manager
//!
//! Covers the full path the desk walks every day: quote, submit with a
//! discount code, approve, activate, return (on time and late), settle the
//! remaining balance.

use chrono::NaiveDate;

use depot_server::OrdersManager;
use depot_server::db::MemoryDb;
use depot_server::db::repository::{
    ClientRepository, DiscountRepository, InventoryRepository, RedemptionRepository, Repository,
};
use shared::models::{
    CartLine, ClientCreate, DiscountCreate, DiscountKind, DurationPolicy, InventoryItemCreate,
    OrderStatus, OrderSubmit, QuoteRequest, ReturnAuditLine, ReturnRequest,
};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

struct Fixture {
    db: std::sync::Arc<MemoryDb>,
    manager: std::sync::Arc<OrdersManager>,
    client_id: i64,
    generator_id: i64,
    ladder_id: i64,
}

async fn fixture() -> Fixture {
    let db = MemoryDb::new();

    let inventory = InventoryRepository::new(db.clone());
    let generator_id = inventory
        .create(InventoryItemCreate {
            name: "Diesel Generator".to_string(),
            category: Some("Power".to_string()),
            daily_rate: 100.0,
            replacement_cost: 2500.0,
            stock_total: 4,
            sort_order: Some(1),
        })
        .await
        .unwrap()
        .id;
    let ladder_id = inventory
        .create(InventoryItemCreate {
            name: "Extension Ladder".to_string(),
            category: Some("Access".to_string()),
            daily_rate: 15.0,
            replacement_cost: 300.0,
            stock_total: 10,
            sort_order: Some(2),
        })
        .await
        .unwrap()
        .id;

    let client_id = ClientRepository::new(db.clone())
        .create(ClientCreate {
            first_name: "Marta".to_string(),
            last_name: "Vidal".to_string(),
            phone: Some("555-0199".to_string()),
            email: Some("marta@example.com".to_string()),
            notes: None,
        })
        .await
        .unwrap()
        .id;

    DiscountRepository::new(db.clone())
        .create(DiscountCreate {
            name: "Launch promo".to_string(),
            code: "LAUNCH10".to_string(),
            kind: DiscountKind::Percentage,
            value: 10.0,
            duration: DurationPolicy::Unlimited,
            start_date: None,
            end_date: None,
            approval: None,
        })
        .await
        .unwrap();

    let manager = OrdersManager::new(db.clone(), 50.0);
    Fixture {
        db,
        manager,
        client_id,
        generator_id,
        ladder_id,
    }
}

fn submission(f: &Fixture) -> OrderSubmit {
    OrderSubmit {
        client_id: f.client_id,
        start_date: date("2024-07-01"),
        end_date: date("2024-07-03"),
        lines: vec![
            CartLine {
                item_id: f.generator_id,
                quantity: 2,
                unit_price: 100.0,
            },
            CartLine {
                item_id: f.ladder_id,
                quantity: 1,
                unit_price: 15.0,
            },
        ],
        discount_code: Some("LAUNCH10".to_string()),
        manual_discount: None,
    }
}

#[tokio::test]
async fn quote_and_submission_agree_on_the_total() {
    let f = fixture().await;

    let quote = f
        .manager
        .quote(QuoteRequest {
            start_date: date("2024-07-01"),
            end_date: date("2024-07-03"),
            lines: submission(&f).lines,
            discount_code: Some("LAUNCH10".to_string()),
            manual_discount: None,
            client_id: Some(f.client_id),
        })
        .await
        .unwrap();

    // (100*2 + 15) * 3 days = 645, minus 10% = 580.50
    assert_eq!(quote.days, 3);
    assert_eq!(quote.subtotal, 645.0);
    assert_eq!(quote.discount_amount, 64.5);
    assert_eq!(quote.total, 580.5);

    let order = f.manager.submit(submission(&f)).await.unwrap();
    assert_eq!(order.total, quote.total);
    assert_eq!(order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn redemption_log_records_the_capped_amount() {
    let f = fixture().await;
    let order = f.manager.submit(submission(&f)).await.unwrap();

    let discount = DiscountRepository::new(f.db.clone())
        .find_by_code("LAUNCH10")
        .await
        .unwrap()
        .unwrap();
    let log = RedemptionRepository::new(f.db.clone())
        .list_for_discount(discount.id)
        .await
        .unwrap();

    assert_eq!(log.len(), 1);
    assert_eq!(log[0].order_id, order.id);
    assert_eq!(log[0].client_id, f.client_id);
    assert_eq!(log[0].amount_applied, 64.5);
}

#[tokio::test]
async fn on_time_full_return_completes_the_order() {
    let f = fixture().await;
    let order = f.manager.submit(submission(&f)).await.unwrap();
    f.manager.approve(order.id).await.unwrap();
    f.manager.activate(order.id).await.unwrap();

    let (closed, settlement) = f
        .manager
        .process_return(
            order.id,
            ReturnRequest {
                actual_return_date: date("2024-07-03"),
                payment_amount: 580.5,
                lines: vec![
                    ReturnAuditLine {
                        item_id: f.generator_id,
                        returned_quantity: 2,
                        lost_quantity: 0,
                        damaged_quantity: 0,
                    },
                    ReturnAuditLine {
                        item_id: f.ladder_id,
                        returned_quantity: 1,
                        lost_quantity: 0,
                        damaged_quantity: 0,
                    },
                ],
            },
        )
        .await
        .unwrap();

    assert_eq!(settlement.days_late, 0);
    assert_eq!(settlement.late_fee, 0.0);
    assert_eq!(settlement.balance, 0.0);
    assert_eq!(settlement.status, OrderStatus::Completed);
    assert_eq!(closed.status, OrderStatus::Completed);
    assert_eq!(closed.closed_date, Some(date("2024-07-03")));
    assert_eq!(closed.penalty_amount, 0.0);
}

#[tokio::test]
async fn late_lossy_return_parks_in_settlement_until_paid() {
    let f = fixture().await;
    let order = f.manager.submit(submission(&f)).await.unwrap();
    f.manager.approve(order.id).await.unwrap();
    f.manager.activate(order.id).await.unwrap();

    // Two days late, one generator lost, ladder damaged
    let (parked, settlement) = f
        .manager
        .process_return(
            order.id,
            ReturnRequest {
                actual_return_date: date("2024-07-05"),
                payment_amount: 500.0,
                lines: vec![
                    ReturnAuditLine {
                        item_id: f.generator_id,
                        returned_quantity: 1,
                        lost_quantity: 1,
                        damaged_quantity: 0,
                    },
                    ReturnAuditLine {
                        item_id: f.ladder_id,
                        returned_quantity: 0,
                        lost_quantity: 0,
                        damaged_quantity: 1,
                    },
                ],
            },
        )
        .await
        .unwrap();

    assert_eq!(settlement.days_late, 2);
    assert_eq!(settlement.late_fee, 100.0);
    assert_eq!(settlement.loss_fee, 2500.0);
    assert_eq!(settlement.damage_fee, 300.0);

    // Rebilled over 5 actual days: (100*2 + 15) * 5 = 1075, minus 10% =
    // 967.50, plus 2900 penalties = 3867.50
    assert_eq!(settlement.revised_total, 3867.5);
    assert_eq!(settlement.balance, 3867.5 - 500.0);
    assert_eq!(parked.status, OrderStatus::Settlement);
    assert_eq!(parked.penalty_amount, 2900.0);

    // Partial follow-up payment keeps it parked
    let still_parked = f.manager.settle_payment(order.id, 1000.0).await.unwrap();
    assert_eq!(still_parked.status, OrderStatus::Settlement);

    // Clearing the balance completes it
    let done = f.manager.settle_payment(order.id, 2367.5).await.unwrap();
    assert_eq!(done.status, OrderStatus::Completed);
    assert_eq!(done.balance(), 0.0);
}

#[tokio::test]
async fn settlement_rejects_non_positive_payments() {
    let f = fixture().await;
    let order = f.manager.submit(submission(&f)).await.unwrap();
    f.manager.approve(order.id).await.unwrap();
    f.manager.activate(order.id).await.unwrap();

    let full_audit = vec![
        ReturnAuditLine {
            item_id: f.generator_id,
            returned_quantity: 2,
            lost_quantity: 0,
            damaged_quantity: 0,
        },
        ReturnAuditLine {
            item_id: f.ladder_id,
            returned_quantity: 1,
            lost_quantity: 0,
            damaged_quantity: 0,
        },
    ];

    let zero = f
        .manager
        .process_return(
            order.id,
            ReturnRequest {
                actual_return_date: date("2024-07-03"),
                payment_amount: 0.0,
                lines: full_audit.clone(),
            },
        )
        .await;
    assert!(zero.is_err());

    let negative = f
        .manager
        .process_return(
            order.id,
            ReturnRequest {
                actual_return_date: date("2024-07-03"),
                payment_amount: -10.0,
                lines: full_audit,
            },
        )
        .await;
    assert!(negative.is_err());

    // The failed attempts left the order untouched
    let unchanged = f.manager.get(order.id).await.unwrap();
    assert_eq!(unchanged.status, OrderStatus::Active);
    assert_eq!(unchanged.paid_amount, 0.0);
}

#[tokio::test]
async fn unreconciled_return_is_rejected() {
    let f = fixture().await;
    let order = f.manager.submit(submission(&f)).await.unwrap();
    f.manager.approve(order.id).await.unwrap();
    f.manager.activate(order.id).await.unwrap();

    // One generator unaccounted for
    let result = f
        .manager
        .process_return(
            order.id,
            ReturnRequest {
                actual_return_date: date("2024-07-03"),
                payment_amount: 100.0,
                lines: vec![
                    ReturnAuditLine {
                        item_id: f.generator_id,
                        returned_quantity: 1,
                        lost_quantity: 0,
                        damaged_quantity: 0,
                    },
                    ReturnAuditLine {
                        item_id: f.ladder_id,
                        returned_quantity: 1,
                        lost_quantity: 0,
                        damaged_quantity: 0,
                    },
                ],
            },
        )
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn client_aggregates_update_on_submission() {
    let f = fixture().await;
    f.manager.submit(submission(&f)).await.unwrap();

    let client = ClientRepository::new(f.db.clone())
        .find_by_id(f.client_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(client.total_orders, 1);
    assert_eq!(client.total_spent, 580.5);
    assert!(client.last_order_at.is_some());
}
