//! Orders Manager
//!
//! All order mutations funnel through here. Submission and return
//! processing hold a single write lock so stock checks, discount
//! re-validation, and redemption recording happen atomically with respect
//! to each other — the check-then-act race between a preview and a
//! concurrent submission is closed inside the lock, not by trusting the
//! preview result.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;

use shared::models::{
    AppliedDiscount, Discount, ItemAvailability, Order, OrderItem, OrderStatus, OrderSubmit,
    Quote, QuoteRequest, ReturnRequest, SettlementResult,
};
use shared::util::{now_millis, order_reference, snowflake_id, today};

use super::{OrderError, status};
use crate::db::repository::{ClientRepository, InventoryRepository, OrderRepository, Repository};
use crate::db::MemoryDb;
use crate::pricing::{DiscountEngine, PricingError, calculator, settlement};

pub struct OrdersManager {
    orders: OrderRepository,
    inventory: InventoryRepository,
    clients: ClientRepository,
    engine: DiscountEngine,
    late_fee_per_day: f64,
    /// Serializes stock accounting, redemption recording, and status writes
    write_lock: Mutex<()>,
}

impl OrdersManager {
    pub fn new(db: Arc<MemoryDb>, late_fee_per_day: f64) -> Arc<Self> {
        Arc::new(Self {
            orders: OrderRepository::new(db.clone()),
            inventory: InventoryRepository::new(db.clone()),
            clients: ClientRepository::new(db.clone()),
            engine: DiscountEngine::new(db),
            late_fee_per_day,
            write_lock: Mutex::new(()),
        })
    }

    /// Discount engine handle (preview validation endpoint)
    pub fn engine(&self) -> &DiscountEngine {
        &self.engine
    }

    /// Resolve the discount for a quote or submission.
    ///
    /// A catalog code and an ad-hoc discount are mutually exclusive. The
    /// returned `Discount` is present only for catalog codes, so the caller
    /// can record the redemption after the order persists.
    async fn resolve_discount(
        &self,
        code: Option<&str>,
        manual: Option<&AppliedDiscount>,
        client_id: Option<i64>,
        on: NaiveDate,
    ) -> Result<(Option<AppliedDiscount>, Option<Discount>), OrderError> {
        match (code, manual) {
            (Some(_), Some(_)) => Err(PricingError::Validation(
                "provide either a discount code or a manual discount, not both".to_string(),
            )
            .into()),
            (Some(code), None) => {
                let discount = self.engine.validate_code(code, client_id, on).await?;
                let applied = AppliedDiscount {
                    name: discount.name.clone(),
                    kind: discount.kind,
                    value: discount.value,
                };
                Ok((Some(applied), Some(discount)))
            }
            (None, Some(manual)) => {
                calculator::validate_discount(manual)?;
                Ok((Some(manual.clone()), None))
            }
            (None, None) => Ok((None, None)),
        }
    }

    /// Price a cart without persisting anything.
    ///
    /// Uses the same aggregator as submission, so the preview equals the
    /// value that would be stored.
    pub async fn quote(&self, req: QuoteRequest) -> Result<Quote, OrderError> {
        let (applied, _) = self
            .resolve_discount(
                req.discount_code.as_deref(),
                req.manual_discount.as_ref(),
                req.client_id,
                today(),
            )
            .await?;
        Ok(calculator::price_order(
            &req.lines,
            req.start_date,
            req.end_date,
            applied.as_ref(),
            0.0,
        )?)
    }

    /// Submit an order: stock check, authoritative pricing, discount
    /// re-validation and redemption, persistence — all under the write lock.
    pub async fn submit(&self, req: OrderSubmit) -> Result<Order, OrderError> {
        let _guard = self.write_lock.lock().await;

        if req.lines.is_empty() {
            return Err(OrderError::Empty);
        }
        let client = self
            .clients
            .find_by_id(req.client_id)
            .await?
            .ok_or(OrderError::ClientNotFound(req.client_id))?;

        // Aggregate requested quantities so duplicate lines of one item
        // cannot slip past the stock check individually.
        let mut requested: HashMap<i64, i32> = HashMap::new();
        for line in &req.lines {
            calculator::validate_cart_line(line)?;
            *requested.entry(line.item_id).or_insert(0) += line.quantity;
        }

        let committed = self
            .orders
            .committed_quantities(req.start_date, req.end_date)
            .await?;
        let mut items = Vec::with_capacity(req.lines.len());
        for line in &req.lines {
            let item = self
                .inventory
                .find_by_id(line.item_id)
                .await?
                .ok_or(OrderError::ItemNotFound(line.item_id))?;
            if !item.is_active {
                return Err(OrderError::ItemInactive(line.item_id));
            }
            let available = item.stock_total - committed.get(&line.item_id).copied().unwrap_or(0);
            let wanted = requested[&line.item_id];
            if wanted > available {
                return Err(OrderError::InsufficientStock {
                    item_id: line.item_id,
                    requested: wanted,
                    available: available.max(0),
                });
            }
            items.push(OrderItem {
                item_id: line.item_id,
                name: item.name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                replacement_cost: item.replacement_cost,
                returned_quantity: 0,
                lost_quantity: 0,
                damaged_quantity: 0,
            });
        }

        // Authoritative re-validation: the preview may have seen a discount
        // that has since expired or been exhausted. Failure aborts the
        // submission instead of silently dropping the discount.
        let (applied, catalog) = self
            .resolve_discount(
                req.discount_code.as_deref(),
                req.manual_discount.as_ref(),
                Some(client.id),
                today(),
            )
            .await?;

        let quote = calculator::price_order(
            &req.lines,
            req.start_date,
            req.end_date,
            applied.as_ref(),
            0.0,
        )?;

        let id = snowflake_id();
        let now = now_millis();
        let order = Order {
            id,
            reference: order_reference(id),
            client_id: client.id,
            client_name: client.full_name(),
            client_phone: client.phone.clone(),
            client_email: client.email.clone(),
            status: OrderStatus::Pending,
            start_date: req.start_date,
            end_date: req.end_date,
            closed_date: None,
            total: quote.total,
            paid_amount: 0.0,
            penalty_amount: 0.0,
            discount: applied,
            items,
            created_at: now,
            updated_at: now,
        };
        self.orders.insert(&order).await?;

        if let Some(discount) = catalog {
            self.engine
                .record_redemption(discount.id, order.id, client.id, quote.discount_amount)
                .await?;
        }
        self.clients.record_order(client.id, quote.total, now).await?;

        tracing::info!(
            order_id = order.id,
            reference = %order.reference,
            client_id = client.id,
            total = order.total,
            "order submitted"
        );
        crate::audit_log!("client", "submit", &format!("order:{}", order.id));
        Ok(order)
    }

    async fn load(&self, id: i64) -> Result<Order, OrderError> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound(id))
    }

    async fn transition(&self, id: i64, to: OrderStatus, action: &str) -> Result<Order, OrderError> {
        let _guard = self.write_lock.lock().await;
        let mut order = self.load(id).await?;
        if !status::can_transition(order.status, to) {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to,
            });
        }
        order.status = to;
        order.updated_at = now_millis();
        self.orders.update(&order).await?;

        tracing::info!(order_id = id, status = %to, "order {}", action);
        crate::audit_log!("admin", action, &format!("order:{}", id));
        Ok(order)
    }

    pub async fn approve(&self, id: i64) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Approved, "approve").await
    }

    pub async fn reject(&self, id: i64) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Rejected, "reject").await
    }

    /// Withdraw an approval before handout
    pub async fn pull_back(&self, id: i64) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Pending, "pull_back").await
    }

    pub async fn activate(&self, id: i64) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Active, "activate").await
    }

    /// Client-side cancellation, allowed before handout
    pub async fn cancel(&self, id: i64) -> Result<Order, OrderError> {
        self.transition(id, OrderStatus::Canceled, "cancel").await
    }

    /// Close an active order directly, without the return flow or penalty
    pub async fn complete(&self, id: i64) -> Result<Order, OrderError> {
        let _guard = self.write_lock.lock().await;
        let mut order = self.load(id).await?;
        if order.status != OrderStatus::Active {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Completed,
            });
        }
        order.status = OrderStatus::Completed;
        order.closed_date = Some(today());
        order.updated_at = now_millis();
        self.orders.update(&order).await?;
        crate::audit_log!("admin", "complete", &format!("order:{}", id));
        Ok(order)
    }

    /// Process a return: audit the equipment, compute the settlement, and
    /// close the order as completed or park it in settlement.
    pub async fn process_return(
        &self,
        id: i64,
        req: ReturnRequest,
    ) -> Result<(Order, SettlementResult), OrderError> {
        let _guard = self.write_lock.lock().await;
        let mut order = self.load(id).await?;

        // An approved order whose start date has arrived is effectively
        // active even if the sweep has not persisted the promotion yet.
        let effective = status::effective_status(order.status, order.start_date, today());
        if effective != OrderStatus::Active {
            return Err(OrderError::NotReturnable(order.status));
        }

        let result = settlement::compute_settlement(
            &order,
            req.actual_return_date,
            &req.lines,
            self.late_fee_per_day,
            req.payment_amount,
        )?;

        for item in &mut order.items {
            if let Some(line) = req.lines.iter().find(|line| line.item_id == item.item_id) {
                item.returned_quantity = line.returned_quantity;
                item.lost_quantity = line.lost_quantity;
                item.damaged_quantity = line.damaged_quantity;
            }
        }
        order.penalty_amount = calculator::to_f64(
            calculator::to_decimal(result.late_fee)
                + calculator::to_decimal(result.loss_fee)
                + calculator::to_decimal(result.damage_fee),
        );
        order.total = result.revised_total;
        order.paid_amount += req.payment_amount;
        order.status = result.status;
        order.closed_date = Some(req.actual_return_date);
        order.updated_at = now_millis();
        self.orders.update(&order).await?;

        tracing::info!(
            order_id = id,
            days_late = result.days_late,
            revised_total = result.revised_total,
            balance = result.balance,
            status = %result.status,
            "return processed"
        );
        crate::audit_log!("admin", "return", &format!("order:{}", id));
        Ok((order, result))
    }

    /// Record a further payment against an order in settlement; completes
    /// the order once the balance is cleared.
    pub async fn settle_payment(&self, id: i64, amount: f64) -> Result<Order, OrderError> {
        let _guard = self.write_lock.lock().await;
        let mut order = self.load(id).await?;
        if order.status != OrderStatus::Settlement {
            return Err(OrderError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Completed,
            });
        }
        settlement::validate_payment(amount)?;

        order.paid_amount += amount;
        if order.balance() <= 0.0 {
            order.status = OrderStatus::Completed;
        }
        order.updated_at = now_millis();
        self.orders.update(&order).await?;

        crate::audit_log!("admin", "settle_payment", &format!("order:{}", id));
        Ok(order)
    }

    /// Admin escape hatch: force any status outside the transition graph.
    /// Every use is audit-logged with the operator's reason.
    pub async fn override_status(
        &self,
        id: i64,
        to: OrderStatus,
        reason: Option<&str>,
    ) -> Result<Order, OrderError> {
        let _guard = self.write_lock.lock().await;
        let mut order = self.load(id).await?;
        let from = order.status;
        order.status = to;
        order.updated_at = now_millis();
        self.orders.update(&order).await?;

        tracing::warn!(order_id = id, from = %from, to = %to, reason = ?reason, "status override");
        crate::audit_log!(
            "admin",
            "override_status",
            &format!("order:{}", id),
            &format!("{} -> {} ({})", from, to, reason.unwrap_or("no reason given"))
        );
        Ok(order)
    }

    /// Persist the Approved → Active promotion for orders whose start date
    /// has arrived. Run periodically by the background sweep.
    pub async fn advance_approved(&self, on: NaiveDate) -> Result<usize, OrderError> {
        let _guard = self.write_lock.lock().await;
        let due = self.orders.due_for_activation(on).await?;
        let count = due.len();
        for mut order in due {
            order.status = OrderStatus::Active;
            order.updated_at = now_millis();
            self.orders.update(&order).await?;
            tracing::info!(order_id = order.id, "order auto-activated");
        }
        Ok(count)
    }

    /// Availability snapshot for a date range
    pub async fn availability(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<ItemAvailability>, OrderError> {
        if end < start {
            return Err(PricingError::InvalidDateRange { start, end }.into());
        }
        let committed = self.orders.committed_quantities(start, end).await?;
        Ok(self
            .inventory
            .find_all()
            .await?
            .iter()
            .filter(|item| item.is_active)
            .map(|item| {
                let held = committed.get(&item.id).copied().unwrap_or(0);
                ItemAvailability::from_item(item, (item.stock_total - held).max(0))
            })
            .collect())
    }

    pub async fn get(&self, id: i64) -> Result<Order, OrderError> {
        self.load(id).await
    }

    pub async fn list(&self) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.find_all().await?)
    }

    pub async fn search(
        &self,
        term: &str,
        status: Option<OrderStatus>,
        limit: usize,
    ) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.search(term, status, limit).await?)
    }
}
