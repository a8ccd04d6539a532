use crate::common::{ApplicationError, ApplicationResult, DomainError};
use crate::domains::delivery::{
    DynEntityStore, EntityStore, Order, OrderFilter, OrderItem, OrderStatus,
};
use crate::domains::logger::{DomainLogger, DynLogger};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_phone: String,
    pub area: String,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub scheduled_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub total: u32,
    pub pending: u32,
    pub assigned: u32,
    pub picked: u32,
    pub delivered: u32,
    pub total_revenue: f64,
}

/// One day of the order-volume trend series, gap days included with zeros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrend {
    pub date: NaiveDate,
    pub orders: u32,
    pub revenue: f64,
}

/// Order intake and lifecycle operations outside the assignment run.
pub struct OrderService {
    store: DynEntityStore,
    logger: DynLogger,
}

impl OrderService {
    pub fn new(store: DynEntityStore, logger: DynLogger) -> Self {
        Self { store, logger }
    }

    pub async fn create_order(&self, new: NewOrder) -> ApplicationResult<Order> {
        if new.area.trim().is_empty() {
            return Err(ApplicationError::Domain(DomainError::InvalidCommand {
                reason: "Order needs a delivery area".to_string(),
            }));
        }

        let now = Utc::now();
        let order = Order {
            id: mint_order_id(),
            customer_name: new.customer_name,
            customer_phone: new.customer_phone,
            area: new.area,
            items: new.items,
            status: OrderStatus::Pending,
            total_amount: new.total_amount,
            scheduled_time: new.scheduled_time,
            assigned_to: None,
            created_at: now,
            last_updated: now,
        };

        self.store
            .insert_order(order.clone())
            .await
            .map_err(ApplicationError::Store)?;
        self.logger
            .info(&format!("Order {} created for area {}", order.id, order.area));
        Ok(order)
    }

    pub async fn order(&self, order_id: &str) -> ApplicationResult<Order> {
        self.store
            .order(order_id)
            .await
            .map_err(ApplicationError::Store)?
            .ok_or_else(|| {
                ApplicationError::Domain(DomainError::OrderNotFound {
                    id: order_id.to_string(),
                })
            })
    }

    pub async fn orders(&self, filter: OrderFilter) -> ApplicationResult<Vec<Order>> {
        self.store
            .orders(filter)
            .await
            .map_err(ApplicationError::Store)
    }

    /// Progress an order along pending -> assigned -> picked -> delivered.
    /// The pending -> assigned step belongs to the dispatch engine and is
    /// rejected here.
    pub async fn update_status(
        &self,
        order_id: &str,
        next: OrderStatus,
    ) -> ApplicationResult<Order> {
        if next == OrderStatus::Assigned {
            return Err(ApplicationError::Domain(DomainError::InvalidCommand {
                reason: "Orders are assigned by the dispatch engine".to_string(),
            }));
        }
        self.store
            .update_order_status(order_id, next, Utc::now())
            .await
            .map_err(ApplicationError::Store)
    }

    /// Only pending orders may be deleted.
    pub async fn delete_order(&self, order_id: &str) -> ApplicationResult<()> {
        let order = self.order(order_id).await?;
        if !order.is_pending() {
            return Err(ApplicationError::Domain(DomainError::InvalidCommand {
                reason: format!(
                    "Cannot delete order {}: it is already assigned or processed",
                    order_id
                ),
            }));
        }
        self.store
            .remove_order(order_id)
            .await
            .map_err(ApplicationError::Store)
    }

    /// Delete the pending subset of the given ids, returning how many were
    /// removed. An empty deletable subset is an error, matching the bulk
    /// toolbar's behavior.
    pub async fn bulk_delete(&self, order_ids: &[String]) -> ApplicationResult<usize> {
        let mut deleted = 0usize;
        for order_id in order_ids {
            let existing = self
                .store
                .order(order_id)
                .await
                .map_err(ApplicationError::Store)?;
            if let Some(order) = existing {
                if order.is_pending() {
                    self.store
                        .remove_order(order_id)
                        .await
                        .map_err(ApplicationError::Store)?;
                    deleted += 1;
                }
            }
        }
        if deleted == 0 {
            return Err(ApplicationError::Domain(DomainError::InvalidCommand {
                reason: "No deletable orders found (only pending orders can be deleted)"
                    .to_string(),
            }));
        }
        self.logger.info(&format!("Bulk-deleted {} orders", deleted));
        Ok(deleted)
    }

    pub async fn summary(&self) -> ApplicationResult<OrderSummary> {
        let orders = self
            .store
            .orders(OrderFilter::default())
            .await
            .map_err(ApplicationError::Store)?;

        let mut summary = OrderSummary {
            total: orders.len() as u32,
            pending: 0,
            assigned: 0,
            picked: 0,
            delivered: 0,
            total_revenue: 0.0,
        };
        for order in &orders {
            summary.total_revenue += order.total_amount;
            match order.status {
                OrderStatus::Pending => summary.pending += 1,
                OrderStatus::Assigned => summary.assigned += 1,
                OrderStatus::Picked => summary.picked += 1,
                OrderStatus::Delivered => summary.delivered += 1,
            }
        }
        Ok(summary)
    }

    /// Day-by-day order count and revenue between two dates inclusive,
    /// keyed on the scheduled time; days without orders appear with zeros.
    pub async fn trends(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApplicationResult<Vec<DailyTrend>> {
        if start > end {
            return Err(ApplicationError::Domain(DomainError::InvalidCommand {
                reason: "Trend range start is after its end".to_string(),
            }));
        }

        let orders = self
            .store
            .orders(OrderFilter::default())
            .await
            .map_err(ApplicationError::Store)?;

        let mut series = Vec::new();
        let mut current = start;
        loop {
            let mut day = DailyTrend {
                date: current,
                orders: 0,
                revenue: 0.0,
            };
            for order in &orders {
                if order.scheduled_time.map(|t| t.date_naive()) == Some(current) {
                    day.orders += 1;
                    day.revenue += order.total_amount;
                }
            }
            series.push(day);

            if current == end {
                break;
            }
            current = match current.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Ok(series)
    }
}

fn mint_order_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD-{}", &suffix[..8].to_uppercase())
}
