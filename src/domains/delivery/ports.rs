use super::{DeliveryPartner, Order, OrderStatus};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub area: Option<String>,
    pub created_on: Option<NaiveDate>,
}

/// Port for the store that owns Order and Partner mutable state.
/// Implementations (adapters) provide in-memory or file-backed storage.
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn insert_order(&self, order: Order) -> Result<(), String>;
    async fn order(&self, order_id: &str) -> Result<Option<Order>, String>;
    async fn orders(&self, filter: OrderFilter) -> Result<Vec<Order>, String>;
    async fn pending_orders(&self) -> Result<Vec<Order>, String>;

    /// Apply a status transition under the store lock. Fails when the
    /// transition is not a valid progression for the current status.
    async fn update_order_status(
        &self,
        order_id: &str,
        next: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<Order, String>;

    async fn remove_order(&self, order_id: &str) -> Result<(), String>;

    async fn insert_partner(&self, partner: DeliveryPartner) -> Result<(), String>;
    async fn partner(&self, partner_id: &str) -> Result<Option<DeliveryPartner>, String>;
    async fn partners(&self) -> Result<Vec<DeliveryPartner>, String>;
    async fn active_partners(&self) -> Result<Vec<DeliveryPartner>, String>;

    /// Replace a partner record wholesale (shift/areas/status edits).
    async fn update_partner(&self, partner: DeliveryPartner) -> Result<(), String>;

    /// Atomically mark the order assigned to the partner and increment the
    /// partner's load. Fails without mutating anything when the order is no
    /// longer pending or the partner has no spare capacity.
    async fn commit_assignment(&self, order_id: &str, partner_id: &str) -> Result<(), String>;
}

pub type DynEntityStore = Arc<dyn EntityStore>;
