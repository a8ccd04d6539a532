use crate::domains::delivery::{DeliveryPartner, EntityStore, Order, OrderFilter, OrderStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory entity store for testing and development.
#[derive(Debug, Default)]
pub struct InMemoryEntityStore {
    orders: RwLock<HashMap<String, Order>>,
    partners: RwLock<HashMap<String, DeliveryPartner>>,
}

impl InMemoryEntityStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            partners: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the whole store contents (seeding, snapshot restore).
    pub async fn load(&self, orders: Vec<Order>, partners: Vec<DeliveryPartner>) {
        *self.orders.write().await = orders.into_iter().map(|o| (o.id.clone(), o)).collect();
        *self.partners.write().await = partners.into_iter().map(|p| (p.id.clone(), p)).collect();
    }
}

#[async_trait]
impl EntityStore for InMemoryEntityStore {
    async fn insert_order(&self, order: Order) -> Result<(), String> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(format!("Order {} already exists", order.id));
        }
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    async fn order(&self, order_id: &str) -> Result<Option<Order>, String> {
        Ok(self.orders.read().await.get(order_id).cloned())
    }

    async fn orders(&self, filter: OrderFilter) -> Result<Vec<Order>, String> {
        let orders = self.orders.read().await;
        let mut matched: Vec<Order> = orders
            .values()
            .filter(|o| filter.status.map_or(true, |s| o.status == s))
            .filter(|o| filter.area.as_deref().map_or(true, |a| o.area == a))
            .filter(|o| {
                filter
                    .created_on
                    .map_or(true, |d| o.created_at.date_naive() == d)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(matched)
    }

    async fn pending_orders(&self) -> Result<Vec<Order>, String> {
        self.orders(OrderFilter {
            status: Some(OrderStatus::Pending),
            ..OrderFilter::default()
        })
        .await
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        next: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<Order, String> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| format!("Order not found: {}", order_id))?;
        order.transition_to(next, at).map_err(|e| e.to_string())?;
        Ok(order.clone())
    }

    async fn remove_order(&self, order_id: &str) -> Result<(), String> {
        let mut orders = self.orders.write().await;
        orders
            .remove(order_id)
            .map(|_| ())
            .ok_or_else(|| format!("Order not found: {}", order_id))
    }

    async fn insert_partner(&self, partner: DeliveryPartner) -> Result<(), String> {
        let mut partners = self.partners.write().await;
        if partners.contains_key(&partner.id) {
            return Err(format!("Partner {} already exists", partner.id));
        }
        partners.insert(partner.id.clone(), partner);
        Ok(())
    }

    async fn partner(&self, partner_id: &str) -> Result<Option<DeliveryPartner>, String> {
        Ok(self.partners.read().await.get(partner_id).cloned())
    }

    async fn partners(&self) -> Result<Vec<DeliveryPartner>, String> {
        let partners = self.partners.read().await;
        let mut all: Vec<DeliveryPartner> = partners.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn active_partners(&self) -> Result<Vec<DeliveryPartner>, String> {
        let mut all = self.partners().await?;
        all.retain(|p| p.is_active());
        Ok(all)
    }

    async fn update_partner(&self, partner: DeliveryPartner) -> Result<(), String> {
        let mut partners = self.partners.write().await;
        if !partners.contains_key(&partner.id) {
            return Err(format!("Partner not found: {}", partner.id));
        }
        partners.insert(partner.id.clone(), partner);
        Ok(())
    }

    async fn commit_assignment(&self, order_id: &str, partner_id: &str) -> Result<(), String> {
        // Both write locks held for the whole commit; readers see either
        // the old state or the fully committed one.
        let mut orders = self.orders.write().await;
        let mut partners = self.partners.write().await;

        let order = orders
            .get_mut(order_id)
            .ok_or_else(|| format!("Order not found: {}", order_id))?;
        let partner = partners
            .get_mut(partner_id)
            .ok_or_else(|| format!("Partner not found: {}", partner_id))?;

        if !order.is_pending() {
            return Err(format!("Order {} is not pending", order_id));
        }
        partner.take_order().map_err(|e| e.to_string())?;
        order
            .mark_assigned(partner_id, Utc::now())
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
