use crate::common::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Assigned,
    Picked,
    Delivered,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub area: String,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub scheduled_time: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Valid status progression: pending -> assigned -> picked -> delivered.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self.status, next),
            (OrderStatus::Pending, OrderStatus::Assigned)
                | (OrderStatus::Assigned, OrderStatus::Picked)
                | (OrderStatus::Picked, OrderStatus::Delivered)
        )
    }

    pub fn transition_to(&mut self, next: OrderStatus, at: DateTime<Utc>) -> DomainResult<()> {
        if !self.can_transition_to(next) {
            return Err(DomainError::InvalidCommand {
                reason: format!(
                    "Order {} cannot move from {:?} to {:?}",
                    self.id, self.status, next
                ),
            });
        }
        self.status = next;
        self.last_updated = at;
        Ok(())
    }

    /// Claim this order for a partner. Only the assignment engine calls this,
    /// and only while the order is still pending.
    pub fn mark_assigned(&mut self, partner_id: &str, at: DateTime<Utc>) -> DomainResult<()> {
        if !self.is_pending() {
            return Err(DomainError::InvalidCommand {
                reason: format!("Order {} is not pending and cannot be assigned", self.id),
            });
        }
        self.status = OrderStatus::Assigned;
        self.assigned_to = Some(partner_id.to_string());
        self.last_updated = at;
        Ok(())
    }
}
