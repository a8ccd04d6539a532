use super::entity_store::InMemoryEntityStore;
use crate::domains::delivery::{DeliveryPartner, EntityStore, Order, OrderFilter, OrderStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Serialized shape of the whole entity store: one JSON document holding
/// every order and partner. Doubles as the seed-file format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub orders: Vec<Order>,
    pub partners: Vec<DeliveryPartner>,
}

/// File-backed EntityStore for development and demos.
///
/// State lives in an in-memory store; every mutation writes the full
/// snapshot back to the file, so a restart resumes where the last run
/// left off.
pub struct FileEntityStore {
    path: PathBuf,
    inner: InMemoryEntityStore,
}

impl FileEntityStore {
    /// Open the store, loading the snapshot when the file already exists.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Self, String> {
        let path = path.into();
        let inner = InMemoryEntityStore::new();

        if path.exists() {
            let raw = tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| format!("Failed to read store file {}: {}", path.display(), e))?;
            let snapshot: StoreSnapshot = serde_json::from_str(&raw)
                .map_err(|e| format!("Failed to parse store file {}: {}", path.display(), e))?;
            inner.load(snapshot.orders, snapshot.partners).await;
        }

        Ok(Self { path, inner })
    }

    async fn persist(&self) -> Result<(), String> {
        let snapshot = StoreSnapshot {
            orders: self.inner.orders(OrderFilter::default()).await?,
            partners: self.inner.partners().await?,
        };
        let raw = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("Failed to serialize store snapshot: {}", e))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create store directory: {}", e))?;
        }
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| format!("Failed to write store file {}: {}", self.path.display(), e))
    }

    /// Seed the store and persist immediately (first boot with demo data).
    pub async fn seed(
        &self,
        orders: Vec<Order>,
        partners: Vec<DeliveryPartner>,
    ) -> Result<(), String> {
        self.inner.load(orders, partners).await;
        self.persist().await
    }
}

#[async_trait]
impl EntityStore for FileEntityStore {
    async fn insert_order(&self, order: Order) -> Result<(), String> {
        self.inner.insert_order(order).await?;
        self.persist().await
    }

    async fn order(&self, order_id: &str) -> Result<Option<Order>, String> {
        self.inner.order(order_id).await
    }

    async fn orders(&self, filter: OrderFilter) -> Result<Vec<Order>, String> {
        self.inner.orders(filter).await
    }

    async fn pending_orders(&self) -> Result<Vec<Order>, String> {
        self.inner.pending_orders().await
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        next: OrderStatus,
        at: DateTime<Utc>,
    ) -> Result<Order, String> {
        let order = self.inner.update_order_status(order_id, next, at).await?;
        self.persist().await?;
        Ok(order)
    }

    async fn remove_order(&self, order_id: &str) -> Result<(), String> {
        self.inner.remove_order(order_id).await?;
        self.persist().await
    }

    async fn insert_partner(&self, partner: DeliveryPartner) -> Result<(), String> {
        self.inner.insert_partner(partner).await?;
        self.persist().await
    }

    async fn partner(&self, partner_id: &str) -> Result<Option<DeliveryPartner>, String> {
        self.inner.partner(partner_id).await
    }

    async fn partners(&self) -> Result<Vec<DeliveryPartner>, String> {
        self.inner.partners().await
    }

    async fn active_partners(&self) -> Result<Vec<DeliveryPartner>, String> {
        self.inner.active_partners().await
    }

    async fn update_partner(&self, partner: DeliveryPartner) -> Result<(), String> {
        self.inner.update_partner(partner).await?;
        self.persist().await
    }

    async fn commit_assignment(&self, order_id: &str, partner_id: &str) -> Result<(), String> {
        self.inner.commit_assignment(order_id, partner_id).await?;
        self.persist().await
    }
}
