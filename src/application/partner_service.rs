use crate::common::{ApplicationError, ApplicationResult, DomainError};
use crate::domains::delivery::{
    DeliveryPartner, DynEntityStore, EntityStore, PartnerMetrics, PartnerStatus, ShiftWindow,
};
use crate::domains::logger::{DomainLogger, DynLogger};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct NewPartner {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub areas: Vec<String>,
    pub shift: ShiftWindow,
    pub capacity: Option<u32>,
}

/// The dashboard's partner-status widget: active partners with spare
/// capacity, active partners at capacity, and inactive partners.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerAvailability {
    pub available: u32,
    pub busy: u32,
    pub offline: u32,
}

/// Partner registry operations: registration, shift and area edits,
/// activation state.
pub struct PartnerService {
    store: DynEntityStore,
    logger: DynLogger,
    default_capacity: u32,
}

impl PartnerService {
    pub fn new(store: DynEntityStore, logger: DynLogger, default_capacity: u32) -> Self {
        Self {
            store,
            logger,
            default_capacity,
        }
    }

    pub async fn register(&self, new: NewPartner) -> ApplicationResult<DeliveryPartner> {
        if new.areas.is_empty() {
            return Err(ApplicationError::Domain(DomainError::InvalidCommand {
                reason: "An active partner must cover at least one area".to_string(),
            }));
        }

        let existing = self
            .store
            .partners()
            .await
            .map_err(ApplicationError::Store)?;
        if existing.iter().any(|p| p.email == new.email) {
            return Err(ApplicationError::Domain(DomainError::InvalidCommand {
                reason: format!("A partner with email {} already exists", new.email),
            }));
        }

        let partner = DeliveryPartner {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            status: PartnerStatus::Active,
            current_load: 0,
            capacity: new.capacity.unwrap_or(self.default_capacity),
            areas: new.areas,
            shift: new.shift,
            metrics: PartnerMetrics::default(),
        };

        self.store
            .insert_partner(partner.clone())
            .await
            .map_err(ApplicationError::Store)?;
        self.logger.info(&format!(
            "Partner {} registered covering {} areas",
            partner.id,
            partner.areas.len()
        ));
        Ok(partner)
    }

    pub async fn partner(&self, partner_id: &str) -> ApplicationResult<DeliveryPartner> {
        self.store
            .partner(partner_id)
            .await
            .map_err(ApplicationError::Store)?
            .ok_or_else(|| {
                ApplicationError::Domain(DomainError::PartnerNotFound {
                    id: partner_id.to_string(),
                })
            })
    }

    pub async fn partners(&self) -> ApplicationResult<Vec<DeliveryPartner>> {
        self.store.partners().await.map_err(ApplicationError::Store)
    }

    pub async fn set_shift(
        &self,
        partner_id: &str,
        shift: ShiftWindow,
    ) -> ApplicationResult<DeliveryPartner> {
        let mut partner = self.partner(partner_id).await?;
        partner.shift = shift;
        self.store
            .update_partner(partner.clone())
            .await
            .map_err(ApplicationError::Store)?;
        Ok(partner)
    }

    pub async fn set_areas(
        &self,
        partner_id: &str,
        areas: Vec<String>,
    ) -> ApplicationResult<DeliveryPartner> {
        let mut partner = self.partner(partner_id).await?;
        if partner.is_active() && areas.is_empty() {
            return Err(ApplicationError::Domain(DomainError::InvalidCommand {
                reason: format!(
                    "Partner {} is active and must keep at least one area",
                    partner_id
                ),
            }));
        }
        partner.areas = areas;
        self.store
            .update_partner(partner.clone())
            .await
            .map_err(ApplicationError::Store)?;
        Ok(partner)
    }

    pub async fn set_status(
        &self,
        partner_id: &str,
        status: PartnerStatus,
    ) -> ApplicationResult<DeliveryPartner> {
        let mut partner = self.partner(partner_id).await?;
        if status == PartnerStatus::Active && partner.areas.is_empty() {
            return Err(ApplicationError::Domain(DomainError::InvalidCommand {
                reason: format!(
                    "Partner {} cannot be activated without a coverage area",
                    partner_id
                ),
            }));
        }
        partner.status = status;
        self.store
            .update_partner(partner.clone())
            .await
            .map_err(ApplicationError::Store)?;
        self.logger.info(&format!(
            "Partner {} is now {:?}",
            partner_id, partner.status
        ));
        Ok(partner)
    }

    pub async fn status_summary(&self) -> ApplicationResult<PartnerAvailability> {
        let partners = self
            .store
            .partners()
            .await
            .map_err(ApplicationError::Store)?;

        let mut summary = PartnerAvailability {
            available: 0,
            busy: 0,
            offline: 0,
        };
        for partner in &partners {
            if !partner.is_active() {
                summary.offline += 1;
            } else if partner.has_spare_capacity() {
                summary.available += 1;
            } else {
                summary.busy += 1;
            }
        }
        Ok(summary)
    }
}
