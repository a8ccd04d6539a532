use crate::common::{DomainError, DomainResult};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerStatus {
    Active,
    Inactive,
}

/// Daily shift window. `start > end` means the shift wraps past midnight
/// (e.g. 22:00 - 06:00).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftWindow {
    #[serde(with = "shift_time")]
    pub start: NaiveTime,
    #[serde(with = "shift_time")]
    pub end: NaiveTime,
}

impl ShiftWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.start <= self.end {
            self.start <= t && t <= self.end
        } else {
            t >= self.start || t <= self.end
        }
    }
}

/// Shift times travel as "HH:MM" strings, matching the dashboard's shift editor.
mod shift_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&t.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartnerMetrics {
    pub rating: f64,
    pub completed_orders: u32,
    pub cancelled_orders: u32,
}

impl Default for PartnerMetrics {
    fn default() -> Self {
        Self {
            rating: 0.0,
            completed_orders: 0,
            cancelled_orders: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryPartner {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: PartnerStatus,
    pub current_load: u32,
    pub capacity: u32,
    pub areas: Vec<String>,
    pub shift: ShiftWindow,
    pub metrics: PartnerMetrics,
}

impl DeliveryPartner {
    pub fn is_active(&self) -> bool {
        self.status == PartnerStatus::Active
    }

    pub fn covers(&self, area: &str) -> bool {
        self.areas.iter().any(|a| a == area)
    }

    pub fn on_shift(&self, t: NaiveTime) -> bool {
        self.shift.contains(t)
    }

    pub fn has_spare_capacity(&self) -> bool {
        self.current_load < self.capacity
    }

    /// Increment the load for a newly claimed order. Invariant: load never
    /// exceeds capacity.
    pub fn take_order(&mut self) -> DomainResult<()> {
        if !self.has_spare_capacity() {
            return Err(DomainError::InvalidCommand {
                reason: format!("Partner {} is at capacity ({})", self.id, self.capacity),
            });
        }
        self.current_load += 1;
        Ok(())
    }
}
