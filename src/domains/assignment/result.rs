use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed taxonomy of per-order assignment failures. These are recorded on
/// the result, never raised as errors; a failed order stays pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    #[serde(rename = "No eligible partner")]
    NoEligiblePartner,
    #[serde(rename = "Area not covered")]
    AreaNotCovered,
    #[serde(rename = "Shift mismatch")]
    ShiftMismatch,
    #[serde(rename = "Capacity exhausted")]
    CapacityExhausted,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureReason::NoEligiblePartner => "No eligible partner",
            FailureReason::AreaNotCovered => "Area not covered",
            FailureReason::ShiftMismatch => "Shift mismatch",
            FailureReason::CapacityExhausted => "Capacity exhausted",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    Success,
    Failed,
}

/// Outcome of evaluating one order in one run. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentResult {
    pub order_id: String,
    pub partner_id: Option<String>,
    pub status: AssignmentStatus,
    pub reason: Option<FailureReason>,
    pub timestamp: DateTime<Utc>,
    pub duration_ms: f64,
}

impl AssignmentResult {
    pub fn success(
        order_id: &str,
        partner_id: &str,
        timestamp: DateTime<Utc>,
        duration_ms: f64,
    ) -> Self {
        Self {
            order_id: order_id.to_string(),
            partner_id: Some(partner_id.to_string()),
            status: AssignmentStatus::Success,
            reason: None,
            timestamp,
            duration_ms,
        }
    }

    pub fn failure(
        order_id: &str,
        reason: FailureReason,
        timestamp: DateTime<Utc>,
        duration_ms: f64,
    ) -> Self {
        Self {
            order_id: order_id.to_string(),
            partner_id: None,
            status: AssignmentStatus::Failed,
            reason: Some(reason),
            timestamp,
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == AssignmentStatus::Success
    }
}
