use super::result::{AssignmentResult, FailureReason};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate view of one assignment run. Immutable once created; the run
/// history owns it afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub run_at: DateTime<Utc>,
    pub total_assigned: u32,
    pub success_rate: f64,
    pub average_time_ms: f64,
    pub failure_reasons: BTreeMap<FailureReason, u32>,
}

impl RunMetrics {
    pub fn empty(run_at: DateTime<Utc>) -> Self {
        Self {
            run_at,
            total_assigned: 0,
            success_rate: 0.0,
            average_time_ms: 0.0,
            failure_reasons: BTreeMap::new(),
        }
    }

    pub fn history_point(&self) -> HistoryPoint {
        HistoryPoint {
            timestamp: self.run_at,
            success_rate: self.success_rate,
            average_time_ms: self.average_time_ms,
            total_assigned: self.total_assigned,
        }
    }
}

/// One point of the per-run time series the dashboard charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub success_rate: f64,
    pub average_time_ms: f64,
    pub total_assigned: u32,
}

/// Summarize one run's results. Pure and deterministic; both rates are 0
/// for an empty run, and the histogram never carries zero counts.
pub fn summarize(results: &[AssignmentResult], run_at: DateTime<Utc>) -> RunMetrics {
    if results.is_empty() {
        return RunMetrics::empty(run_at);
    }

    let total = results.len() as f64;
    let successes = results.iter().filter(|r| r.is_success()).count() as u32;

    let mut failure_reasons: BTreeMap<FailureReason, u32> = BTreeMap::new();
    for result in results {
        if let Some(reason) = result.reason {
            *failure_reasons.entry(reason).or_insert(0) += 1;
        }
    }

    let total_time: f64 = results.iter().map(|r| r.duration_ms).sum();

    RunMetrics {
        run_at,
        total_assigned: successes,
        success_rate: successes as f64 / total * 100.0,
        average_time_ms: total_time / total,
        failure_reasons,
    }
}
