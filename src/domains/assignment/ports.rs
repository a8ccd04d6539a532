use super::{AssignmentResult, HistoryPoint, RunMetrics};
use async_trait::async_trait;
use std::sync::Arc;

/// Port for persisted run history: per-run metrics plus every per-order
/// result, read back later for the dashboard charts and tables.
#[async_trait]
pub trait RunHistory: Send + Sync {
    /// Append one completed run: its metrics and all per-order results.
    async fn append_run(
        &self,
        metrics: RunMetrics,
        results: Vec<AssignmentResult>,
    ) -> Result<(), String>;

    /// Record a single result outside a full run (manual per-order assign).
    async fn record_result(&self, result: AssignmentResult) -> Result<(), String>;

    async fn latest_metrics(&self) -> Result<Option<RunMetrics>, String>;

    /// One point per run, oldest first.
    async fn metrics_series(&self) -> Result<Vec<HistoryPoint>, String>;

    /// Most recent results first, capped at `limit`.
    async fn recent_results(&self, limit: usize) -> Result<Vec<AssignmentResult>, String>;

    async fn all_results(&self) -> Result<Vec<AssignmentResult>, String>;
}

pub type DynRunHistory = Arc<dyn RunHistory>;
