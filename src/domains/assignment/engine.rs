use super::eligibility::{classify, Eligibility};
use super::metrics::{summarize, RunMetrics};
use super::result::{AssignmentResult, FailureReason};
use super::scoring::select_partner;
use crate::common::{DomainError, DomainResult};
use crate::domains::delivery::{DynEntityStore, EntityStore, Order};
use crate::domains::logger::{DomainLogger, DynLogger};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::time::Instant;

/// Engine lifecycle for one run. A store failure is fatal and leaves the
/// engine Aborted; per-order failures are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Aborted,
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub metrics: RunMetrics,
    pub results: Vec<AssignmentResult>,
}

enum Decision {
    Assign(String),
    Fail(FailureReason),
}

/// Orchestrates one assignment pass: snapshot pending orders, filter and
/// score candidates per order, commit each assignment through the store.
///
/// Processing is strictly sequential within a run: each commit updates the
/// in-run partner snapshot, so later orders see the load claimed by earlier
/// ones. The caller serializes whole runs (single-writer).
pub struct AssignmentEngine {
    store: DynEntityStore,
    logger: DynLogger,
    max_batch_size: Option<usize>,
    state: RunState,
}

impl AssignmentEngine {
    pub fn new(store: DynEntityStore, logger: DynLogger) -> Self {
        Self {
            store,
            logger,
            max_batch_size: None,
            state: RunState::Idle,
        }
    }

    /// Cap the number of pending orders one run will process. Callers that
    /// need bounded latency cap the batch instead of cancelling mid-run.
    pub fn with_batch_cap(mut self, cap: usize) -> Self {
        self.max_batch_size = Some(cap);
        self
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Execute one run over the current pending-order snapshot.
    ///
    /// Earlier-scheduled orders get first claim on scarce capacity.
    /// A run with no pending orders completes normally with zeroed metrics
    /// and mutates nothing. On a store failure the run aborts; assignments
    /// committed before the failure remain committed.
    pub async fn run(&mut self, run_at: DateTime<Utc>) -> DomainResult<RunOutcome> {
        self.state = RunState::Running;

        let mut pending = match self.store.pending_orders().await {
            Ok(orders) => orders,
            Err(e) => return Err(self.abort("loading pending orders", e)),
        };
        pending.sort_by(schedule_order);
        if let Some(cap) = self.max_batch_size {
            pending.truncate(cap);
        }

        let mut partners = match self.store.active_partners().await {
            Ok(partners) => partners,
            Err(e) => return Err(self.abort("loading partner snapshot", e)),
        };

        self.logger.info(&format!(
            "Assignment run started: {} pending orders, {} active partners",
            pending.len(),
            partners.len()
        ));

        let mut results = Vec::with_capacity(pending.len());
        for order in &pending {
            let started = Instant::now();
            if order.area.trim().is_empty() {
                self.logger
                    .warn(&format!("Order {} has no delivery area", order.id));
            }

            let shift_ref = order
                .scheduled_time
                .map(|t| t.time())
                .unwrap_or_else(|| run_at.time());

            let decision = match classify(order, &partners, shift_ref) {
                Eligibility::Eligible(candidates) => match select_partner(&candidates) {
                    Some(partner) => Decision::Assign(partner.id.clone()),
                    None => Decision::Fail(FailureReason::NoEligiblePartner),
                },
                Eligibility::Rejected(reason) => Decision::Fail(reason),
            };

            match decision {
                Decision::Assign(partner_id) => {
                    if let Err(e) = self.store.commit_assignment(&order.id, &partner_id).await {
                        return Err(self.abort(&format!("committing order {}", order.id), e));
                    }
                    // Later orders in this run must see the claimed load.
                    if let Some(p) = partners.iter_mut().find(|p| p.id == partner_id) {
                        p.current_load += 1;
                    }
                    results.push(AssignmentResult::success(
                        &order.id,
                        &partner_id,
                        Utc::now(),
                        elapsed_ms(started),
                    ));
                }
                Decision::Fail(reason) => {
                    results.push(AssignmentResult::failure(
                        &order.id,
                        reason,
                        Utc::now(),
                        elapsed_ms(started),
                    ));
                }
            }
        }

        let metrics = summarize(&results, run_at);
        self.state = RunState::Completed;
        self.logger.info(&format!(
            "Assignment run completed: {}/{} assigned ({:.1}%)",
            metrics.total_assigned,
            results.len(),
            metrics.success_rate
        ));

        Ok(RunOutcome { metrics, results })
    }

    fn abort(&mut self, context: &str, cause: String) -> DomainError {
        self.state = RunState::Aborted;
        let msg = format!("Assignment run aborted while {}: {}", context, cause);
        self.logger.error(&msg);
        DomainError::InfrastructureError(msg)
    }
}

/// Run ordering: scheduled orders first, earliest scheduled time ahead;
/// unscheduled orders after them by intake time; ids keep it deterministic.
fn schedule_order(a: &Order, b: &Order) -> Ordering {
    match (a.scheduled_time, b.scheduled_time) {
        (Some(x), Some(y)) => x
            .cmp(&y)
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a
            .created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.cmp(&b.id)),
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
