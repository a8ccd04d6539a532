use crate::common::{ApplicationError, ApplicationResult, DomainError};
use crate::config::EngineConfig;
use crate::domains::assignment::{
    classify, select_partner, AssignmentEngine, AssignmentResult, DynRunHistory, Eligibility,
    FailureReason, HistoryPoint, RunHistory, RunMetrics,
};
use crate::domains::delivery::{DynEntityStore, EntityStore};
use crate::domains::logger::{DomainLogger, DynLogger};
use chrono::Utc;
use std::collections::BTreeMap;
use std::time::Instant;
use tokio::sync::Mutex;

/// Application facade over the assignment engine and run history.
///
/// Single-writer: the engine lives behind a mutex, so concurrent run
/// requests queue in arrival order and never interleave on partner load or
/// order status. The manual per-order assign takes the same lock.
pub struct AssignmentService {
    store: DynEntityStore,
    history: DynRunHistory,
    logger: DynLogger,
    engine: Mutex<AssignmentEngine>,
    success_rate_alert: f64,
}

impl AssignmentService {
    pub fn new(
        store: DynEntityStore,
        history: DynRunHistory,
        logger: DynLogger,
        config: &EngineConfig,
    ) -> Self {
        let mut engine = AssignmentEngine::new(store.clone(), logger.clone());
        if let Some(cap) = config.max_batch_size {
            engine = engine.with_batch_cap(cap);
        }
        Self {
            store,
            history,
            logger,
            engine: Mutex::new(engine),
            success_rate_alert: config.success_rate_alert,
        }
    }

    /// Run one assignment pass and append it to history. Safe to call
    /// repeatedly: with no pending orders it returns zeroed metrics and
    /// mutates nothing.
    pub async fn run_assignment(&self) -> ApplicationResult<RunMetrics> {
        let mut engine = self.engine.lock().await;
        let outcome = engine.run(Utc::now()).await.map_err(|e| match e {
            DomainError::InfrastructureError(msg) => ApplicationError::Store(msg),
            other => ApplicationError::Domain(other),
        })?;

        let metrics = outcome.metrics;
        let processed = outcome.results.len();
        self.history
            .append_run(metrics.clone(), outcome.results)
            .await
            .map_err(ApplicationError::History)?;

        if processed > 0 && metrics.success_rate < self.success_rate_alert {
            self.logger.warn(&format!(
                "Run success rate {:.1}% is below the {:.1}% alert threshold",
                metrics.success_rate, self.success_rate_alert
            ));
        }

        Ok(metrics)
    }

    /// Assign a single pending order through the same eligibility and
    /// scoring path as a full run (the dashboard's per-order assign action).
    /// A failed match is a recorded result, not an error.
    pub async fn assign_order(&self, order_id: &str) -> ApplicationResult<AssignmentResult> {
        let _run_guard = self.engine.lock().await;

        let order = self
            .store
            .order(order_id)
            .await
            .map_err(ApplicationError::Store)?
            .ok_or_else(|| DomainError::OrderNotFound {
                id: order_id.to_string(),
            })?;
        if !order.is_pending() {
            return Err(ApplicationError::Domain(DomainError::InvalidCommand {
                reason: format!("Order {} is not pending and cannot be assigned", order_id),
            }));
        }

        let partners = self
            .store
            .active_partners()
            .await
            .map_err(ApplicationError::Store)?;

        let started = Instant::now();
        let now = Utc::now();
        let shift_ref = order
            .scheduled_time
            .map(|t| t.time())
            .unwrap_or_else(|| now.time());

        let result = match classify(&order, &partners, shift_ref) {
            Eligibility::Eligible(candidates) => match select_partner(&candidates) {
                Some(partner) => {
                    let partner_id = partner.id.clone();
                    self.store
                        .commit_assignment(&order.id, &partner_id)
                        .await
                        .map_err(ApplicationError::Store)?;
                    AssignmentResult::success(
                        &order.id,
                        &partner_id,
                        Utc::now(),
                        elapsed_ms(started),
                    )
                }
                None => AssignmentResult::failure(
                    &order.id,
                    FailureReason::NoEligiblePartner,
                    Utc::now(),
                    elapsed_ms(started),
                ),
            },
            Eligibility::Rejected(reason) => {
                AssignmentResult::failure(&order.id, reason, Utc::now(), elapsed_ms(started))
            }
        };

        self.history
            .record_result(result.clone())
            .await
            .map_err(ApplicationError::History)?;

        match (&result.partner_id, result.reason) {
            (Some(partner_id), _) => self
                .logger
                .info(&format!("Order {} assigned to partner {}", order_id, partner_id)),
            (None, Some(reason)) => self
                .logger
                .warn(&format!("Order {} not assigned: {}", order_id, reason)),
            (None, None) => {}
        }

        Ok(result)
    }

    pub async fn latest_metrics(&self) -> ApplicationResult<Option<RunMetrics>> {
        self.history
            .latest_metrics()
            .await
            .map_err(ApplicationError::History)
    }

    pub async fn metrics_series(&self) -> ApplicationResult<Vec<HistoryPoint>> {
        self.history
            .metrics_series()
            .await
            .map_err(ApplicationError::History)
    }

    pub async fn recent_assignments(&self, limit: usize) -> ApplicationResult<Vec<AssignmentResult>> {
        self.history
            .recent_results(limit)
            .await
            .map_err(ApplicationError::History)
    }

    /// Failure-reason counts accumulated over every recorded result, the
    /// cumulative view behind the dashboard's failure-reason chart.
    pub async fn failure_reason_totals(&self) -> ApplicationResult<BTreeMap<FailureReason, u32>> {
        let results = self
            .history
            .all_results()
            .await
            .map_err(ApplicationError::History)?;

        let mut totals: BTreeMap<FailureReason, u32> = BTreeMap::new();
        for result in results {
            if let Some(reason) = result.reason {
                *totals.entry(reason).or_insert(0) += 1;
            }
        }
        Ok(totals)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
