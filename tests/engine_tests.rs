use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use delivery_dispatch::adapters::inbound::InMemoryEntityStore;
use delivery_dispatch::adapters::outbound::init_noop_logger;
use delivery_dispatch::domains::assignment::*;
use delivery_dispatch::domains::delivery::*;

fn all_day() -> ShiftWindow {
    ShiftWindow::new(
        NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(23, 59, 0).unwrap(),
    )
}

fn partner(id: &str, areas: &[&str], rating: f64, load: u32, capacity: u32) -> DeliveryPartner {
    DeliveryPartner {
        id: id.to_string(),
        name: id.to_string(),
        email: format!("{}@dispatch.example", id),
        phone: "+1-555-0000".to_string(),
        status: PartnerStatus::Active,
        current_load: load,
        capacity,
        areas: areas.iter().map(|a| a.to_string()).collect(),
        shift: all_day(),
        metrics: PartnerMetrics {
            rating,
            completed_orders: 0,
            cancelled_orders: 0,
        },
    }
}

fn order_at(id: &str, area: &str, scheduled: Option<DateTime<Utc>>) -> Order {
    let created = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
    Order {
        id: id.to_string(),
        customer_name: "Test Customer".to_string(),
        customer_phone: "+1-555-0000".to_string(),
        area: area.to_string(),
        items: Vec::new(),
        status: OrderStatus::Pending,
        total_amount: 10.0,
        scheduled_time: scheduled,
        assigned_to: None,
        created_at: created,
        last_updated: created,
    }
}

fn schedule(h: u32) -> Option<DateTime<Utc>> {
    Some(Utc.with_ymd_and_hms(2025, 3, 1, h, 0, 0).unwrap())
}

async fn store_with(
    orders: Vec<Order>,
    partners: Vec<DeliveryPartner>,
) -> Arc<InMemoryEntityStore> {
    let store = InMemoryEntityStore::new();
    store.load(orders, partners).await;
    Arc::new(store)
}

#[tokio::test]
async fn test_scarce_capacity_goes_to_earlier_scheduled_order() {
    let store = store_with(
        vec![
            order_at("ORD-LATE", "A", schedule(14)),
            order_at("ORD-EARLY", "A", schedule(12)),
        ],
        vec![partner("P1", &["A"], 4.5, 0, 1)],
    )
    .await;

    let mut engine = AssignmentEngine::new(store.clone(), init_noop_logger());
    let outcome = engine.run(Utc::now()).await.unwrap();

    assert_eq!(engine.state(), RunState::Completed);
    assert_eq!(outcome.metrics.total_assigned, 1);
    assert_eq!(outcome.results[0].order_id, "ORD-EARLY");
    assert!(outcome.results[0].is_success());
    assert_eq!(outcome.results[1].order_id, "ORD-LATE");
    assert_eq!(
        outcome.results[1].reason,
        Some(FailureReason::CapacityExhausted)
    );

    let early = store.order("ORD-EARLY").await.unwrap().unwrap();
    assert_eq!(early.status, OrderStatus::Assigned);
    assert_eq!(early.assigned_to.as_deref(), Some("P1"));

    let late = store.order("ORD-LATE").await.unwrap().unwrap();
    assert_eq!(late.status, OrderStatus::Pending);

    let p1 = store.partner("P1").await.unwrap().unwrap();
    assert_eq!(p1.current_load, 1);
}

#[tokio::test]
async fn test_uncovered_area_leaves_order_pending() {
    let store = store_with(
        vec![order_at("ORD-1", "Z", None)],
        vec![partner("P1", &["A"], 4.5, 0, 3)],
    )
    .await;

    let mut engine = AssignmentEngine::new(store.clone(), init_noop_logger());
    let outcome = engine.run(Utc::now()).await.unwrap();

    assert_eq!(outcome.metrics.total_assigned, 0);
    assert_eq!(outcome.results[0].reason, Some(FailureReason::AreaNotCovered));
    assert_eq!(
        outcome.metrics.failure_reasons[&FailureReason::AreaNotCovered],
        1
    );

    let order = store.order("ORD-1").await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(order.assigned_to.is_none());
}

#[tokio::test]
async fn test_run_is_load_aware_within_a_single_run() {
    // Equal ratings: the second order must see the load committed by the
    // first one and move to the other partner.
    let store = store_with(
        vec![
            order_at("ORD-1", "A", schedule(10)),
            order_at("ORD-2", "A", schedule(11)),
        ],
        vec![
            partner("P1", &["A"], 4.5, 0, 3),
            partner("P2", &["A"], 4.5, 0, 3),
        ],
    )
    .await;

    let mut engine = AssignmentEngine::new(store.clone(), init_noop_logger());
    let outcome = engine.run(Utc::now()).await.unwrap();

    assert_eq!(outcome.metrics.total_assigned, 2);
    assert_eq!(outcome.results[0].partner_id.as_deref(), Some("P1"));
    assert_eq!(outcome.results[1].partner_id.as_deref(), Some("P2"));
}

#[tokio::test]
async fn test_zero_pending_orders_is_a_noop() {
    let store = store_with(vec![], vec![partner("P1", &["A"], 4.5, 2, 3)]).await;

    let mut engine = AssignmentEngine::new(store.clone(), init_noop_logger());
    let outcome = engine.run(Utc::now()).await.unwrap();

    assert_eq!(engine.state(), RunState::Completed);
    assert_eq!(outcome.metrics.total_assigned, 0);
    assert_eq!(outcome.metrics.success_rate, 0.0);
    assert_eq!(outcome.metrics.average_time_ms, 0.0);
    assert!(outcome.metrics.failure_reasons.is_empty());
    assert!(outcome.results.is_empty());

    let p1 = store.partner("P1").await.unwrap().unwrap();
    assert_eq!(p1.current_load, 2);
}

#[tokio::test]
async fn test_batch_cap_bounds_a_run() {
    let store = store_with(
        vec![
            order_at("ORD-1", "A", schedule(10)),
            order_at("ORD-2", "A", schedule(11)),
            order_at("ORD-3", "A", schedule(12)),
        ],
        vec![partner("P1", &["A"], 4.5, 0, 3)],
    )
    .await;

    let mut engine = AssignmentEngine::new(store.clone(), init_noop_logger()).with_batch_cap(2);
    let outcome = engine.run(Utc::now()).await.unwrap();

    assert_eq!(outcome.results.len(), 2);
    let third = store.order("ORD-3").await.unwrap().unwrap();
    assert_eq!(third.status, OrderStatus::Pending);
}

#[tokio::test]
async fn test_scheduled_time_drives_shift_check() {
    // Partner works 09:00-17:00; the order is scheduled for 20:00, so the
    // shift check fails regardless of the run clock.
    let mut p = partner("P1", &["A"], 4.5, 0, 3);
    p.shift = ShiftWindow::new(
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    );
    let store = store_with(vec![order_at("ORD-1", "A", schedule(20))], vec![p]).await;

    let mut engine = AssignmentEngine::new(store.clone(), init_noop_logger());
    let run_at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let outcome = engine.run(run_at).await.unwrap();

    assert_eq!(outcome.results[0].reason, Some(FailureReason::ShiftMismatch));
}

#[tokio::test]
async fn test_identical_input_gives_identical_assignments() {
    let orders = vec![
        order_at("ORD-1", "A", schedule(10)),
        order_at("ORD-2", "B", schedule(11)),
        order_at("ORD-3", "A", schedule(12)),
    ];
    let partners = vec![
        partner("P1", &["A", "B"], 4.2, 0, 2),
        partner("P2", &["A"], 4.7, 1, 2),
        partner("P3", &["B"], 4.7, 0, 2),
    ];

    let mut assignments = Vec::new();
    for _ in 0..2 {
        let store = store_with(orders.clone(), partners.clone()).await;
        let mut engine = AssignmentEngine::new(store, init_noop_logger());
        let outcome = engine.run(Utc::now()).await.unwrap();
        assignments.push(
            outcome
                .results
                .iter()
                .map(|r| (r.order_id.clone(), r.partner_id.clone()))
                .collect::<Vec<_>>(),
        );
    }

    assert_eq!(assignments[0], assignments[1]);
}

// Store stub that starts failing commits after a set number of successes,
// to exercise the abort path.
struct FlakyStore {
    inner: InMemoryEntityStore,
    commits_left: AtomicUsize,
}

impl FlakyStore {
    fn new(inner: InMemoryEntityStore, commits_left: usize) -> Self {
        Self {
            inner,
            commits_left: AtomicUsize::new(commits_left),
        }
    }
}

#[async_trait]
impl EntityStore for FlakyStore {
    async fn insert_order(&self, order: Order) -> Result<(), String> {
        self.inner.insert_order(order).await
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
        self.inner.update_order_status(order_id, next, at).await
    }
    async fn remove_order(&self, order_id: &str) -> Result<(), String> {
        self.inner.remove_order(order_id).await
    }
    async fn insert_partner(&self, p: DeliveryPartner) -> Result<(), String> {
        self.inner.insert_partner(p).await
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
    async fn update_partner(&self, p: DeliveryPartner) -> Result<(), String> {
        self.inner.update_partner(p).await
    }
    async fn commit_assignment(&self, order_id: &str, partner_id: &str) -> Result<(), String> {
        let left = self.commits_left.load(AtomicOrdering::SeqCst);
        if left == 0 {
            return Err("entity store unavailable".to_string());
        }
        self.commits_left.store(left - 1, AtomicOrdering::SeqCst);
        self.inner.commit_assignment(order_id, partner_id).await
    }
}

#[tokio::test]
async fn test_store_failure_aborts_but_keeps_committed_work() {
    let inner = InMemoryEntityStore::new();
    inner
        .load(
            vec![
                order_at("ORD-1", "A", schedule(10)),
                order_at("ORD-2", "A", schedule(11)),
            ],
            vec![partner("P1", &["A"], 4.5, 0, 3)],
        )
        .await;
    let store = Arc::new(FlakyStore::new(inner, 1));

    let mut engine = AssignmentEngine::new(store.clone(), init_noop_logger());
    let error = engine.run(Utc::now()).await.unwrap_err();

    assert_eq!(engine.state(), RunState::Aborted);
    assert!(error.to_string().contains("ORD-2"));

    // The first assignment is final; the second order is retryable.
    let first = store.order("ORD-1").await.unwrap().unwrap();
    assert_eq!(first.status, OrderStatus::Assigned);
    let second = store.order("ORD-2").await.unwrap().unwrap();
    assert_eq!(second.status, OrderStatus::Pending);
    let p1 = store.partner("P1").await.unwrap().unwrap();
    assert_eq!(p1.current_load, 1);
}
