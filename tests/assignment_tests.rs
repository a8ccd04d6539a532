use chrono::{NaiveTime, Utc};
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

fn order(id: &str, area: &str) -> Order {
    let now = Utc::now();
    Order {
        id: id.to_string(),
        customer_name: "Test Customer".to_string(),
        customer_phone: "+1-555-0000".to_string(),
        area: area.to_string(),
        items: Vec::new(),
        status: OrderStatus::Pending,
        total_amount: 10.0,
        scheduled_time: None,
        assigned_to: None,
        created_at: now,
        last_updated: now,
    }
}

fn noon() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap()
}

// ---- eligibility ----

#[test]
fn test_no_active_partner_reason() {
    let mut p = partner("P1", &["A"], 4.0, 0, 3);
    p.status = PartnerStatus::Inactive;

    let partners = [p];
    let outcome = classify(&order("O1", "A"), &partners, noon());
    assert_eq!(outcome, Eligibility::Rejected(FailureReason::NoEligiblePartner));
}

#[test]
fn test_area_not_covered_reason() {
    let partners = vec![partner("P1", &["A"], 4.0, 0, 3)];
    let outcome = classify(&order("O1", "Z"), &partners, noon());
    assert_eq!(outcome, Eligibility::Rejected(FailureReason::AreaNotCovered));
}

#[test]
fn test_shift_mismatch_reason() {
    let mut p = partner("P1", &["A"], 4.0, 0, 3);
    p.shift = ShiftWindow::new(
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
    );
    let partners = [p];
    let outcome = classify(&order("O1", "A"), &partners, noon());
    assert_eq!(outcome, Eligibility::Rejected(FailureReason::ShiftMismatch));
}

#[test]
fn test_capacity_exhausted_reason() {
    let partners = vec![partner("P1", &["A"], 4.0, 3, 3)];
    let outcome = classify(&order("O1", "A"), &partners, noon());
    assert_eq!(outcome, Eligibility::Rejected(FailureReason::CapacityExhausted));
}

#[test]
fn test_blank_area_degrades_to_no_eligible_partner() {
    let partners = vec![partner("P1", &["A"], 4.0, 0, 3)];
    let outcome = classify(&order("O1", "  "), &partners, noon());
    assert_eq!(outcome, Eligibility::Rejected(FailureReason::NoEligiblePartner));
}

#[test]
fn test_stage_precedence_over_inactive_coverage() {
    // An inactive partner covering the area never reaches the area stage:
    // the active partner not covering it makes the verdict AreaNotCovered.
    let mut covering_but_inactive = partner("P1", &["A"], 4.0, 0, 3);
    covering_but_inactive.status = PartnerStatus::Inactive;
    let active_elsewhere = partner("P2", &["B"], 4.0, 0, 3);

    let partners = [covering_but_inactive, active_elsewhere];
    let outcome = classify(
        &order("O1", "A"),
        &partners,
        noon(),
    );
    assert_eq!(outcome, Eligibility::Rejected(FailureReason::AreaNotCovered));
}

#[test]
fn test_eligible_set_filters_every_stage() {
    let eligible = partner("P1", &["A"], 4.0, 0, 3);
    let full = partner("P2", &["A"], 5.0, 3, 3);
    let elsewhere = partner("P3", &["B"], 5.0, 0, 3);
    let partners = vec![eligible, full, elsewhere];

    let candidates = eligible_partners(&order("O1", "A"), &partners, noon());
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, "P1");
}

#[test]
fn test_empty_candidates_is_not_an_error() {
    let candidates = eligible_partners(&order("O1", "A"), &[], noon());
    assert!(candidates.is_empty());
}

// ---- scoring ----

#[test]
fn test_higher_rating_wins() {
    let p1 = partner("P1", &["A"], 4.5, 0, 3);
    let p2 = partner("P2", &["A"], 4.9, 0, 3);
    let candidates = vec![&p1, &p2];

    let selected = select_partner(&candidates).unwrap();
    assert_eq!(selected.id, "P2");
}

#[test]
fn test_equal_rating_lower_load_wins() {
    let p1 = partner("P1", &["A"], 4.5, 2, 3);
    let p2 = partner("P2", &["A"], 4.5, 0, 3);
    let candidates = vec![&p1, &p2];

    let selected = select_partner(&candidates).unwrap();
    assert_eq!(selected.id, "P2");
}

#[test]
fn test_full_tie_breaks_on_smallest_id() {
    let p2 = partner("P2", &["A"], 4.5, 1, 3);
    let p1 = partner("P1", &["A"], 4.5, 1, 3);
    let p3 = partner("P3", &["A"], 4.5, 1, 3);
    let candidates = vec![&p2, &p1, &p3];

    let selected = select_partner(&candidates).unwrap();
    assert_eq!(selected.id, "P1");
}

#[test]
fn test_selection_is_deterministic() {
    let p1 = partner("P1", &["A"], 4.2, 1, 3);
    let p2 = partner("P2", &["A"], 4.7, 2, 3);
    let p3 = partner("P3", &["A"], 4.7, 2, 3);
    let candidates = vec![&p1, &p2, &p3];

    let first = select_partner(&candidates).map(|p| p.id.clone());
    let second = select_partner(&candidates).map(|p| p.id.clone());
    assert_eq!(first, second);
    assert_eq!(first.as_deref(), Some("P2"));
}

#[test]
fn test_empty_candidates_selects_none() {
    assert!(select_partner(&[]).is_none());
}

// ---- metrics ----

#[test]
fn test_success_rate_is_exact() {
    let now = Utc::now();
    let mut results = Vec::new();
    for i in 0..7 {
        results.push(AssignmentResult::success(
            &format!("O{}", i),
            "P1",
            now,
            2.0,
        ));
    }
    for i in 7..10 {
        results.push(AssignmentResult::failure(
            &format!("O{}", i),
            FailureReason::AreaNotCovered,
            now,
            1.0,
        ));
    }

    let metrics = summarize(&results, now);
    assert_eq!(metrics.total_assigned, 7);
    assert_eq!(metrics.success_rate, 70.0);
}

#[test]
fn test_empty_run_metrics_are_zeroed() {
    let now = Utc::now();
    let metrics = summarize(&[], now);
    assert_eq!(metrics.total_assigned, 0);
    assert_eq!(metrics.success_rate, 0.0);
    assert_eq!(metrics.average_time_ms, 0.0);
    assert!(metrics.failure_reasons.is_empty());
}

#[test]
fn test_failure_histogram_has_no_zero_counts() {
    let now = Utc::now();
    let results = vec![
        AssignmentResult::failure("O1", FailureReason::CapacityExhausted, now, 1.0),
        AssignmentResult::failure("O2", FailureReason::CapacityExhausted, now, 1.0),
        AssignmentResult::success("O3", "P1", now, 1.0),
    ];

    let metrics = summarize(&results, now);
    assert_eq!(metrics.failure_reasons.len(), 1);
    assert_eq!(
        metrics.failure_reasons[&FailureReason::CapacityExhausted],
        2
    );
}

#[test]
fn test_average_time_spans_all_results() {
    let now = Utc::now();
    let results = vec![
        AssignmentResult::success("O1", "P1", now, 4.0),
        AssignmentResult::failure("O2", FailureReason::AreaNotCovered, now, 2.0),
    ];

    let metrics = summarize(&results, now);
    assert_eq!(metrics.average_time_ms, 3.0);
}

#[test]
fn test_failure_reason_labels() {
    assert_eq!(FailureReason::NoEligiblePartner.to_string(), "No eligible partner");
    assert_eq!(FailureReason::AreaNotCovered.to_string(), "Area not covered");
    assert_eq!(FailureReason::ShiftMismatch.to_string(), "Shift mismatch");
    assert_eq!(FailureReason::CapacityExhausted.to_string(), "Capacity exhausted");

    let json = serde_json::to_string(&FailureReason::CapacityExhausted).unwrap();
    assert_eq!(json, "\"Capacity exhausted\"");
}
