use super::result::FailureReason;
use crate::domains::delivery::{DeliveryPartner, Order};
use chrono::NaiveTime;

/// Result of the staged eligibility check for a single order.
///
/// The stages run in a fixed sequence so that the caller learns *which*
/// constraint emptied the candidate set, not just that it is empty:
/// active -> area coverage -> shift window -> spare capacity.
#[derive(Debug, Clone, PartialEq)]
pub enum Eligibility<'a> {
    Eligible(Vec<&'a DeliveryPartner>),
    Rejected(FailureReason),
}

/// Classify the partner snapshot against one order. Pure; safe to call
/// concurrently for independent orders.
///
/// `shift_ref` is the time-of-day the shift window is checked against
/// (the order's scheduled time, or the run clock for unscheduled orders).
pub fn classify<'a>(
    order: &Order,
    partners: &'a [DeliveryPartner],
    shift_ref: NaiveTime,
) -> Eligibility<'a> {
    // A malformed order (blank delivery area) degrades to a normal failure
    // instead of aborting the run.
    if order.area.trim().is_empty() {
        return Eligibility::Rejected(FailureReason::NoEligiblePartner);
    }

    let active: Vec<&DeliveryPartner> = partners.iter().filter(|p| p.is_active()).collect();
    if active.is_empty() {
        return Eligibility::Rejected(FailureReason::NoEligiblePartner);
    }

    let in_area: Vec<&DeliveryPartner> = active
        .into_iter()
        .filter(|p| p.covers(&order.area))
        .collect();
    if in_area.is_empty() {
        return Eligibility::Rejected(FailureReason::AreaNotCovered);
    }

    let on_shift: Vec<&DeliveryPartner> = in_area
        .into_iter()
        .filter(|p| p.on_shift(shift_ref))
        .collect();
    if on_shift.is_empty() {
        return Eligibility::Rejected(FailureReason::ShiftMismatch);
    }

    let with_capacity: Vec<&DeliveryPartner> = on_shift
        .into_iter()
        .filter(|p| p.has_spare_capacity())
        .collect();
    if with_capacity.is_empty() {
        return Eligibility::Rejected(FailureReason::CapacityExhausted);
    }

    Eligibility::Eligible(with_capacity)
}

/// The plain candidate set, without the rejection reason. Empty is a normal
/// outcome, not an error.
pub fn eligible_partners<'a>(
    order: &Order,
    partners: &'a [DeliveryPartner],
    shift_ref: NaiveTime,
) -> Vec<&'a DeliveryPartner> {
    match classify(order, partners, shift_ref) {
        Eligibility::Eligible(candidates) => candidates,
        Eligibility::Rejected(_) => Vec::new(),
    }
}
