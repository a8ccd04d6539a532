use crate::domains::delivery::DeliveryPartner;
use std::cmp::Ordering;

/// Rank two candidates: highest rating first, then lowest current load
/// (load balancing), then lexicographically smallest id. The id step makes
/// selection fully deterministic on identical input.
fn rank(a: &DeliveryPartner, b: &DeliveryPartner) -> Ordering {
    b.metrics
        .rating
        .total_cmp(&a.metrics.rating)
        .then_with(|| a.current_load.cmp(&b.current_load))
        .then_with(|| a.id.cmp(&b.id))
}

/// Select the best candidate, or None when the set is empty. The caller is
/// responsible for knowing *why* the set was empty (see `classify`).
pub fn select_partner<'a>(candidates: &[&'a DeliveryPartner]) -> Option<&'a DeliveryPartner> {
    candidates.iter().copied().min_by(|a, b| rank(a, b))
}
