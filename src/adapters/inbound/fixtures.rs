//! Demo data for first boots without a seed file, mirroring the sample
//! data the dashboard ships with.

use crate::domains::delivery::{
    DeliveryPartner, Order, OrderItem, OrderStatus, PartnerMetrics, PartnerStatus, ShiftWindow,
};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

pub const DEMO_AREAS: &[&str] = &["north", "south", "east", "west", "central"];

const PARTNER_NAMES: &[&str] = &[
    "Asha Patel",
    "Marco Silva",
    "Lena Fischer",
    "Tunde Okafor",
    "Mei Chen",
    "Omar Haddad",
    "Sofia Rossi",
    "Jonas Berg",
];

const MENU: &[(&str, f64)] = &[
    ("Margherita Pizza", 11.5),
    ("Pad Thai", 9.8),
    ("Falafel Wrap", 7.2),
    ("Ramen Bowl", 12.0),
    ("Caesar Salad", 8.4),
    ("Burrito", 10.1),
];

fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

pub fn demo_partners(count: usize, capacity: u32) -> Vec<DeliveryPartner> {
    let mut rng = rand::thread_rng();
    let shifts = [
        ShiftWindow::new(hm(6, 0), hm(14, 0)),
        ShiftWindow::new(hm(14, 0), hm(22, 0)),
        ShiftWindow::new(hm(22, 0), hm(6, 0)),
    ];

    (0..count)
        .map(|i| {
            let area_count = rng.gen_range(1..=3.min(DEMO_AREAS.len()));
            let areas = DEMO_AREAS
                .choose_multiple(&mut rng, area_count)
                .map(|a| a.to_string())
                .collect();

            DeliveryPartner {
                id: format!("partner-{:02}", i + 1),
                name: PARTNER_NAMES[i % PARTNER_NAMES.len()].to_string(),
                email: format!("partner{:02}@dispatch.example", i + 1),
                phone: format!("+1-555-{:04}", rng.gen_range(0..10_000)),
                status: PartnerStatus::Active,
                current_load: 0,
                capacity,
                areas,
                shift: shifts[i % shifts.len()],
                metrics: PartnerMetrics {
                    rating: rng.gen_range(30..=50) as f64 / 10.0,
                    completed_orders: rng.gen_range(0..500),
                    cancelled_orders: rng.gen_range(0..25),
                },
            }
        })
        .collect()
}

pub fn demo_orders(count: usize, now: DateTime<Utc>) -> Vec<Order> {
    let mut rng = rand::thread_rng();

    (0..count)
        .map(|i| {
            let item_count = rng.gen_range(1..=3);
            let items: Vec<OrderItem> = MENU
                .choose_multiple(&mut rng, item_count)
                .map(|&(name, price)| OrderItem {
                    name: name.to_string(),
                    quantity: 1,
                    price,
                })
                .collect();
            let total_amount: f64 = items
                .iter()
                .map(|item| item.price * item.quantity as f64)
                .sum();

            Order {
                id: format!("ORD-{:04}", i + 1),
                customer_name: format!("Customer {}", i + 1),
                customer_phone: format!("+1-555-{:04}", rng.gen_range(0..10_000)),
                area: DEMO_AREAS[rng.gen_range(0..DEMO_AREAS.len())].to_string(),
                items,
                status: OrderStatus::Pending,
                total_amount,
                scheduled_time: Some(now + Duration::minutes(rng.gen_range(15..240))),
                assigned_to: None,
                created_at: now,
                last_updated: now,
            }
        })
        .collect()
}
