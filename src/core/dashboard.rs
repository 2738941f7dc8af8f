use crate::domain::model::{OrderStatus, OrderType, Zone};
use crate::domain::ports::{OrderRepository, ZoneRepository};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_orders: usize,
    pub delivered: usize,
    pub failed: usize,
    pub pending: usize,
    pub return_pickups: usize,
    pub visible_zone_ids: Vec<String>,
}

/// Overview counters for the landing view. A zone filter narrows the visible
/// zones to that zone; otherwise a warehouse filter keeps the zones it serves.
pub fn summarize<S>(store: &S, warehouse_id: Option<&str>, zone_id: Option<&str>) -> DashboardSummary
where
    S: OrderRepository + ZoneRepository,
{
    let orders: Vec<_> = store
        .orders()
        .iter()
        .filter(|o| warehouse_id.map(|w| o.warehouse_id == w).unwrap_or(true))
        .filter(|o| zone_id.map(|z| o.zone_id.as_deref() == Some(z)).unwrap_or(true))
        .collect();

    let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();

    let zones: Vec<&Zone> = match (zone_id, warehouse_id) {
        (Some(z), _) => store.zones().iter().filter(|zone| zone.id == z).collect(),
        (None, Some(w)) => store.zones().iter().filter(|zone| zone.is_served_by(w)).collect(),
        (None, None) => store.zones().iter().collect(),
    };

    DashboardSummary {
        total_orders: orders.len(),
        delivered: count(OrderStatus::Delivered),
        failed: count(OrderStatus::Failed),
        pending: count(OrderStatus::Pending),
        return_pickups: orders
            .iter()
            .filter(|o| o.order_type == OrderType::ReturnPickup)
            .count(),
        visible_zone_ids: zones.into_iter().map(|z| z.id.clone()).collect(),
    }
}
