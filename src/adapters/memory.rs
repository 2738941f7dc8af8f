use crate::adapters::fixtures::Fixtures;
use crate::domain::model::{
    Order, OrderStatusLog, Proof, Rider, RiderLocation, RiderZone, Warehouse, Zone,
};
use crate::domain::ports::{OrderRepository, RiderRepository, WarehouseRepository, ZoneRepository};
use std::collections::HashSet;

/// Vec-backed store. Insertion order is preserved everywhere; orders are kept
/// newest first.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    warehouses: Vec<Warehouse>,
    zones: Vec<Zone>,
    riders: Vec<Rider>,
    rider_zones: Vec<RiderZone>,
    rider_locations: Vec<RiderLocation>,
    orders: Vec<Order>,
    status_logs: Vec<OrderStatusLog>,
    proofs: Vec<Proof>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixtures(fixtures: Fixtures) -> Self {
        Self {
            warehouses: fixtures.warehouses,
            zones: fixtures.zones,
            riders: fixtures.riders,
            rider_zones: fixtures.rider_zones,
            rider_locations: fixtures.rider_locations,
            orders: fixtures.orders,
            status_logs: fixtures.status_logs,
            proofs: fixtures.proofs,
        }
    }

    pub fn snapshot(&self) -> Fixtures {
        Fixtures {
            warehouses: self.warehouses.clone(),
            zones: self.zones.clone(),
            riders: self.riders.clone(),
            rider_zones: self.rider_zones.clone(),
            rider_locations: self.rider_locations.clone(),
            orders: self.orders.clone(),
            status_logs: self.status_logs.clone(),
            proofs: self.proofs.clone(),
        }
    }
}

impl ZoneRepository for InMemoryStore {
    fn zones(&self) -> &[Zone] {
        &self.zones
    }

    fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    fn save_zone(&mut self, zone: Zone) -> bool {
        match self.zones.iter_mut().find(|z| z.id == zone.id) {
            Some(slot) => {
                *slot = zone;
                true
            }
            None => false,
        }
    }

    fn delete_zones(&mut self, ids: &[String]) -> usize {
        let targets: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let before = self.zones.len();
        self.zones.retain(|z| !targets.contains(z.id.as_str()));
        before - self.zones.len()
    }
}

impl OrderRepository for InMemoryStore {
    fn orders(&self) -> &[Order] {
        &self.orders
    }

    fn order(&self, id: &str) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    fn insert_order(&mut self, order: Order) {
        self.orders.insert(0, order);
    }

    fn save_order(&mut self, order: Order) -> bool {
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(slot) => {
                *slot = order;
                true
            }
            None => false,
        }
    }

    fn append_status_log(&mut self, log: OrderStatusLog) {
        self.status_logs.push(log);
    }

    fn status_logs(&self, order_id: &str) -> Vec<OrderStatusLog> {
        self.status_logs
            .iter()
            .filter(|l| l.order_id == order_id)
            .cloned()
            .collect()
    }

    fn proof(&self, order_id: &str) -> Option<&Proof> {
        self.proofs.iter().find(|p| p.order_id == order_id)
    }
}

impl WarehouseRepository for InMemoryStore {
    fn warehouses(&self) -> &[Warehouse] {
        &self.warehouses
    }

    fn warehouse(&self, id: &str) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.id == id)
    }

    fn save_warehouse(&mut self, warehouse: Warehouse) -> bool {
        match self.warehouses.iter_mut().find(|w| w.id == warehouse.id) {
            Some(slot) => {
                *slot = warehouse;
                true
            }
            None => false,
        }
    }
}

impl RiderRepository for InMemoryStore {
    fn riders(&self) -> &[Rider] {
        &self.riders
    }

    fn rider(&self, id: &str) -> Option<&Rider> {
        self.riders.iter().find(|r| r.id == id)
    }

    fn rider_zones(&self) -> &[RiderZone] {
        &self.rider_zones
    }

    fn add_rider_zone(&mut self, link: RiderZone) {
        self.rider_zones.push(link);
    }

    fn remove_rider_zones(&mut self, rider_id: &str, zone_ids: &[String]) -> usize {
        let targets: HashSet<&str> = zone_ids.iter().map(String::as_str).collect();
        let before = self.rider_zones.len();
        self.rider_zones
            .retain(|rz| !(rz.rider_id == rider_id && targets.contains(rz.zone_id.as_str())));
        before - self.rider_zones.len()
    }

    fn rider_location(&self, rider_id: &str) -> Option<&RiderLocation> {
        self.rider_locations.iter().find(|l| l.rider_id == rider_id)
    }
}
