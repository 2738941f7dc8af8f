use crate::domain::model::{
    Order, OrderStatusLog, Proof, Rider, RiderLocation, RiderZone, Warehouse, Zone,
};
use crate::utils::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

/// Zones in a stable order; that order is the containment tie-break.
pub trait ZoneRepository {
    fn zones(&self) -> &[Zone];
    fn zone(&self, id: &str) -> Option<&Zone>;
    /// Replaces the zone with the same id in place. Returns false when no such zone exists.
    fn save_zone(&mut self, zone: Zone) -> bool;
    fn delete_zones(&mut self, ids: &[String]) -> usize;
}

pub trait OrderRepository {
    /// Newest first.
    fn orders(&self) -> &[Order];
    fn order(&self, id: &str) -> Option<&Order>;
    fn insert_order(&mut self, order: Order);
    fn save_order(&mut self, order: Order) -> bool;
    fn append_status_log(&mut self, log: OrderStatusLog);
    fn status_logs(&self, order_id: &str) -> Vec<OrderStatusLog>;
    fn proof(&self, order_id: &str) -> Option<&Proof>;
}

pub trait WarehouseRepository {
    fn warehouses(&self) -> &[Warehouse];
    fn warehouse(&self, id: &str) -> Option<&Warehouse>;
    fn save_warehouse(&mut self, warehouse: Warehouse) -> bool;
}

pub trait RiderRepository {
    fn riders(&self) -> &[Rider];
    fn rider(&self, id: &str) -> Option<&Rider>;
    fn rider_zones(&self) -> &[RiderZone];
    fn add_rider_zone(&mut self, link: RiderZone);
    fn remove_rider_zones(&mut self, rider_id: &str, zone_ids: &[String]) -> usize;
    fn rider_location(&self, rider_id: &str) -> Option<&RiderLocation>;
}
