pub mod dashboard;
pub mod edit_session;
pub mod geometry;
pub mod ids;
pub mod orders;
pub mod replay;
pub mod riders;
pub mod warehouses;
pub mod zones;

pub use crate::domain::model::{Order, Point, Position, Zone};
pub use crate::domain::ports::{
    OrderRepository, RiderRepository, Storage, WarehouseRepository, ZoneRepository,
};
pub use crate::utils::error::Result;
