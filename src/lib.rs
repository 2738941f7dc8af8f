pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{fixtures::Fixtures, memory::InMemoryStore, storage::LocalStorage};
pub use config::{session_config::SessionScript, toml_config::AppConfig};
pub use core::{
    edit_session::ZoneEditSession,
    orders::OrderService,
    replay::{ReplayReport, SessionReplay},
    riders::RiderService,
    warehouses::WarehouseService,
    zones::ZoneService,
};
pub use utils::error::{AdminError, Result};
