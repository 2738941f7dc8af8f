use crate::domain::model::{Warehouse, WarehouseUpdate, Zone};
use crate::domain::ports::{WarehouseRepository, ZoneRepository};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::validate_non_empty_string;

pub struct WarehouseService<'a, S> {
    store: &'a mut S,
}

impl<'a, S> WarehouseService<'a, S>
where
    S: WarehouseRepository + ZoneRepository,
{
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub fn list_warehouses(&self) -> &[Warehouse] {
        self.store.warehouses()
    }

    pub fn get_warehouse(&self, id: &str) -> Result<&Warehouse> {
        self.store
            .warehouse(id)
            .ok_or_else(|| AdminError::not_found("Warehouse", id))
    }

    pub fn update_warehouse(&mut self, id: &str, changes: WarehouseUpdate) -> Result<Warehouse> {
        let mut warehouse = self.get_warehouse(id)?.clone();
        if let Some(name) = changes.name {
            validate_non_empty_string("name", &name)?;
            warehouse.name = name.trim().to_string();
        }
        if let Some(address) = changes.short_national_address {
            warehouse.short_national_address = address;
        }
        self.store.save_warehouse(warehouse.clone());
        tracing::info!("✅ Warehouse {} updated", id);
        Ok(warehouse)
    }

    pub fn warehouse_zones(&self, id: &str) -> Result<Vec<&Zone>> {
        self.get_warehouse(id)?;
        Ok(self
            .store
            .zones()
            .iter()
            .filter(|z| z.is_served_by(id))
            .collect())
    }
}
