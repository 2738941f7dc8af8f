use crate::core::geometry::is_closed;
use crate::domain::model::{
    Order, OrderStatusLog, Proof, Rider, RiderLocation, RiderZone, Warehouse, Zone,
};
use crate::domain::ports::Storage;
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const BUILTIN_FIXTURES: &str = include_str!("../../fixtures/riyadh.json");

/// Seed data for the in-memory store, also the shape of a state snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub warehouses: Vec<Warehouse>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub riders: Vec<Rider>,
    #[serde(default)]
    pub rider_zones: Vec<RiderZone>,
    #[serde(default)]
    pub rider_locations: Vec<RiderLocation>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub status_logs: Vec<OrderStatusLog>,
    #[serde(default)]
    pub proofs: Vec<Proof>,
}

impl Fixtures {
    /// Riyadh demo data: 3 warehouses, 6 zones, 8 riders and a day of orders.
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_FIXTURES).expect("built-in fixtures are valid JSON")
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let fixtures: Self = serde_json::from_str(content)?;
        fixtures.validate()?;
        Ok(fixtures)
    }

    /// 從儲存層載入 JSON fixture 檔案
    pub async fn load<S: Storage + ?Sized>(storage: &S, path: &str) -> Result<Self> {
        let bytes = storage.read_file(path).await?;
        let content = String::from_utf8_lossy(&bytes);
        let fixtures = Self::from_json_str(&content)?;
        tracing::info!(
            "📁 Loaded fixtures from {}: {} zones, {} orders",
            path,
            fixtures.zones.len(),
            fixtures.orders.len()
        );
        Ok(fixtures)
    }

    pub async fn save<S: Storage + ?Sized>(&self, storage: &S, path: &str) -> Result<()> {
        let data = serde_json::to_vec_pretty(self)?;
        storage.write_file(path, &data).await?;
        tracing::info!("💾 Snapshot written to {}", path);
        Ok(())
    }
}

fn check_unique<'a>(field: &str, ids: impl Iterator<Item = &'a str>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(AdminError::validation(field, format!("duplicate id '{}'", id)));
        }
    }
    Ok(())
}

impl Validate for Fixtures {
    /// Zone rings must be single and closed. Degenerate rings are accepted.
    fn validate(&self) -> Result<()> {
        check_unique("warehouses", self.warehouses.iter().map(|w| w.id.as_str()))?;
        check_unique("zones", self.zones.iter().map(|z| z.id.as_str()))?;
        check_unique("riders", self.riders.iter().map(|r| r.id.as_str()))?;
        check_unique("orders", self.orders.iter().map(|o| o.id.as_str()))?;

        for zone in &self.zones {
            if zone.polygon.ring_count() != 1 {
                return Err(AdminError::validation(
                    "zones.polygon",
                    format!(
                        "zone '{}' has {} rings; exactly one outer ring is supported",
                        zone.id,
                        zone.polygon.ring_count()
                    ),
                ));
            }
            if !is_closed(zone.polygon.outer_ring()) {
                return Err(AdminError::validation(
                    "zones.polygon",
                    format!("zone '{}' ring is not closed", zone.id),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_fixtures_are_valid() {
        let fixtures = Fixtures::builtin();
        assert!(fixtures.validate().is_ok());
        assert_eq!(fixtures.warehouses.len(), 3);
        assert_eq!(fixtures.zones.len(), 6);
        assert_eq!(fixtures.riders.len(), 8);
        assert_eq!(fixtures.zones[0].polygon.outer_ring()[0], [46.66, 24.81]);
    }

    #[test]
    fn test_rejects_open_ring() {
        let content = r#"{
            "zones": [{
                "id": "zone-x",
                "name": "Open",
                "warehouse_ids": [],
                "polygon": { "type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1]]] },
                "created_at": "2024-01-01T00:00:00Z"
            }]
        }"#;
        assert!(matches!(
            Fixtures::from_json_str(content),
            Err(AdminError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_geometry_type() {
        let content = r#"{
            "zones": [{
                "id": "zone-x",
                "name": "Line",
                "warehouse_ids": [],
                "polygon": { "type": "LineString", "coordinates": [[[0, 0], [1, 0]]] },
                "created_at": "2024-01-01T00:00:00Z"
            }]
        }"#;
        assert!(matches!(
            Fixtures::from_json_str(content),
            Err(AdminError::SerializationError(_))
        ));
    }

    struct MemoryStorage {
        files: std::sync::Mutex<std::collections::HashMap<String, Vec<u8>>>,
    }

    #[async_trait::async_trait]
    impl Storage for MemoryStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            self.files.lock().unwrap().get(path).cloned().ok_or_else(|| {
                AdminError::IoError(std::io::Error::new(std::io::ErrorKind::NotFound, path.to_string()))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_save_then_load_through_storage() {
        let storage = MemoryStorage {
            files: Default::default(),
        };
        let fixtures = Fixtures::builtin();

        tokio_test::block_on(fixtures.save(&storage, "snapshot.json")).unwrap();
        let loaded = tokio_test::block_on(Fixtures::load(&storage, "snapshot.json")).unwrap();
        assert_eq!(loaded.zones, fixtures.zones);

        let missing = tokio_test::block_on(Fixtures::load(&storage, "missing.json"));
        assert!(matches!(missing, Err(AdminError::IoError(_))));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut fixtures = Fixtures::builtin();
        let dup = fixtures.orders[0].clone();
        fixtures.orders.push(dup);
        assert!(fixtures.validate().is_err());
    }
}
