use crate::core::ids::next_id;
use crate::domain::model::{Rider, RiderFilters, RiderLocation, RiderZone};
use crate::domain::ports::{RiderRepository, ZoneRepository};
use crate::utils::error::{AdminError, Result};
use std::collections::HashSet;

pub struct RiderService<'a, S> {
    store: &'a mut S,
}

impl<'a, S> RiderService<'a, S>
where
    S: RiderRepository + ZoneRepository,
{
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub fn list_riders(&self, filters: &RiderFilters) -> Vec<&Rider> {
        let in_zone: Option<HashSet<&str>> = filters.zone_id.as_deref().map(|zone_id| {
            self.store
                .rider_zones()
                .iter()
                .filter(|rz| rz.zone_id == zone_id)
                .map(|rz| rz.rider_id.as_str())
                .collect()
        });

        self.store
            .riders()
            .iter()
            .filter(|r| in_zone.as_ref().map(|ids| ids.contains(r.id.as_str())).unwrap_or(true))
            .filter(|r| !filters.active_only || r.is_active)
            .collect()
    }

    pub fn get_rider(&self, id: &str) -> Result<&Rider> {
        self.store
            .rider(id)
            .ok_or_else(|| AdminError::not_found("Rider", id))
    }

    pub fn rider_zones(&self, rider_id: &str) -> Vec<&RiderZone> {
        self.store
            .rider_zones()
            .iter()
            .filter(|rz| rz.rider_id == rider_id)
            .collect()
    }

    pub fn rider_location(&self, rider_id: &str) -> Option<&RiderLocation> {
        self.store.rider_location(rider_id)
    }

    /// Returns false when the rider already covers the zone.
    pub fn add_rider_zone(&mut self, rider_id: &str, zone_id: &str) -> Result<bool> {
        Ok(self.bulk_add_rider_to_zones(rider_id, &[zone_id.to_string()])? == 1)
    }

    pub fn remove_rider_zone(&mut self, rider_id: &str, zone_id: &str) -> bool {
        self.bulk_remove_rider_from_zones(rider_id, &[zone_id.to_string()]) == 1
    }

    pub fn bulk_add_rider_to_zones(&mut self, rider_id: &str, zone_ids: &[String]) -> Result<usize> {
        self.get_rider(rider_id)?;
        if let Some(missing) = zone_ids.iter().find(|id| self.store.zone(id).is_none()) {
            return Err(AdminError::not_found("Zone", missing.as_str()));
        }

        let mut existing: HashSet<String> = self
            .rider_zones(rider_id)
            .into_iter()
            .map(|rz| rz.zone_id.clone())
            .collect();

        let mut added = 0;
        for zone_id in zone_ids {
            if !existing.insert(zone_id.clone()) {
                continue;
            }
            self.store.add_rider_zone(RiderZone {
                id: next_id("rz"),
                rider_id: rider_id.to_string(),
                zone_id: zone_id.clone(),
            });
            added += 1;
        }
        tracing::info!("✅ Rider {} added to {} zone(s)", rider_id, added);
        Ok(added)
    }

    pub fn bulk_remove_rider_from_zones(&mut self, rider_id: &str, zone_ids: &[String]) -> usize {
        let removed = self.store.remove_rider_zones(rider_id, zone_ids);
        tracing::info!("✅ Rider {} removed from {} zone(s)", rider_id, removed);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fixtures::Fixtures;
    use crate::adapters::memory::InMemoryStore;

    #[test]
    fn test_add_existing_pair_is_noop() {
        let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
        let before = store.rider_zones().len();
        let mut service = RiderService::new(&mut store);
        assert!(!service.add_rider_zone("rider-001", "zone-001").unwrap());
        assert!(service.add_rider_zone("rider-001", "zone-003").unwrap());
        assert_eq!(store.rider_zones().len(), before + 1);
    }

    #[test]
    fn test_bulk_add_skips_duplicates_in_request() {
        let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
        let mut service = RiderService::new(&mut store);
        let zones = vec!["zone-005".to_string(), "zone-005".to_string(), "zone-006".to_string()];
        assert_eq!(service.bulk_add_rider_to_zones("rider-002", &zones).unwrap(), 2);
        assert!(service
            .bulk_add_rider_to_zones("rider-002", &["zone-404".to_string()])
            .is_err());
    }

    #[test]
    fn test_filters() {
        let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
        let service = RiderService::new(&mut store);
        let active = service.list_riders(&RiderFilters {
            active_only: true,
            ..Default::default()
        });
        assert!(active.iter().all(|r| r.is_active));

        let zone_riders = service.list_riders(&RiderFilters {
            zone_id: Some("zone-001".to_string()),
            active_only: false,
        });
        let ids: Vec<&str> = zone_riders.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["rider-001", "rider-006"]);
    }

    #[test]
    fn test_remove_rider_zone() {
        let mut store = InMemoryStore::from_fixtures(Fixtures::builtin());
        let mut service = RiderService::new(&mut store);
        assert!(service.remove_rider_zone("rider-001", "zone-002"));
        assert!(!service.remove_rider_zone("rider-001", "zone-002"));
    }
}
