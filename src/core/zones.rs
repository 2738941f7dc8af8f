use crate::core::edit_session::ZoneEditSession;
use crate::core::geometry;
use crate::domain::model::{Point, Position, Rider, Zone};
use crate::domain::ports::{RiderRepository, WarehouseRepository, ZoneRepository};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_point};
use std::collections::HashSet;

pub struct ZoneService<'a, S> {
    store: &'a mut S,
}

impl<'a, S> ZoneService<'a, S>
where
    S: ZoneRepository + WarehouseRepository + RiderRepository,
{
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    pub fn list_zones(&self) -> &[Zone] {
        self.store.zones()
    }

    pub fn get_zone(&self, id: &str) -> Result<&Zone> {
        self.store
            .zone(id)
            .ok_or_else(|| AdminError::not_found("Zone", id))
    }

    /// 依據投放的座標自動偵測所屬區域
    pub fn locate(&self, point: &Point) -> Result<Option<&Zone>> {
        validate_point(point)?;
        let found = geometry::find_containing_zone(point, self.store.zones());
        match found {
            Some(zone) => tracing::debug!("({}, {}) falls in {}", point.lng, point.lat, zone.id),
            None => tracing::debug!("({}, {}) is outside every zone", point.lng, point.lat),
        }
        Ok(found)
    }

    pub fn zones_at(&self, point: &Point) -> Result<Vec<&Zone>> {
        validate_point(point)?;
        Ok(geometry::zones_containing(point, self.store.zones()))
    }

    pub fn overlaps(&self) -> Vec<(&Zone, &Zone)> {
        geometry::overlapping_zones(self.store.zones())
    }

    pub fn zone_center(&self, id: &str) -> Result<Point> {
        let zone = self.get_zone(id)?;
        geometry::derive_centroid_approx(zone.polygon.outer_ring()).ok_or_else(|| {
            AdminError::validation("polygon", format!("zone '{}' has an empty ring", id))
        })
    }

    pub fn rename_zone(&mut self, id: &str, name: &str) -> Result<Zone> {
        validate_non_empty_string("name", name)?;
        let mut zone = self.get_zone(id)?.clone();
        zone.name = name.trim().to_string();
        self.store.save_zone(zone.clone());
        tracing::info!("✅ Zone {} renamed to '{}'", id, zone.name);
        Ok(zone)
    }

    /// Whole-ring replacement. On error the stored zone is untouched.
    pub fn replace_boundary(&mut self, id: &str, raw: &[Position]) -> Result<Zone> {
        let current = self.get_zone(id)?;
        let updated = match geometry::apply_edited_ring(current, raw) {
            Ok(zone) => zone,
            Err(e) => {
                tracing::warn!("❌ Boundary update for zone {} rejected: {}", id, e);
                return Err(e);
            }
        };
        self.store.save_zone(updated.clone());
        tracing::info!(
            "✅ Zone {} boundary replaced ({} ring positions)",
            id,
            updated.polygon.outer_ring().len()
        );
        Ok(updated)
    }

    pub fn begin_edit(&self, id: &str) -> Result<ZoneEditSession> {
        let zone = self.get_zone(id)?;
        let mut session = ZoneEditSession::new(id);
        session.start(zone)?;
        Ok(session)
    }

    /// Commits the session's draft. The session ends only when the ring is
    /// accepted; after a rejection it stays open for another try or a cancel.
    pub fn commit_edit(&mut self, session: &mut ZoneEditSession) -> Result<Zone> {
        let draft = session.draft()?.to_vec();
        let zone = self.replace_boundary(session.zone_id(), &draft)?;
        session.finish();
        Ok(zone)
    }

    pub fn delete_zones(&mut self, ids: &[String]) -> usize {
        let removed = self.store.delete_zones(ids);
        tracing::info!("🗑️ Deleted {} zone(s)", removed);
        removed
    }

    pub fn bulk_add_warehouse(&mut self, zone_ids: &[String], warehouse_id: &str) -> Result<usize> {
        if self.store.warehouse(warehouse_id).is_none() {
            return Err(AdminError::not_found("Warehouse", warehouse_id));
        }
        let targets: HashSet<&str> = zone_ids.iter().map(String::as_str).collect();
        let changed: Vec<Zone> = self
            .store
            .zones()
            .iter()
            .filter(|z| targets.contains(z.id.as_str()) && !z.is_served_by(warehouse_id))
            .cloned()
            .map(|mut z| {
                z.warehouse_ids.push(warehouse_id.to_string());
                z
            })
            .collect();

        let count = changed.len();
        for zone in changed {
            self.store.save_zone(zone);
        }
        tracing::info!("✅ Warehouse {} added to {} zone(s)", warehouse_id, count);
        Ok(count)
    }

    pub fn bulk_remove_warehouse(&mut self, zone_ids: &[String], warehouse_id: &str) -> usize {
        let targets: HashSet<&str> = zone_ids.iter().map(String::as_str).collect();
        let changed: Vec<Zone> = self
            .store
            .zones()
            .iter()
            .filter(|z| targets.contains(z.id.as_str()) && z.is_served_by(warehouse_id))
            .cloned()
            .map(|mut z| {
                z.warehouse_ids.retain(|w| w != warehouse_id);
                z
            })
            .collect();

        let count = changed.len();
        for zone in changed {
            self.store.save_zone(zone);
        }
        tracing::info!("✅ Warehouse {} removed from {} zone(s)", warehouse_id, count);
        count
    }

    pub fn assigned_riders(&self, zone_id: &str) -> Result<Vec<&Rider>> {
        self.get_zone(zone_id)?;
        let ids = self.covering_rider_ids(zone_id);
        Ok(self
            .store
            .riders()
            .iter()
            .filter(|r| ids.contains(r.id.as_str()))
            .collect())
    }

    /// Riders not yet covering the zone whose home warehouse serves it.
    pub fn eligible_riders(&self, zone_id: &str) -> Result<Vec<&Rider>> {
        let zone = self.get_zone(zone_id)?;
        let ids = self.covering_rider_ids(zone_id);
        Ok(self
            .store
            .riders()
            .iter()
            .filter(|r| !ids.contains(r.id.as_str()))
            .filter(|r| {
                r.warehouse_id
                    .as_deref()
                    .map(|w| zone.is_served_by(w))
                    .unwrap_or(false)
            })
            .collect())
    }

    fn covering_rider_ids(&self, zone_id: &str) -> HashSet<&str> {
        self.store
            .rider_zones()
            .iter()
            .filter(|rz| rz.zone_id == zone_id)
            .map(|rz| rz.rider_id.as_str())
            .collect()
    }
}
