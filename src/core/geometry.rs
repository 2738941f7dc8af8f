//! Zone geometry: point-in-zone lookup, ring normalization for edited
//! boundaries, and overlap queries between zones.
//!
//! Boundary rule: a point lying exactly on an edge or a vertex of a zone's
//! outer ring is inside that zone.

use crate::domain::model::{Point, PolygonGeometry, Position, Zone};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::validate_coordinate;
use geo::{Intersects, LineString, Polygon, Relate};

fn to_geo_polygon(ring: &[Position]) -> Polygon<f64> {
    Polygon::new(LineString::from(ring.to_vec()), vec![])
}

/// Containment test against the outer ring, boundary inclusive.
///
/// Degenerate rings give whatever answer the underlying test gives; they are
/// never an error.
pub fn polygon_contains(polygon: &PolygonGeometry, point: &Point) -> bool {
    let ring = polygon.outer_ring();
    if ring.is_empty() {
        return false;
    }
    to_geo_polygon(ring).intersects(&geo::Point::new(point.lng, point.lat))
}

/// First zone, in slice order, whose polygon contains `point`.
///
/// `None` means the point is unassigned. Callers must not substitute a default zone.
pub fn find_containing_zone<'z>(point: &Point, zones: &'z [Zone]) -> Option<&'z Zone> {
    zones.iter().find(|zone| polygon_contains(&zone.polygon, point))
}

/// Every zone containing `point`, in slice order.
pub fn zones_containing<'z>(point: &Point, zones: &'z [Zone]) -> Vec<&'z Zone> {
    zones
        .iter()
        .filter(|zone| polygon_contains(&zone.polygon, point))
        .collect()
}

/// Pairs of zones whose interiors intersect. Zones that only share an edge or
/// a corner are not reported.
pub fn overlapping_zones(zones: &[Zone]) -> Vec<(&Zone, &Zone)> {
    let polygons: Vec<Polygon<f64>> = zones
        .iter()
        .map(|zone| to_geo_polygon(zone.polygon.outer_ring()))
        .collect();

    let mut pairs = Vec::new();
    for i in 0..zones.len() {
        for j in (i + 1)..zones.len() {
            if zones[i].polygon.outer_ring().is_empty() || zones[j].polygon.outer_ring().is_empty() {
                continue;
            }
            let matrix = polygons[i].relate(&polygons[j]);
            if matrix.is_intersects() && !matrix.is_touches() {
                pairs.push((&zones[i], &zones[j]));
            }
        }
    }
    pairs
}

/// Plain average of every ring position, closing vertex included. Only good
/// for centering a map view.
pub fn derive_centroid_approx(ring: &[Position]) -> Option<Point> {
    if ring.is_empty() {
        return None;
    }
    let n = ring.len() as f64;
    let (sum_lng, sum_lat) = ring
        .iter()
        .fold((0.0, 0.0), |(lng, lat), p| (lng + p[0], lat + p[1]));
    Some(Point::new(sum_lng / n, sum_lat / n))
}

pub fn is_closed(ring: &[Position]) -> bool {
    ring.len() >= 2 && ring.first() == ring.last()
}

fn distinct_vertex_count(vertices: &[Position]) -> usize {
    let mut seen: Vec<Position> = Vec::with_capacity(vertices.len());
    for v in vertices {
        if !seen.contains(v) {
            seen.push(*v);
        }
    }
    seen.len()
}

/// Validates a raw vertex sequence from the editor and returns it as a closed ring.
///
/// An already closed ring comes back unchanged.
pub fn normalize_ring(raw: &[Position]) -> Result<Vec<Position>> {
    for v in raw {
        validate_coordinate(v[0], v[1])?;
    }

    let open = if is_closed(raw) {
        &raw[..raw.len() - 1]
    } else {
        raw
    };

    let distinct = distinct_vertex_count(open);
    if distinct < 3 {
        return Err(AdminError::InvalidRing {
            distinct_vertices: distinct,
        });
    }

    let mut ring = raw.to_vec();
    if !is_closed(&ring) {
        ring.push(ring[0]);
    }
    Ok(ring)
}

/// Returns a copy of `zone` whose outer ring is replaced by the normalized
/// `raw` sequence. `zone` itself is left alone, so a rejected edit costs nothing.
pub fn apply_edited_ring(zone: &Zone, raw: &[Position]) -> Result<Zone> {
    let ring = normalize_ring(raw)?;
    let mut updated = zone.clone();
    updated.polygon = PolygonGeometry::from_ring(ring);
    Ok(updated)
}
