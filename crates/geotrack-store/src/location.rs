//! Latest-position store with a sharded grid index.
//!
//! Each driver's entry is updated under its own shard lock, so concurrent
//! reports for unrelated drivers never contend and a reader always sees
//! either the old or the new position of a driver, never a mix.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use geotrack_core::error::Result;
use geotrack_core::models::{BoundingBox, Coordinate, DriverId, IngestOutcome, Position};
use geotrack_geo::validation::{
    validate_bbox, validate_coordinate, validate_position, validate_radius,
};
use geotrack_geo::{haversine_km, search_boxes_around, GridCell};
use serde::Serialize;
use std::collections::HashSet;

/// Default side length of an index cell in degrees (about 1.1 km)
pub const DEFAULT_CELL_DEGREES: f64 = 0.01;

/// Box queries covering more cells than this scan every driver instead
const MAX_INDEXED_CELLS: u64 = 4096;

/// A driver found by a radius query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyDriver {
    pub position: Position,
    pub distance_km: f64,
}

/// Latest known position per driver
#[derive(Debug)]
pub struct LocationStore {
    positions: DashMap<DriverId, Position>,
    cells: DashMap<GridCell, HashSet<DriverId>>,
    cell_degrees: f64,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::with_cell_degrees(DEFAULT_CELL_DEGREES)
    }

    /// Create a store whose index uses `cell_degrees` sized cells
    pub fn with_cell_degrees(cell_degrees: f64) -> Self {
        let cell_degrees = if cell_degrees.is_finite() && cell_degrees > 0.0 {
            cell_degrees
        } else {
            DEFAULT_CELL_DEGREES
        };
        Self {
            positions: DashMap::new(),
            cells: DashMap::new(),
            cell_degrees,
        }
    }

    /// Record a position if it is not older than the stored one.
    ///
    /// Reports with the same `observed_at` as the stored position are applied
    /// in arrival order.
    pub fn ingest(&self, position: Position) -> Result<IngestOutcome> {
        validate_position(&position)?;

        let driver_id = position.driver_id;
        let new_cell = GridCell::of(position.coordinate(), self.cell_degrees);

        // Holding the entry keeps the compare and the write atomic per driver
        let mut entry = self.positions.entry(driver_id).or_insert_with(|| position.clone());
        let previous = if entry.value() == &position {
            None
        } else if entry.observed_at > position.observed_at {
            tracing::debug!(
                driver_id = %driver_id,
                stored = %entry.observed_at,
                incoming = %position.observed_at,
                "Discarding stale position"
            );
            return Ok(IngestOutcome::Stale);
        } else {
            Some(std::mem::replace(entry.value_mut(), position))
        };

        // Index the new cell before leaving the old one so box queries never miss the driver
        self.cells.entry(new_cell).or_default().insert(driver_id);
        if let Some(previous) = previous {
            let old_cell = GridCell::of(previous.coordinate(), self.cell_degrees);
            if old_cell != new_cell {
                self.unindex(old_cell, driver_id);
            }
        }
        drop(entry);

        Ok(IngestOutcome::Accepted)
    }

    /// Latest position for a driver
    pub fn latest(&self, driver_id: DriverId) -> Option<Position> {
        self.positions.get(&driver_id).map(|p| p.value().clone())
    }

    /// Drivers whose latest position lies inside `bbox`, ordered by driver id
    pub fn within(&self, bbox: &BoundingBox) -> Result<Vec<Position>> {
        validate_bbox(bbox)?;

        let mut found: Vec<Position> =
            if GridCell::covering_count(bbox, self.cell_degrees) > MAX_INDEXED_CELLS {
                self.positions
                    .iter()
                    .filter(|p| bbox.contains(p.coordinate()))
                    .map(|p| p.value().clone())
                    .collect()
            } else {
                let mut candidates = HashSet::new();
                for cell in GridCell::covering(bbox, self.cell_degrees) {
                    if let Some(ids) = self.cells.get(&cell) {
                        candidates.extend(ids.iter().copied());
                    }
                }
                candidates
                    .into_iter()
                    .filter_map(|id| self.latest(id))
                    .filter(|p| bbox.contains(p.coordinate()))
                    .collect()
            };

        found.sort_by_key(|p| p.driver_id);
        Ok(found)
    }

    /// Drivers within `radius_km` of `center`, nearest first.
    ///
    /// Circles crossing the antimeridian are searched on both sides.
    pub fn within_radius(
        &self,
        center: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<NearbyDriver>> {
        validate_coordinate(center.lat, center.lon)?;
        validate_radius("radius_km", radius_km)?;

        let mut nearby = Vec::new();
        for bbox in search_boxes_around(center, radius_km) {
            for position in self.within(&bbox)? {
                let distance_km = haversine_km(center, position.coordinate());
                if distance_km <= radius_km {
                    nearby.push(NearbyDriver {
                        position,
                        distance_km,
                    });
                }
            }
        }

        nearby.sort_by(|a, b| {
            a.distance_km
                .total_cmp(&b.distance_km)
                .then(a.position.driver_id.cmp(&b.position.driver_id))
        });
        Ok(nearby)
    }

    /// Copy of every latest position, ordered by driver id
    pub fn snapshot(&self) -> Vec<Position> {
        let mut positions: Vec<Position> =
            self.positions.iter().map(|p| p.value().clone()).collect();
        positions.sort_by_key(|p| p.driver_id);
        positions
    }

    /// Latest positions observed at or after `since`
    pub fn online(&self, since: DateTime<Utc>) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .positions
            .iter()
            .filter(|p| p.observed_at >= since)
            .map(|p| p.value().clone())
            .collect();
        positions.sort_by_key(|p| p.driver_id);
        positions
    }

    /// Forget a driver, returning its last position
    pub fn remove(&self, driver_id: DriverId) -> Option<Position> {
        let (_, position) = self.positions.remove(&driver_id)?;
        self.unindex(GridCell::of(position.coordinate(), self.cell_degrees), driver_id);
        Some(position)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn unindex(&self, cell: GridCell, driver_id: DriverId) {
        if let Some(mut ids) = self.cells.get_mut(&cell) {
            ids.remove(&driver_id);
        }
        self.cells.remove_if(&cell, |_, ids| ids.is_empty());
    }
}

impl Default for LocationStore {
    fn default() -> Self {
        Self::new()
    }
}
