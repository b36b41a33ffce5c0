//! Greedy single-pass clustering of driver positions.
//!
//! Positions are sorted by latitude, then longitude, then driver id. The
//! first unclustered position seeds a cluster, which absorbs every later
//! unclustered position within `max_radius_km` of its running centroid.
//! Worst case is quadratic in the number of candidates, which are bounded by
//! the online drivers of one metro area.

use geotrack_core::error::Result;
use geotrack_core::models::{Coordinate, DriverCluster, DriverId, Position};
use geotrack_geo::haversine_km;
use geotrack_geo::validation::validate_radius;
use geotrack_store::LocationStore;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Cluster a set of positions. Output order follows the seed order.
pub fn cluster_positions(positions: &[Position], max_radius_km: f64) -> Result<Vec<DriverCluster>> {
    validate_radius("max_radius_km", max_radius_km)?;

    let mut sorted: Vec<&Position> = positions.iter().collect();
    sorted.sort_by(|a, b| {
        a.latitude
            .total_cmp(&b.latitude)
            .then(a.longitude.total_cmp(&b.longitude))
            .then(a.driver_id.cmp(&b.driver_id))
    });

    let mut clustered = vec![false; sorted.len()];
    let mut clusters = Vec::new();

    for seed in 0..sorted.len() {
        if clustered[seed] {
            continue;
        }
        clustered[seed] = true;

        let mut members = vec![sorted[seed].driver_id];
        let mut center = sorted[seed].coordinate();

        for candidate in (seed + 1)..sorted.len() {
            if clustered[candidate] {
                continue;
            }
            let coord = sorted[candidate].coordinate();
            if haversine_km(center, coord) <= max_radius_km {
                clustered[candidate] = true;
                members.push(sorted[candidate].driver_id);

                // Running mean over the absorbed members
                let n = members.len() as f64;
                center = Coordinate::new(
                    center.lat + (coord.lat - center.lat) / n,
                    center.lon + (coord.lon - center.lon) / n,
                );
            }
        }

        clusters.push(DriverCluster {
            cluster_id: format!("cluster-{}", clusters.len() + 1),
            center_lat: center.lat,
            center_long: center.lon,
            member_driver_ids: members,
            radius_km: max_radius_km,
        });
    }

    Ok(clusters)
}

/// Clusters drivers using a snapshot of the location store
#[derive(Debug, Clone)]
pub struct ClusteringEngine {
    store: Arc<LocationStore>,
}

impl ClusteringEngine {
    pub fn new(store: Arc<LocationStore>) -> Self {
        Self { store }
    }

    /// Cluster the latest positions of the given drivers.
    ///
    /// Duplicate ids are ignored, as are drivers with no known position.
    pub fn cluster(
        &self,
        candidates: &[DriverId],
        max_radius_km: f64,
    ) -> Result<Vec<DriverCluster>> {
        validate_radius("max_radius_km", max_radius_km)?;

        let unique: BTreeSet<DriverId> = candidates.iter().copied().collect();
        let positions: Vec<Position> =
            unique.into_iter().filter_map(|id| self.store.latest(id)).collect();

        tracing::debug!(
            candidates = candidates.len(),
            located = positions.len(),
            max_radius_km,
            "Clustering drivers"
        );
        cluster_positions(&positions, max_radius_km)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn driver(id: u64, lat: f64, lon: f64) -> Position {
        Position::new(DriverId(id), lat, lon, Utc::now())
    }

    #[test]
    fn test_three_drivers_two_clusters() {
        let positions = vec![
            driver(1, 9.00, 38.70),
            driver(2, 9.001, 38.701),
            driver(3, 20.0, 40.0),
        ];

        let clusters = cluster_positions(&positions, 1.0).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].member_driver_ids, vec![DriverId(1), DriverId(2)]);
        assert_eq!(clusters[1].member_driver_ids, vec![DriverId(3)]);
        assert_eq!(clusters[0].cluster_id, "cluster-1");
        assert!((clusters[0].center_lat - 9.0005).abs() < 1e-9);
        assert!((clusters[0].center_long - 38.7005).abs() < 1e-9);
        assert_eq!(clusters[1].radius_km, 1.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(cluster_positions(&[], 5.0).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let positions = vec![driver(1, 9.0, 38.7)];
        assert!(cluster_positions(&positions, 0.0).unwrap_err().is_validation());
        assert!(cluster_positions(&positions, f64::NAN).is_err());
    }

    #[test]
    fn test_every_driver_assigned_once() {
        let positions = vec![
            driver(1, 9.000, 38.7),
            driver(2, 9.008, 38.7),
            driver(3, 9.0, 38.7085),
        ];
        let clusters = cluster_positions(&positions, 1.0).unwrap();
        let mut members: Vec<DriverId> =
            clusters.iter().flat_map(|c| c.member_driver_ids.iter().copied()).collect();
        members.sort();
        assert_eq!(members, vec![DriverId(1), DriverId(2), DriverId(3)]);
    }

    #[test]
    fn test_engine_uses_latest_positions() {
        let store = Arc::new(LocationStore::new());
        store.ingest(driver(1, 9.0, 38.7)).unwrap();
        store.ingest(driver(2, 9.001, 38.701)).unwrap();

        let engine = ClusteringEngine::new(store);
        let clusters = engine
            .cluster(&[DriverId(2), DriverId(1), DriverId(1), DriverId(99)], 1.0)
            .unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].driver_count(), 2);
    }
}
