//! Property tests for clustering, heatmaps and geofence state

use chrono::{DateTime, TimeZone, Utc};
use geotrack_core::models::{
    Coordinate, DeliveryId, DeliveryRecord, DriverId, GeofenceState, GeofenceZone, Position,
    TimeRange,
};
use geotrack_engine::{aggregate, cluster_positions, GeofenceEngine};
use geotrack_geo::haversine_km;
use proptest::prelude::*;

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

fn positions() -> impl Strategy<Value = Vec<Position>> {
    prop::collection::vec((8.9f64..9.1, 38.6f64..38.8), 0..40).prop_map(|coords| {
        coords
            .into_iter()
            .enumerate()
            .map(|(i, (lat, lon))| Position::new(DriverId(i as u64), lat, lon, at(0)))
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_clustering_ignores_input_order(input in positions(), radius in 0.1f64..5.0) {
        let forward = cluster_positions(&input, radius).unwrap();
        let mut reversed_input = input.clone();
        reversed_input.reverse();
        let reversed = cluster_positions(&reversed_input, radius).unwrap();

        prop_assert_eq!(&forward, &reversed);
        let total: usize = forward.iter().map(|c| c.driver_count()).sum();
        prop_assert_eq!(total, input.len());
    }

    #[test]
    fn prop_heatmap_intensity_bounds(
        groups in prop::collection::vec((0usize..4, 0usize..3, 0i64..100), 0..60)
    ) {
        let records: Vec<DeliveryRecord> = groups
            .iter()
            .enumerate()
            .map(|(i, (region, subregion, secs))| DeliveryRecord {
                delivery_id: DeliveryId(i as u64),
                region: format!("region-{}", region),
                subregion: format!("{:02}", subregion),
                completed_at: at(*secs),
                dropoff: None,
            })
            .collect();

        let cells = aggregate(&records, TimeRange::new(at(0), at(100))).unwrap();
        prop_assert_eq!(cells.is_empty(), records.is_empty());
        for cell in &cells {
            prop_assert!((0.0..=1.0).contains(&cell.intensity));
        }
        if let Some(first) = cells.first() {
            prop_assert_eq!(first.intensity, 1.0);
        }
        prop_assert!(cells.windows(2).all(|w| w[0].delivery_count >= w[1].delivery_count));
    }

    #[test]
    fn prop_geofence_state_follows_newest_position(
        reports in prop::collection::vec((8.95f64..9.05, 0i64..50), 1..30)
    ) {
        let engine = GeofenceEngine::new();
        let center = Coordinate::new(9.0, 38.7);
        engine.register_zone(GeofenceZone::new(DriverId(1), DeliveryId(1), center, 2.0)).unwrap();

        let mut newest: Option<(i64, f64)> = None;
        for (lat, secs) in &reports {
            let position =
                Position::new(DriverId(1), *lat, 38.7, at(*secs)).with_delivery(DeliveryId(1));
            engine.evaluate(&position);
            if newest.map_or(true, |(t, _)| *secs >= t) {
                newest = Some((*secs, *lat));
            }
        }

        let (_, lat) = newest.unwrap();
        let distance = haversine_km(Coordinate::new(lat, 38.7), center);
        let expected = GeofenceState::classify(distance, 2.0);
        prop_assert_eq!(engine.state(DriverId(1), DeliveryId(1)), Some(expected));
    }
}
