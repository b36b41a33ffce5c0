//! Location types: coordinates, bounding boxes and driver positions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DeliveryId, DriverId};

/// A WGS 84 coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Axis-aligned latitude/longitude box, inclusive on every edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    /// Check whether a coordinate falls inside the box
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.lat >= self.min_lat
            && coord.lat <= self.max_lat
            && coord.lon >= self.min_lon
            && coord.lon <= self.max_lon
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new((self.min_lat + self.max_lat) / 2.0, (self.min_lon + self.max_lon) / 2.0)
    }
}

/// A single location report from a driver's device.
///
/// Positions are never mutated after creation; a newer report for the same
/// driver supersedes the older one in the location store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub driver_id: DriverId,

    /// Delivery being worked on when the position was reported
    #[serde(default)]
    pub delivery_id: Option<DeliveryId>,

    pub latitude: f64,
    pub longitude: f64,

    #[serde(default)]
    pub speed_kmh: Option<f64>,

    #[serde(default)]
    pub heading_degrees: Option<f64>,

    #[serde(default)]
    pub accuracy_meters: Option<f64>,

    /// Device-side observation time, used for ordering
    pub observed_at: DateTime<Utc>,
}

impl Position {
    /// Create a position without delivery or motion metadata
    pub fn new(
        driver_id: DriverId,
        latitude: f64,
        longitude: f64,
        observed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            driver_id,
            delivery_id: None,
            latitude,
            longitude,
            speed_kmh: None,
            heading_degrees: None,
            accuracy_meters: None,
            observed_at,
        }
    }

    pub fn with_delivery(mut self, delivery_id: DeliveryId) -> Self {
        self.delivery_id = Some(delivery_id);
        self
    }

    pub fn with_motion(mut self, speed_kmh: f64, heading_degrees: f64) -> Self {
        self.speed_kmh = Some(speed_kmh);
        self.heading_degrees = Some(heading_degrees);
        self
    }

    pub fn with_accuracy(mut self, accuracy_meters: f64) -> Self {
        self.accuracy_meters = Some(accuracy_meters);
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Result of offering a position to the location store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestOutcome {
    Accepted,
    Stale,
}

impl IngestOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, IngestOutcome::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_contains_edges() {
        let bbox = BoundingBox::new(8.9, 38.6, 9.1, 38.8);
        assert!(bbox.contains(Coordinate::new(9.0, 38.7)));
        assert!(bbox.contains(Coordinate::new(8.9, 38.6)));
        assert!(bbox.contains(Coordinate::new(9.1, 38.8)));
        assert!(!bbox.contains(Coordinate::new(9.2, 38.7)));
        assert!(!bbox.contains(Coordinate::new(9.0, 38.5)));
    }

    #[test]
    fn test_position_deserializes_without_optional_fields() {
        let json = r#"{
            "driver_id": 7,
            "latitude": 9.0,
            "longitude": 38.7,
            "observed_at": "2024-05-01T10:00:00Z"
        }"#;
        let position: Position = serde_json::from_str(json).unwrap();
        assert_eq!(position.driver_id, DriverId(7));
        assert!(position.delivery_id.is_none());
        assert!(position.speed_kmh.is_none());
    }

    #[test]
    fn test_ingest_outcome_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&IngestOutcome::Stale).unwrap(), "\"stale\"");
    }
}
