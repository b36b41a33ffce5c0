//! Geofence zones, per-pair state and transition alerts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinate, DeliveryId, DriverId};

/// Circular zone attached to a delivery that a driver is expected to reach
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeofenceZone {
    pub driver_id: DriverId,
    pub delivery_id: DeliveryId,
    pub center_lat: f64,
    pub center_long: f64,
    pub radius_km: f64,
    #[serde(default = "default_alerts_enabled")]
    pub alerts_enabled: bool,
}

fn default_alerts_enabled() -> bool {
    true
}

impl GeofenceZone {
    pub fn new(
        driver_id: DriverId,
        delivery_id: DeliveryId,
        center: Coordinate,
        radius_km: f64,
    ) -> Self {
        Self {
            driver_id,
            delivery_id,
            center_lat: center.lat,
            center_long: center.lon,
            radius_km,
            alerts_enabled: true,
        }
    }

    /// Keep tracking state but stop emitting alerts
    pub fn silenced(mut self) -> Self {
        self.alerts_enabled = false;
        self
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.center_lat, self.center_long)
    }

    pub fn key(&self) -> (DriverId, DeliveryId) {
        (self.driver_id, self.delivery_id)
    }
}

/// Where a driver was last seen relative to a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeofenceState {
    /// No position evaluated yet
    #[default]
    Unknown,
    Inside,
    Outside,
}

impl GeofenceState {
    /// Classify a distance against a zone radius
    pub fn classify(distance_km: f64, radius_km: f64) -> Self {
        if distance_km <= radius_km {
            GeofenceState::Inside
        } else {
            GeofenceState::Outside
        }
    }
}

/// Record of a geofence state transition. Alerts are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub driver_id: DriverId,
    pub delivery_id: DeliveryId,
    pub from_state: GeofenceState,
    pub to_state: GeofenceState,
    pub distance_km: f64,

    /// Observation time of the position that caused the transition
    pub triggered_at: DateTime<Utc>,

    pub message: String,
}

impl Alert {
    pub fn transition(
        driver_id: DriverId,
        delivery_id: DeliveryId,
        from_state: GeofenceState,
        to_state: GeofenceState,
        distance_km: f64,
        triggered_at: DateTime<Utc>,
    ) -> Self {
        let message = match to_state {
            GeofenceState::Inside => "Driver is within delivery zone",
            GeofenceState::Outside => "Driver has left delivery zone",
            GeofenceState::Unknown => "Driver position unknown",
        };
        Self {
            driver_id,
            delivery_id,
            from_state,
            to_state,
            distance_km,
            triggered_at,
            message: message.to_string(),
        }
    }
}
