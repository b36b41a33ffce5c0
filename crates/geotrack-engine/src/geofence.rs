//! Per-(driver, delivery) geofence state machine.
//!
//! ```text
//! UNKNOWN --first evaluation--> INSIDE | OUTSIDE
//! INSIDE <--------crossing--------> OUTSIDE
//! ```
//!
//! Each pair lives in one `DashMap` entry; an evaluation is a single
//! read-modify-write under that entry's shard lock.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use geotrack_core::error::Result;
use geotrack_core::models::{Alert, DeliveryId, DriverId, GeofenceState, GeofenceZone, Position};
use geotrack_geo::haversine_km;
use geotrack_geo::validation::validate_zone;

type ZoneKey = (DriverId, DeliveryId);

#[derive(Debug)]
struct ZoneEntry {
    zone: GeofenceZone,
    state: GeofenceState,
    last_observed_at: Option<DateTime<Utc>>,
    alerts: Vec<Alert>,
}

/// Keyed geofence state table
#[derive(Debug, Default)]
pub struct GeofenceEngine {
    zones: DashMap<ZoneKey, ZoneEntry>,
}

impl GeofenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a zone. Replacing an existing zone resets its state and alert log.
    pub fn register_zone(&self, zone: GeofenceZone) -> Result<()> {
        validate_zone(&zone)?;

        let key = zone.key();
        let replaced = self
            .zones
            .insert(
                key,
                ZoneEntry {
                    zone,
                    state: GeofenceState::Unknown,
                    last_observed_at: None,
                    alerts: Vec::new(),
                },
            )
            .is_some();

        tracing::info!(
            driver_id = %key.0,
            delivery_id = %key.1,
            replaced,
            "Geofence zone registered"
        );
        Ok(())
    }

    /// Drop a zone together with its state and alerts
    pub fn discard_zone(
        &self,
        driver_id: DriverId,
        delivery_id: DeliveryId,
    ) -> Option<GeofenceZone> {
        let (_, entry) = self.zones.remove(&(driver_id, delivery_id))?;
        tracing::info!(
            driver_id = %driver_id,
            delivery_id = %delivery_id,
            final_state = ?entry.state,
            "Geofence zone discarded"
        );
        Some(entry.zone)
    }

    /// Drop every zone owned by a delivery, returning how many were removed
    pub fn discard_delivery(&self, delivery_id: DeliveryId) -> usize {
        let keys: Vec<ZoneKey> = self
            .zones
            .iter()
            .filter(|entry| entry.key().1 == delivery_id)
            .map(|entry| *entry.key())
            .collect();
        keys.into_iter()
            .filter(|(driver_id, delivery_id)| {
                self.discard_zone(*driver_id, *delivery_id).is_some()
            })
            .count()
    }

    pub fn zone(&self, driver_id: DriverId, delivery_id: DeliveryId) -> Option<GeofenceZone> {
        self.zones.get(&(driver_id, delivery_id)).map(|entry| entry.zone.clone())
    }

    /// Current state of a tracked pair, `None` when no zone is registered
    pub fn state(&self, driver_id: DriverId, delivery_id: DeliveryId) -> Option<GeofenceState> {
        self.zones.get(&(driver_id, delivery_id)).map(|entry| entry.state)
    }

    /// Alerts emitted for a pair, oldest first
    pub fn alerts(&self, driver_id: DriverId, delivery_id: DeliveryId) -> Option<Vec<Alert>> {
        self.zones.get(&(driver_id, delivery_id)).map(|entry| entry.alerts.clone())
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Classify a position against its delivery's zone.
    ///
    /// Returns an alert when the classification changed and the zone has
    /// alerts enabled. Positions without a delivery, without a zone, or older
    /// than the last evaluated one leave the table untouched.
    pub fn evaluate(&self, position: &Position) -> Option<Alert> {
        let delivery_id = position.delivery_id?;
        let mut entry = self.zones.get_mut(&(position.driver_id, delivery_id))?;

        if let Some(last) = entry.last_observed_at {
            if position.observed_at < last {
                tracing::debug!(
                    driver_id = %position.driver_id,
                    delivery_id = %delivery_id,
                    observed_at = %position.observed_at,
                    last_evaluated = %last,
                    "Ignoring out-of-order position for geofence"
                );
                return None;
            }
        }

        let distance_km = haversine_km(position.coordinate(), entry.zone.center());
        let next = GeofenceState::classify(distance_km, entry.zone.radius_km);
        let previous = entry.state;

        entry.last_observed_at = Some(position.observed_at);
        if next == previous {
            return None;
        }
        entry.state = next;

        if !entry.zone.alerts_enabled {
            tracing::debug!(
                driver_id = %position.driver_id,
                delivery_id = %delivery_id,
                from = ?previous,
                to = ?next,
                "Geofence transition with alerts disabled"
            );
            return None;
        }

        let alert = Alert::transition(
            position.driver_id,
            delivery_id,
            previous,
            next,
            distance_km,
            position.observed_at,
        );
        entry.alerts.push(alert.clone());

        tracing::info!(
            driver_id = %position.driver_id,
            delivery_id = %delivery_id,
            from = ?previous,
            to = ?next,
            distance_km,
            "Geofence transition"
        );
        Some(alert)
    }
}
