//! Ingestion and query orchestration.
//!
//! Reports for one driver are applied by a single writer at a time, so the
//! store update, the published location and the geofence evaluation all
//! follow the same order. Unrelated drivers proceed in parallel.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use geotrack_core::config::LayeredConfig;
use geotrack_core::error::{GeotrackError, Result};
use geotrack_core::models::{
    Alert, BoundingBox, ClusterSummary, DeliveryId, DeliveryStatusUpdate, DriverId, EventPayload,
    GeofenceZone, HeatmapSummary, IngestOutcome, Position, Route, RouteRequest, Subject,
};
use geotrack_core::ports::{AlertNotifier, DeliveryDirectory, DeliveryHistory};
use geotrack_geo::validation::{validate_bbox, validate_position, validate_radius};
use geotrack_store::LocationStore;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cluster::ClusteringEngine;
use crate::dispatch::Dispatcher;
use crate::geofence::GeofenceEngine;
use crate::heatmap::{HeatmapAggregator, HeatmapQuery};
use crate::route::RoutePlanner;

/// Result of ingesting one position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    pub outcome: IngestOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
}

/// Dashboard clustering request
#[derive(Debug, Clone, Default)]
pub struct ClusterQuery {
    /// Falls back to the configured default radius
    pub max_radius_km: Option<f64>,
    /// Only cluster drivers inside this box
    pub bbox: Option<BoundingBox>,
}

pub struct TrackingService {
    store: Arc<LocationStore>,
    geofences: Arc<GeofenceEngine>,
    dispatcher: Arc<Dispatcher>,
    clustering: ClusteringEngine,
    heatmaps: HeatmapAggregator,
    planner: RoutePlanner,
    directory: Arc<dyn DeliveryDirectory>,
    notifier: Arc<dyn AlertNotifier>,
    driver_locks: DashMap<DriverId, Arc<Mutex<()>>>,
    online_window: Duration,
    default_cluster_radius_km: f64,
}

impl TrackingService {
    pub fn new(
        config: &LayeredConfig,
        directory: Arc<dyn DeliveryDirectory>,
        history: Arc<dyn DeliveryHistory>,
        notifier: Arc<dyn AlertNotifier>,
    ) -> Self {
        let store = Arc::new(LocationStore::with_cell_degrees(config.grid_cell_degrees.value));
        let online_secs = i64::try_from(config.online_window_secs.value).unwrap_or(i64::MAX);

        Self {
            clustering: ClusteringEngine::new(store.clone()),
            store,
            geofences: Arc::new(GeofenceEngine::new()),
            dispatcher: Arc::new(Dispatcher::new(config.subscriber_buffer.value)),
            heatmaps: HeatmapAggregator::new(history),
            planner: RoutePlanner::from_config(config),
            directory,
            notifier,
            driver_locks: DashMap::new(),
            online_window: Duration::try_seconds(online_secs).unwrap_or(Duration::MAX),
            default_cluster_radius_km: config.default_cluster_radius_km.value,
        }
    }

    pub fn store(&self) -> &Arc<LocationStore> {
        &self.store
    }

    pub fn geofences(&self) -> &Arc<GeofenceEngine> {
        &self.geofences
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn planner(&self) -> &RoutePlanner {
        &self.planner
    }

    /// Apply a driver position report.
    ///
    /// A collaborator failure during geofence evaluation is returned as a
    /// dependency error; the stored position and the published update stand.
    pub async fn ingest(&self, position: Position) -> Result<IngestReport> {
        validate_position(&position)?;
        let driver_id = position.driver_id;

        let lock = self.driver_locks.entry(driver_id).or_default().clone();
        let applied = {
            let _guard = lock.lock().await;
            self.apply_in_order(position).await
        };
        drop(lock);
        self.release_driver_lock(driver_id);

        let report = applied?;
        if let Some(alert) = &report.alert {
            // Delivery failures never undo the recorded transition
            if let Err(e) = self.notifier.notify(alert).await {
                tracing::warn!(
                    driver_id = %alert.driver_id,
                    delivery_id = %alert.delivery_id,
                    error = %e,
                    "Alert notification failed"
                );
            }
        }

        Ok(report)
    }

    /// Store, publish and evaluate one report. Callers hold the driver's lock.
    async fn apply_in_order(&self, position: Position) -> Result<IngestReport> {
        let outcome = self.store.ingest(position.clone())?;
        if outcome == IngestOutcome::Stale {
            tracing::info!(
                driver_id = %position.driver_id,
                observed_at = %position.observed_at,
                "Rejected stale position"
            );
            return Ok(IngestReport {
                outcome,
                alert: None,
            });
        }

        self.publish_location(&position);

        let alert = self.evaluate_geofence(&position).await?;
        if let Some(alert) = &alert {
            self.publish_alert(alert);
        }
        Ok(IngestReport { outcome, alert })
    }

    /// Drop the driver's lock entry unless another report holds or awaits it
    fn release_driver_lock(&self, driver_id: DriverId) {
        self.driver_locks
            .remove_if(&driver_id, |_, lock| Arc::strong_count(lock) == 1);
    }

    /// Number of drivers with a report currently in flight
    pub fn busy_drivers(&self) -> usize {
        self.driver_locks.len()
    }

    /// Forget a driver's latest position, returning it
    pub async fn forget_driver(&self, driver_id: DriverId) -> Option<Position> {
        let lock = self.driver_locks.entry(driver_id).or_default().clone();
        let removed = {
            let _guard = lock.lock().await;
            self.store.remove(driver_id)
        };
        drop(lock);
        self.release_driver_lock(driver_id);

        if removed.is_some() {
            tracing::info!(driver_id = %driver_id, "Forgot driver");
        }
        removed
    }

    async fn evaluate_geofence(&self, position: &Position) -> Result<Option<Alert>> {
        let Some(delivery_id) = position.delivery_id else {
            return Ok(None);
        };
        if self.geofences.zone(position.driver_id, delivery_id).is_none() {
            return Ok(None);
        }

        let delivery = self
            .directory
            .get_active_delivery(delivery_id)
            .await
            .map_err(|e| e.into_dependency("delivery-directory"))?;

        match delivery {
            Some(delivery) if !delivery.status.is_terminal() => {
                Ok(self.geofences.evaluate(position))
            }
            Some(delivery) => {
                tracing::warn!(
                    delivery_id = %delivery_id,
                    status = ?delivery.status,
                    "Discarding geofence for finished delivery"
                );
                self.geofences.discard_zone(position.driver_id, delivery_id);
                Ok(None)
            }
            None => {
                tracing::warn!(
                    delivery_id = %delivery_id,
                    "Discarding geofence for unknown delivery"
                );
                self.geofences.discard_zone(position.driver_id, delivery_id);
                Ok(None)
            }
        }
    }

    fn publish_location(&self, position: &Position) {
        let payload = EventPayload::DriverLocationUpdate(position.clone());
        let mut delivered = self
            .dispatcher
            .publish(&Subject::Driver(position.driver_id), payload.clone());
        if let Some(delivery_id) = position.delivery_id {
            delivered += self.dispatcher.publish(&Subject::Delivery(delivery_id), payload);
        }
        tracing::trace!(driver_id = %position.driver_id, delivered, "Location published");
    }

    fn publish_alert(&self, alert: &Alert) {
        let payload = EventPayload::GeofenceAlert(alert.clone());
        self.dispatcher.publish(&Subject::Driver(alert.driver_id), payload.clone());
        self.dispatcher.publish(&Subject::Delivery(alert.delivery_id), payload);
    }

    /// Begin geofence tracking for a (driver, delivery) pair
    pub fn start_tracking(&self, zone: GeofenceZone) -> Result<()> {
        self.geofences.register_zone(zone)
    }

    /// Stop geofence tracking, returning the discarded zone
    pub fn stop_tracking(
        &self,
        driver_id: DriverId,
        delivery_id: DeliveryId,
    ) -> Result<GeofenceZone> {
        self.geofences
            .discard_zone(driver_id, delivery_id)
            .ok_or_else(|| {
                GeotrackError::not_found(
                    "Geofence",
                    format!("driver {} / delivery {}", driver_id, delivery_id),
                )
            })
    }

    /// Fan out a delivery status change. Finished deliveries lose their zones.
    pub fn update_delivery_status(&self, update: DeliveryStatusUpdate) -> usize {
        let mut subjects = vec![Subject::Delivery(update.delivery_id)];
        subjects.extend(update.driver_id.map(Subject::Driver));
        subjects.extend(update.partner_id.map(Subject::Partner));
        subjects.extend(update.region.clone().map(Subject::Region));

        if update.status.is_terminal() {
            let discarded = self.geofences.discard_delivery(update.delivery_id);
            tracing::info!(
                delivery_id = %update.delivery_id,
                status = ?update.status,
                discarded,
                "Delivery finished"
            );
        }

        let payload = EventPayload::DeliveryStatusUpdate(update);
        subjects
            .iter()
            .map(|subject| self.dispatcher.publish(subject, payload.clone()))
            .sum()
    }

    /// Latest positions reported within the online window
    pub fn online_drivers(&self) -> Vec<Position> {
        self.store.online(self.online_since(Utc::now()))
    }

    fn online_since(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.online_window).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Cluster the online drivers for the dashboard
    pub fn clusters(&self, query: &ClusterQuery) -> Result<ClusterSummary> {
        let radius = query.max_radius_km.unwrap_or(self.default_cluster_radius_km);
        validate_radius("radius_km", radius)?;
        if let Some(bbox) = &query.bbox {
            validate_bbox(bbox)?;
        }

        let candidates: Vec<DriverId> = self
            .online_drivers()
            .into_iter()
            .filter(|p| query.bbox.map_or(true, |bbox| bbox.contains(p.coordinate())))
            .map(|p| p.driver_id)
            .collect();

        let clusters = self.clustering.cluster(&candidates, radius)?;
        Ok(ClusterSummary::from_clusters(clusters))
    }

    pub async fn heatmap(&self, query: &HeatmapQuery) -> Result<HeatmapSummary> {
        self.heatmaps.heatmap(query).await
    }

    pub fn route(&self, request: &RouteRequest) -> Result<Route> {
        self.planner.calculate_route(request)
    }
}
