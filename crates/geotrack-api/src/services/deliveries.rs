use chrono::{DateTime, Utc};
use geotrack_core::error::Result;
use geotrack_core::models::{
    ActiveDelivery, Coordinate, DeliveryId, DeliveryRecord, DeliveryStatus, DeliveryStatusUpdate,
    GeofenceZone,
};

use crate::dto::StatusRequest;
use crate::state::AppState;

/// Keeps the delivery directory and history in step with the tracking service
pub struct DeliveryService;

impl DeliveryService {
    /// Record a status change and fan it out, returning how many subscribers received it.
    ///
    /// The directory is updated first so geofence checks after this call see
    /// the new status. `DELIVERED` also adds the delivery to the heatmap history.
    pub fn update_status(
        state: &AppState,
        delivery_id: DeliveryId,
        request: StatusRequest,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        request.validate()?;
        let StatusRequest {
            status,
            driver_id,
            partner_id,
            region,
            subregion,
            dropoff,
            message,
        } = request;

        let update = DeliveryStatusUpdate {
            delivery_id,
            status,
            driver_id,
            partner_id,
            region,
            message,
            updated_at: now,
        };
        let delivery = state.directory.apply_update(&update);

        if status == DeliveryStatus::Delivered {
            Self::record_completion(state, &delivery, subregion, dropoff, now);
        }

        Ok(state.tracking.update_delivery_status(update))
    }

    fn record_completion(
        state: &AppState,
        delivery: &ActiveDelivery,
        subregion: Option<String>,
        dropoff: Option<Coordinate>,
        completed_at: DateTime<Utc>,
    ) {
        let (Some(region), Some(subregion)) = (delivery.region.clone(), subregion) else {
            tracing::warn!(
                delivery_id = %delivery.delivery_id,
                "Delivered without region and subregion, not added to heatmaps"
            );
            return;
        };

        tracing::info!(
            delivery_id = %delivery.delivery_id,
            region = %region,
            subregion = %subregion,
            "Recording completed delivery"
        );
        state.history.record(DeliveryRecord {
            delivery_id: delivery.delivery_id,
            region,
            subregion,
            completed_at,
            dropoff,
        });
    }

    /// Start tracking a zone. A delivery not yet in the directory is added as
    /// pending for the zone's driver so its reports are evaluated.
    pub fn register_zone(state: &AppState, zone: GeofenceZone) -> Result<()> {
        let (driver_id, delivery_id) = (zone.driver_id, zone.delivery_id);
        state.tracking.start_tracking(zone)?;

        if state.directory.register(delivery_id, driver_id) {
            tracing::debug!(
                driver_id = %driver_id,
                delivery_id = %delivery_id,
                "Added pending delivery for new geofence"
            );
        }
        Ok(())
    }
}
