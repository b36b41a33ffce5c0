use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use geotrack_core::error::GeotrackError;
use geotrack_core::models::{Alert, DeliveryId, DriverId};

use crate::dto::{DeleteResponse, GeofenceRequest, GeofenceStateResponse};
use crate::error::ApiError;
use crate::services::DeliveryService;
use crate::state::AppState;

fn zone_label(driver_id: u64, delivery_id: u64) -> String {
    format!("{}/{}", driver_id, delivery_id)
}

pub async fn register_geofence(
    State(state): State<Arc<AppState>>,
    Json(zone): Json<GeofenceRequest>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(
        driver_id = %zone.driver_id,
        delivery_id = %zone.delivery_id,
        radius_km = zone.radius_km,
        "Registering geofence"
    );

    DeliveryService::register_zone(&state, zone)?;

    Ok(StatusCode::CREATED)
}

pub async fn remove_geofence(
    State(state): State<Arc<AppState>>,
    Path((driver_id, delivery_id)): Path<(u64, u64)>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .tracking
        .stop_tracking(DriverId(driver_id), DeliveryId(delivery_id))?;

    Ok(Json(DeleteResponse::success(
        "Geofence",
        zone_label(driver_id, delivery_id),
    )))
}

pub async fn geofence_state(
    State(state): State<Arc<AppState>>,
    Path((driver_id, delivery_id)): Path<(u64, u64)>,
) -> Result<Json<GeofenceStateResponse>, ApiError> {
    let zone_state = state
        .tracking
        .geofences()
        .state(DriverId(driver_id), DeliveryId(delivery_id))
        .ok_or_else(|| GeotrackError::not_found("Geofence", zone_label(driver_id, delivery_id)))?;

    Ok(Json(GeofenceStateResponse {
        driver_id,
        delivery_id,
        state: zone_state,
    }))
}

pub async fn geofence_alerts(
    State(state): State<Arc<AppState>>,
    Path((driver_id, delivery_id)): Path<(u64, u64)>,
) -> Result<Json<Vec<Alert>>, ApiError> {
    let alerts = state
        .tracking
        .geofences()
        .alerts(DriverId(driver_id), DeliveryId(delivery_id))
        .ok_or_else(|| GeotrackError::not_found("Geofence", zone_label(driver_id, delivery_id)))?;

    Ok(Json(alerts))
}
