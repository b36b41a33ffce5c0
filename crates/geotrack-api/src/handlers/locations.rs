use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use geojson::FeatureCollection;
use geotrack_core::error::GeotrackError;
use geotrack_core::models::{Coordinate, DriverId, Position};
use geotrack_store::NearbyDriver;

use crate::dto::{BboxParams, DeleteResponse, IngestResponse, NearbyParams};
use crate::error::ApiError;
use crate::services::MapService;
use crate::state::AppState;

pub async fn ingest_location(
    State(state): State<Arc<AppState>>,
    Json(position): Json<Position>,
) -> Result<Json<IngestResponse>, ApiError> {
    tracing::debug!(
        driver_id = %position.driver_id,
        delivery_id = ?position.delivery_id,
        observed_at = %position.observed_at,
        "Location report received"
    );

    let report = state.tracking.ingest(position).await?;

    Ok(Json(report.into()))
}

pub async fn latest_location(
    State(state): State<Arc<AppState>>,
    Path(driver_id): Path<u64>,
) -> Result<Json<Position>, ApiError> {
    let position = state
        .tracking
        .store()
        .latest(DriverId(driver_id))
        .ok_or_else(|| GeotrackError::not_found("Driver", driver_id))?;

    Ok(Json(position))
}

/// Forget a driver that went off shift
pub async fn forget_driver(
    State(state): State<Arc<AppState>>,
    Path(driver_id): Path<u64>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state
        .tracking
        .forget_driver(DriverId(driver_id))
        .await
        .ok_or_else(|| GeotrackError::not_found("Driver", driver_id))?;

    Ok(Json(DeleteResponse::success("Driver", driver_id)))
}

pub async fn drivers_in_box(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BboxParams>,
) -> Result<Json<Vec<Position>>, ApiError> {
    let positions = state.tracking.store().within(&params.to_bbox())?;

    tracing::info!(count = positions.len(), "Box query");

    Ok(Json(positions))
}

pub async fn nearby_drivers(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NearbyParams>,
) -> Result<Json<Vec<NearbyDriver>>, ApiError> {
    let nearby = state
        .tracking
        .store()
        .within_radius(Coordinate::new(params.lat, params.lon), params.radius_km)?;

    Ok(Json(nearby))
}

pub async fn driver_map(State(state): State<Arc<AppState>>) -> Json<FeatureCollection> {
    Json(MapService::online_drivers(&state))
}
