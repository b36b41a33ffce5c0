use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use geotrack_core::models::DeliveryId;

use crate::dto::{StatusRequest, StatusUpdateResponse};
use crate::error::ApiError;
use crate::services::DeliveryService;
use crate::state::AppState;

pub async fn update_delivery_status(
    State(state): State<Arc<AppState>>,
    Path(delivery_id): Path<u64>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<StatusUpdateResponse>, ApiError> {
    tracing::info!(delivery_id, status = ?request.status, "Delivery status changed");

    let delivered_to =
        DeliveryService::update_status(&state, DeliveryId(delivery_id), request, Utc::now())?;

    Ok(Json(StatusUpdateResponse { delivered_to }))
}
