use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use geotrack_core::models::ClusterSummary;
use geotrack_engine::ClusterQuery;

use crate::dto::ClusterParams;
use crate::error::ApiError;
use crate::services::run_bounded;
use crate::state::AppState;

pub async fn driver_clusters(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClusterParams>,
) -> Result<Json<ClusterSummary>, ApiError> {
    let query = ClusterQuery {
        max_radius_km: params.radius_km,
        bbox: params.parse_bbox()?,
    };

    let tracking = state.tracking.clone();
    let summary =
        run_bounded("clustering", state.request_timeout, move || tracking.clusters(&query)).await?;

    tracing::info!(
        clusters = summary.total_clusters,
        drivers = summary.total_drivers,
        "Clusters computed"
    );

    Ok(Json(summary))
}
