use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use geotrack_core::models::HeatmapSummary;
use geotrack_engine::HeatmapQuery;

use crate::dto::HeatmapParams;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn delivery_heatmap(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HeatmapParams>,
) -> Result<Json<HeatmapSummary>, ApiError> {
    let query = HeatmapQuery::from(params);

    tracing::info!(
        start = %query.range.start,
        end = %query.range.end,
        region = ?query.region,
        subregion = ?query.subregion,
        "Building heatmap"
    );

    let summary = state.tracking.heatmap(&query).await?;

    Ok(Json(summary))
}
