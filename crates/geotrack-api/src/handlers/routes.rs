use std::sync::Arc;

use axum::{extract::State, Json};
use geotrack_core::models::{Route, RouteRequest};

use crate::dto::RouteRequestBody;
use crate::error::ApiError;
use crate::services::run_bounded;
use crate::state::AppState;

pub async fn plan_route(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RouteRequestBody>,
) -> Result<Json<Route>, ApiError> {
    let request = RouteRequest::try_from(body)?;

    tracing::info!(
        stops = request.stops.len(),
        mode = %request.mode,
        optimize = request.optimize,
        "Planning route"
    );

    let tracking = state.tracking.clone();
    let route = run_bounded("routing", state.request_timeout, move || {
        tracking.route(&request)
    })
    .await?;

    Ok(Json(route))
}
