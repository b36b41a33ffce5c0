use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Driver locations
        .route("/api/v1/locations", post(handlers::ingest_location))
        .route("/api/v1/drivers", get(handlers::drivers_in_box))
        .route("/api/v1/drivers/nearby", get(handlers::nearby_drivers))
        .route("/api/v1/drivers/map", get(handlers::driver_map))
        .route("/api/v1/drivers/clusters", get(handlers::driver_clusters))
        .route(
            "/api/v1/drivers/{driver_id}/location",
            get(handlers::latest_location).delete(handlers::forget_driver),
        )

        // Analytics and planning
        .route("/api/v1/heatmap", get(handlers::delivery_heatmap))
        .route("/api/v1/routes", post(handlers::plan_route))

        // Geofences
        .route("/api/v1/geofences", post(handlers::register_geofence))
        .route("/api/v1/geofences/{driver_id}/{delivery_id}", delete(handlers::remove_geofence))
        .route("/api/v1/geofences/{driver_id}/{delivery_id}/state", get(handlers::geofence_state))
        .route("/api/v1/geofences/{driver_id}/{delivery_id}/alerts", get(handlers::geofence_alerts))

        // Deliveries
        .route("/api/v1/deliveries/{delivery_id}/status", post(handlers::update_delivery_status))

        // Realtime
        .route("/api/v1/subscribe/{kind}/{id}", get(handlers::subscribe))

        .with_state(state)
}
