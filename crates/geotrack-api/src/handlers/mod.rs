mod clusters;
mod deliveries;
mod geofences;
mod health;
mod heatmap;
mod locations;
mod routes;
mod subscribe;

pub use clusters::driver_clusters;
pub use deliveries::update_delivery_status;
pub use geofences::{geofence_alerts, geofence_state, register_geofence, remove_geofence};
pub use health::health_check;
pub use heatmap::delivery_heatmap;
pub use locations::{
    driver_map, drivers_in_box, forget_driver, ingest_location, latest_location, nearby_drivers,
};
pub use routes::plan_route;
pub use subscribe::subscribe;
