mod bounded;
mod deliveries;
mod map;

pub use bounded::run_bounded;
pub use deliveries::DeliveryService;
pub use map::{drivers_to_geojson, MapService};
