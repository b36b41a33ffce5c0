pub mod cluster;
pub mod delivery;
pub mod event;
pub mod geofence;
pub mod heatmap;
pub mod ids;
pub mod location;
pub mod route;

pub use cluster::{ClusterSummary, DriverCluster};
pub use delivery::{ActiveDelivery, DeliveryRecord, DeliveryStatus, DeliveryStatusUpdate};
pub use event::{DispatchEvent, EventPayload, Subject};
pub use geofence::{Alert, GeofenceState, GeofenceZone};
pub use heatmap::{HeatmapCell, HeatmapSummary, TimeRange};
pub use ids::{DeliveryId, DriverId, PartnerId};
pub use location::{BoundingBox, Coordinate, IngestOutcome, Position};
pub use route::{Route, RouteBounds, RouteRequest, RouteWaypoint, TransportMode, Waypoint};
