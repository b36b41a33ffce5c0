//! GeoTrack Engine - Tracking intelligence
//!
//! Geofence evaluation, driver clustering, heatmap aggregation, route
//! planning and realtime event fan-out, orchestrated by [`TrackingService`].

pub mod cluster;
pub mod dispatch;
pub mod geofence;
pub mod heatmap;
pub mod route;
pub mod tracking;

pub use cluster::{cluster_positions, ClusteringEngine};
pub use dispatch::{Dispatcher, Received, Subscription};
pub use geofence::GeofenceEngine;
pub use heatmap::{aggregate, HeatmapAggregator, HeatmapQuery};
pub use route::RoutePlanner;
pub use tracking::{ClusterQuery, IngestReport, TrackingService};
