//! GeoTrack Geo - Spatial math for tracking
//!
//! Great-circle distances and bearings, bounding boxes, grid cells used by the
//! location index, centroids, encoded polylines and coordinate validation.

pub mod grid;
pub mod polyline;
pub mod spatial;
pub mod validation;

pub use grid::GridCell;
pub use polyline::{decode_polyline, encode_polyline};
pub use spatial::{
    bearing_degrees, bounding_box_around, centroid, haversine_km, search_boxes_around,
};
