//! GeoTrack Store - Live location state and in-memory collaborator adapters
//!
//! The location store keeps the latest position per driver together with a
//! grid-cell index for box queries. The memory adapters implement the
//! delivery ports for development and testing.

pub mod location;
pub mod memory;

pub use location::{LocationStore, NearbyDriver};
pub use memory::{MemoryDeliveryDirectory, MemoryDeliveryHistory};
