//! GeoTrack Core - Domain models, configuration, and ports
//!
//! This crate contains the tracking domain types, the error taxonomy, layered
//! configuration and the port traits implemented by external collaborators.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{GeotrackError, Result};
