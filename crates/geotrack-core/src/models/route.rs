//! Route request and response types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::Coordinate;
use crate::error::GeotrackError;

/// Means of travel; selects the average speed used for ETAs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl FromStr for TransportMode {
    type Err = GeotrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "driving" | "car" => Ok(TransportMode::Driving),
            "walking" | "foot" => Ok(TransportMode::Walking),
            "cycling" | "bike" => Ok(TransportMode::Cycling),
            other => Err(GeotrackError::validation(
                "transport_mode",
                format!("unknown mode '{}'. Use driving, walking, or cycling", other),
            )),
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransportMode::Driving => "driving",
            TransportMode::Walking => "walking",
            TransportMode::Cycling => "cycling",
        };
        f.write_str(name)
    }
}

/// A stop on a route, optionally labelled with its address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub location: Coordinate,
    #[serde(default)]
    pub label: Option<String>,
}

impl Waypoint {
    pub fn new(location: Coordinate) -> Self {
        Self {
            location,
            label: None,
        }
    }

    pub fn labelled(location: Coordinate, label: impl Into<String>) -> Self {
        Self {
            location,
            label: Some(label.into()),
        }
    }
}

/// Input to the route planner
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: Waypoint,
    pub destination: Waypoint,

    /// Intermediate stops between origin and destination
    pub stops: Vec<Waypoint>,

    pub mode: TransportMode,

    /// Reorder intermediate stops by nearest neighbor
    pub optimize: bool,

    pub include_traffic: bool,
}

impl RouteRequest {
    pub fn new(origin: Waypoint, destination: Waypoint) -> Self {
        Self {
            origin,
            destination,
            stops: Vec::new(),
            mode: TransportMode::Driving,
            optimize: false,
            include_traffic: false,
        }
    }

    pub fn with_stops(mut self, stops: Vec<Waypoint>) -> Self {
        self.stops = stops;
        self
    }

    pub fn with_mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn optimized(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_traffic(mut self, include_traffic: bool) -> Self {
        self.include_traffic = include_traffic;
        self
    }
}

/// A waypoint in a computed route with cumulative progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteWaypoint {
    pub location: Coordinate,
    pub label: Option<String>,
    pub distance_from_start_km: f64,
    pub duration_from_start_secs: u64,

    /// Initial bearing of the leg arriving at this waypoint
    pub bearing_from_previous: Option<f64>,
}

/// Corners of the area covered by a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

/// A computed route. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub legs: Vec<RouteWaypoint>,
    pub total_distance_km: f64,
    pub estimated_duration_secs: u64,
    pub estimated_duration_with_traffic_secs: u64,

    /// Encoded polyline (precision 5) through every waypoint
    pub polyline: String,

    pub transport_mode: TransportMode,
    pub optimized: bool,
    pub bounds: Option<RouteBounds>,
}

impl Route {
    pub fn estimated_duration(&self) -> Duration {
        Duration::from_secs(self.estimated_duration_secs)
    }

    pub fn estimated_duration_with_traffic(&self) -> Duration {
        Duration::from_secs(self.estimated_duration_with_traffic_secs)
    }
}
