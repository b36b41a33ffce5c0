//! Straight-line route planning.
//!
//! Legs are great-circle segments and durations come from a per-mode
//! average speed, so ETAs are estimates rather than road-network times.

use geotrack_core::config::LayeredConfig;
use geotrack_core::error::Result;
use geotrack_core::models::{
    Coordinate, Route, RouteBounds, RouteRequest, RouteWaypoint, TransportMode, Waypoint,
};
use geotrack_geo::validation::validate_coordinate;
use geotrack_geo::{bearing_degrees, encode_polyline, haversine_km};
use std::time::Duration;

/// Origin and destination closer than this are treated as the same place
pub const COINCIDENT_EPSILON_KM: f64 = 0.001;

/// Average speed per transport mode, km/h
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedTable {
    pub driving_kmh: f64,
    pub walking_kmh: f64,
    pub cycling_kmh: f64,
}

impl SpeedTable {
    pub fn speed_kmh(&self, mode: TransportMode) -> f64 {
        match mode {
            TransportMode::Driving => self.driving_kmh,
            TransportMode::Walking => self.walking_kmh,
            TransportMode::Cycling => self.cycling_kmh,
        }
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            driving_kmh: 30.0,
            walking_kmh: 5.0,
            cycling_kmh: 15.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RoutePlanner {
    speeds: SpeedTable,
    traffic_multiplier: f64,
}

impl RoutePlanner {
    pub fn new(speeds: SpeedTable, traffic_multiplier: f64) -> Self {
        Self {
            speeds,
            traffic_multiplier,
        }
    }

    pub fn from_config(config: &LayeredConfig) -> Self {
        Self::new(
            SpeedTable {
                driving_kmh: config.speed_kmh(TransportMode::Driving),
                walking_kmh: config.speed_kmh(TransportMode::Walking),
                cycling_kmh: config.speed_kmh(TransportMode::Cycling),
            },
            config.traffic_multiplier.value,
        )
    }

    /// Travel time for a distance at the mode's average speed
    pub fn eta(&self, distance_km: f64, mode: TransportMode) -> Duration {
        Duration::from_secs(self.seconds_for(distance_km, mode, 1.0))
    }

    fn seconds_for(&self, distance_km: f64, mode: TransportMode, multiplier: f64) -> u64 {
        let hours = distance_km / self.speeds.speed_kmh(mode);
        (hours * 3600.0 * multiplier).round().max(0.0) as u64
    }

    /// Plan a route from origin through the stops to the destination
    pub fn calculate_route(&self, request: &RouteRequest) -> Result<Route> {
        for waypoint in std::iter::once(&request.origin)
            .chain(&request.stops)
            .chain(std::iter::once(&request.destination))
        {
            validate_coordinate(waypoint.location.lat, waypoint.location.lon)?;
        }

        let direct = haversine_km(request.origin.location, request.destination.location);
        if request.stops.is_empty() && direct < COINCIDENT_EPSILON_KM {
            tracing::debug!(mode = %request.mode, "Origin and destination coincide");
            return Ok(self.zero_route(request));
        }

        let optimized = request.optimize && !request.stops.is_empty();
        let stops = if optimized {
            nearest_neighbor_order(request.origin.location, &request.stops)
        } else {
            request.stops.iter().collect()
        };

        let sequence: Vec<&Waypoint> = std::iter::once(&request.origin)
            .chain(stops)
            .chain(std::iter::once(&request.destination))
            .collect();

        let mut legs = Vec::with_capacity(sequence.len());
        let mut cumulative_km = 0.0;
        let mut previous: Option<Coordinate> = None;

        for waypoint in &sequence {
            let location = waypoint.location;
            let bearing_from_previous = previous.map(|prev| {
                cumulative_km += haversine_km(prev, location);
                bearing_degrees(prev, location)
            });
            legs.push(RouteWaypoint {
                location,
                label: waypoint.label.clone(),
                distance_from_start_km: cumulative_km,
                duration_from_start_secs: self.seconds_for(cumulative_km, request.mode, 1.0),
                bearing_from_previous,
            });
            previous = Some(location);
        }

        let estimated_duration_secs = self.seconds_for(cumulative_km, request.mode, 1.0);
        let estimated_duration_with_traffic_secs = if request.include_traffic {
            self.seconds_for(cumulative_km, request.mode, self.traffic_multiplier)
        } else {
            estimated_duration_secs
        };

        let coords: Vec<Coordinate> = sequence.iter().map(|w| w.location).collect();

        tracing::debug!(
            mode = %request.mode,
            stops = request.stops.len(),
            optimized,
            distance_km = cumulative_km,
            "Route calculated"
        );

        Ok(Route {
            legs,
            total_distance_km: cumulative_km,
            estimated_duration_secs,
            estimated_duration_with_traffic_secs,
            polyline: encode_polyline(&coords),
            transport_mode: request.mode,
            optimized,
            bounds: bounds_of(&coords),
        })
    }

    fn zero_route(&self, request: &RouteRequest) -> Route {
        let coords = [request.origin.location, request.destination.location];
        let legs = [&request.origin, &request.destination]
            .into_iter()
            .enumerate()
            .map(|(i, waypoint)| RouteWaypoint {
                location: waypoint.location,
                label: waypoint.label.clone(),
                distance_from_start_km: 0.0,
                duration_from_start_secs: 0,
                bearing_from_previous: (i > 0).then_some(0.0),
            })
            .collect();

        Route {
            legs,
            total_distance_km: 0.0,
            estimated_duration_secs: 0,
            estimated_duration_with_traffic_secs: 0,
            polyline: encode_polyline(&coords),
            transport_mode: request.mode,
            optimized: false,
            bounds: bounds_of(&coords),
        }
    }
}

impl Default for RoutePlanner {
    fn default() -> Self {
        Self::new(SpeedTable::default(), 1.3)
    }
}

/// Greedy visiting order: always go to the closest remaining stop.
/// Equal distances go to the stop listed first.
fn nearest_neighbor_order<'a>(origin: Coordinate, stops: &'a [Waypoint]) -> Vec<&'a Waypoint> {
    let mut remaining: Vec<usize> = (0..stops.len()).collect();
    let mut ordered = Vec::with_capacity(stops.len());
    let mut current = origin;

    while !remaining.is_empty() {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (slot, &index) in remaining.iter().enumerate() {
            let distance = haversine_km(current, stops[index].location);
            if distance < best_distance {
                best = slot;
                best_distance = distance;
            }
        }
        // `remaining` stays in original order, so strict `<` keeps the lower index on ties
        let index = remaining.remove(best);
        current = stops[index].location;
        ordered.push(&stops[index]);
    }

    ordered
}

fn bounds_of(coords: &[Coordinate]) -> Option<RouteBounds> {
    let first = coords.first()?;
    let mut south_west = *first;
    let mut north_east = *first;
    for coord in &coords[1..] {
        south_west.lat = south_west.lat.min(coord.lat);
        south_west.lon = south_west.lon.min(coord.lon);
        north_east.lat = north_east.lat.max(coord.lat);
        north_east.lon = north_east.lon.max(coord.lon);
    }
    Some(RouteBounds {
        south_west,
        north_east,
    })
}
