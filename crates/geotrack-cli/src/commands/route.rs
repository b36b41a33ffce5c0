//! Route command implementation

use crate::cli::RouteArgs;
use crate::input::parse_coordinate;
use crate::output::OutputWriter;
use crate::output_types::{format_duration, LegRow};
use anyhow::{Context, Result};
use geotrack_core::config::LayeredConfig;
use geotrack_core::models::{RouteRequest, TransportMode, Waypoint};
use geotrack_engine::RoutePlanner;

pub fn execute(args: RouteArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mode: TransportMode = args.mode.parse()?;

    let origin = Waypoint::labelled(parse_coordinate(&args.from)?, "origin");
    let destination = Waypoint::labelled(parse_coordinate(&args.to)?, "destination");
    let stops = args
        .via
        .iter()
        .enumerate()
        .map(|(i, raw)| Ok(Waypoint::labelled(parse_coordinate(raw)?, format!("stop {}", i + 1))))
        .collect::<Result<Vec<_>>>()?;

    let request = RouteRequest::new(origin, destination)
        .with_stops(stops)
        .with_mode(mode)
        .optimized(args.optimize)
        .with_traffic(args.traffic);

    let route = RoutePlanner::from_config(config)
        .calculate_route(&request)
        .context("Failed to plan route")?;

    tracing::debug!(
        legs = route.legs.len(),
        distance_km = route.total_distance_km,
        "Route planned"
    );

    output.section(format!("Route ({})", route.transport_mode));
    output.table(
        route
            .legs
            .iter()
            .enumerate()
            .map(|(i, leg)| LegRow::new(i, leg))
            .collect(),
    );
    output.kv("Distance", format!("{:.2} km", route.total_distance_km));
    output.kv("Duration", format_duration(route.estimated_duration_secs));
    if args.traffic {
        output.kv(
            "Duration with traffic",
            format_duration(route.estimated_duration_with_traffic_secs),
        );
    }
    if route.optimized {
        output.info("Intermediate stops reordered by nearest neighbor");
    }
    if args.polyline {
        output.kv("Polyline", &route.polyline);
    }

    output.result(&route)
}
