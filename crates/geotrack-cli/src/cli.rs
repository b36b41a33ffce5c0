use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use geotrack_core::config::CliConfigOverrides;

/// GeoTrack - Geospatial tracking tools for delivery fleets
#[derive(Parser, Debug)]
#[command(name = "geotrack")]
#[command(about = "Geospatial tracking tools for delivery fleets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Configuration overrides taking precedence over file and environment
#[derive(Args, Debug, Default)]
pub struct OverrideArgs {
    /// Average driving speed in km/h
    #[arg(long, global = true)]
    pub driving_speed: Option<f64>,

    /// Average walking speed in km/h
    #[arg(long, global = true)]
    pub walking_speed: Option<f64>,

    /// Average cycling speed in km/h
    #[arg(long, global = true)]
    pub cycling_speed: Option<f64>,

    /// Duration multiplier applied when traffic is included
    #[arg(long, global = true)]
    pub traffic_multiplier: Option<f64>,

    /// Default cluster radius in kilometers
    #[arg(long, global = true)]
    pub cluster_radius: Option<f64>,
}

impl From<&OverrideArgs> for CliConfigOverrides {
    fn from(args: &OverrideArgs) -> Self {
        CliConfigOverrides {
            driving_speed_kmh: args.driving_speed,
            walking_speed_kmh: args.walking_speed,
            cycling_speed_kmh: args.cycling_speed,
            traffic_multiplier: args.traffic_multiplier,
            default_cluster_radius_km: args.cluster_radius,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Plan a route through stops
    Route(RouteArgs),

    /// Great-circle distance and bearing between two points
    Distance(DistanceArgs),

    /// Cluster driver positions read from a JSON file
    Cluster(ClusterArgs),

    /// Aggregate completed deliveries into a heatmap
    Heatmap(HeatmapArgs),

    /// Show effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct RouteArgs {
    /// Origin as "lat,lon"
    #[arg(long, allow_hyphen_values = true)]
    pub from: String,

    /// Destination as "lat,lon"
    #[arg(long, allow_hyphen_values = true)]
    pub to: String,

    /// Intermediate stop as "lat,lon" (repeatable)
    #[arg(long = "via", allow_hyphen_values = true)]
    pub via: Vec<String>,

    /// Transport mode (driving, walking, cycling)
    #[arg(long, default_value = "driving")]
    pub mode: String,

    /// Reorder intermediate stops by nearest neighbor
    #[arg(long)]
    pub optimize: bool,

    /// Include the traffic multiplier in the duration estimate
    #[arg(long)]
    pub traffic: bool,

    /// Print the encoded polyline
    #[arg(long)]
    pub polyline: bool,
}

#[derive(Parser, Debug)]
pub struct DistanceArgs {
    /// First point as "lat,lon"
    #[arg(allow_hyphen_values = true)]
    pub from: String,

    /// Second point as "lat,lon"
    #[arg(allow_hyphen_values = true)]
    pub to: String,
}

#[derive(Parser, Debug)]
pub struct ClusterArgs {
    /// JSON file holding an array of positions
    pub positions: PathBuf,

    /// Maximum distance from a cluster center in kilometers
    #[arg(long)]
    pub radius_km: Option<f64>,
}

#[derive(Parser, Debug)]
pub struct HeatmapArgs {
    /// JSON file holding an array of completed delivery records
    pub deliveries: PathBuf,

    /// Window start (RFC 3339, inclusive)
    #[arg(long)]
    pub start: String,

    /// Window end (RFC 3339, exclusive)
    #[arg(long)]
    pub end: String,

    /// Only include this region
    #[arg(long)]
    pub region: Option<String>,

    /// Only include this subregion
    #[arg(long)]
    pub subregion: Option<String>,
}
