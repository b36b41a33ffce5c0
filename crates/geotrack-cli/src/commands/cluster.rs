//! Cluster command implementation

use crate::cli::ClusterArgs;
use crate::input::read_json_array;
use crate::output::OutputWriter;
use crate::output_types::ClusterRow;
use anyhow::{Context, Result};
use geotrack_core::config::LayeredConfig;
use geotrack_core::models::{ClusterSummary, Position};
use geotrack_engine::cluster_positions;
use std::collections::HashMap;

pub fn execute(args: ClusterArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let positions: Vec<Position> = read_json_array(&args.positions)?;
    let radius = args.radius_km.unwrap_or(config.default_cluster_radius_km.value);

    let latest = latest_per_driver(positions);
    let clusters = cluster_positions(&latest, radius).context("Failed to cluster positions")?;
    let summary = ClusterSummary::from_clusters(clusters);

    output.section(format!("Clusters within {} km", radius));
    output.table(summary.clusters.iter().map(ClusterRow::from).collect());
    output.kv("Clusters", summary.total_clusters);
    output.kv("Drivers", summary.total_drivers);

    output.result(&summary)
}

/// Keep each driver's newest report, as the location store would
fn latest_per_driver(positions: Vec<Position>) -> Vec<Position> {
    let mut latest: HashMap<_, Position> = HashMap::new();
    for position in positions {
        match latest.get(&position.driver_id) {
            Some(existing) if existing.observed_at > position.observed_at => {}
            _ => {
                latest.insert(position.driver_id, position);
            }
        }
    }
    latest.into_values().collect()
}
