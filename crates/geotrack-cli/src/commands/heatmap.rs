//! Heatmap command implementation

use crate::cli::HeatmapArgs;
use crate::input::{parse_instant, read_json_array};
use crate::output::OutputWriter;
use crate::output_types::HeatmapRow;
use anyhow::{Context, Result};
use geotrack_core::models::{DeliveryRecord, TimeRange};
use geotrack_engine::{aggregate, heatmap::summarize};

pub fn execute(args: HeatmapArgs, output: &OutputWriter) -> Result<()> {
    let range = TimeRange::new(parse_instant(&args.start)?, parse_instant(&args.end)?);

    let records: Vec<DeliveryRecord> = read_json_array::<DeliveryRecord>(&args.deliveries)?
        .into_iter()
        .filter(|r| args.region.as_ref().map_or(true, |region| &r.region == region))
        .filter(|r| args.subregion.as_ref().map_or(true, |sub| &r.subregion == sub))
        .collect();

    let cells = aggregate(&records, range).context("Failed to aggregate deliveries")?;
    if cells.is_empty() {
        output.warning("No deliveries completed in the requested window");
    }
    let summary = summarize(cells);

    output.section("Delivery Heatmap");
    output.table(summary.cells.iter().map(HeatmapRow::from).collect());
    output.kv("Deliveries", summary.total_deliveries);
    output.kv("Regions", summary.total_regions);
    output.kv("Subregions", summary.total_subregions);

    output.result(&summary)
}
