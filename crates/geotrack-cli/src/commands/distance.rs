//! Distance command implementation

use crate::cli::DistanceArgs;
use crate::input::parse_coordinate;
use crate::output::OutputWriter;
use crate::output_types::DistanceOutput;
use anyhow::Result;
use geotrack_geo::{bearing_degrees, haversine_km};

pub fn execute(args: DistanceArgs, output: &OutputWriter) -> Result<()> {
    let from = parse_coordinate(&args.from)?;
    let to = parse_coordinate(&args.to)?;

    let result = DistanceOutput {
        distance_km: haversine_km(from, to),
        bearing_degrees: bearing_degrees(from, to),
    };

    output.kv("Distance", format!("{:.3} km", result.distance_km));
    output.kv("Bearing", format!("{:.1}°", result.bearing_degrees));

    output.result(result)
}
