//! Parsing of command-line coordinates and input files

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use geotrack_core::models::Coordinate;
use geotrack_geo::validation::validate_coordinate;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Parse "lat,lon" into a validated coordinate
pub fn parse_coordinate(raw: &str) -> Result<Coordinate> {
    let Some((lat, lon)) = raw.split_once(',') else {
        bail!("Expected \"lat,lon\", got \"{}\"", raw);
    };

    let lat: f64 = lat.trim().parse().with_context(|| format!("Invalid latitude in \"{}\"", raw))?;
    let lon: f64 = lon.trim().parse().with_context(|| format!("Invalid longitude in \"{}\"", raw))?;
    validate_coordinate(lat, lon)?;

    Ok(Coordinate::new(lat, lon))
}

pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    let instant = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Invalid RFC 3339 timestamp \"{}\"", raw))?;
    Ok(instant.with_timezone(&Utc))
}

/// Read a JSON array of records
pub fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotrack_core::models::Position;
    use std::io::Write;

    #[test]
    fn test_parse_coordinate() {
        let coord = parse_coordinate("9.03, 38.74").unwrap();
        assert_eq!(coord, Coordinate::new(9.03, 38.74));

        assert!(parse_coordinate("-33.9,18.4").is_ok());
        assert!(parse_coordinate("9.03").is_err());
        assert!(parse_coordinate("north,38.7").is_err());
        assert!(parse_coordinate("95,38.7").is_err());
    }

    #[test]
    fn test_parse_instant_normalizes_offset() {
        let instant = parse_instant("2024-05-01T13:00:00+03:00").unwrap();
        assert_eq!(instant, parse_instant("2024-05-01T10:00:00Z").unwrap());
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn test_read_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"driver_id": 1, "latitude": 9.0, "longitude": 38.7,
                 "observed_at": "2024-05-01T10:00:00Z"}}]"#
        )
        .unwrap();

        let positions: Vec<Position> = read_json_array(file.path()).unwrap();
        assert_eq!(positions.len(), 1);

        let missing = Path::new("/nonexistent/positions.json");
        let err = read_json_array::<Position>(missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
