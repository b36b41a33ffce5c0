//! Delivery density per (region, subregion).

use geotrack_core::error::{GeotrackError, Result};
use geotrack_core::models::{Coordinate, DeliveryRecord, HeatmapCell, HeatmapSummary, TimeRange};
use geotrack_core::ports::DeliveryHistory;
use geotrack_geo::centroid;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Group deliveries completed inside `range` into heatmap cells.
///
/// Cells are ordered by count descending, then region and subregion
/// ascending. Intensity is the count relative to the busiest cell.
pub fn aggregate(records: &[DeliveryRecord], range: TimeRange) -> Result<Vec<HeatmapCell>> {
    validate_range(&range)?;

    let mut groups: BTreeMap<(&str, &str), Vec<&DeliveryRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| range.contains(r.completed_at)) {
        groups
            .entry((record.region.as_str(), record.subregion.as_str()))
            .or_default()
            .push(record);
    }

    let max = groups.values().map(Vec::len).max().unwrap_or(0);

    let mut cells: Vec<HeatmapCell> = groups
        .into_iter()
        .map(|((region, subregion), members)| {
            let intensity = if max == 0 { 0.0 } else { members.len() as f64 / max as f64 };
            let dropoffs: Vec<Coordinate> = members.iter().filter_map(|r| r.dropoff).collect();
            HeatmapCell {
                region: region.to_string(),
                subregion: subregion.to_string(),
                center: centroid(&dropoffs),
                delivery_count: members.len(),
                intensity,
                color: intensity_color(intensity),
            }
        })
        .collect();

    // BTreeMap iteration already yields (region, subregion) ascending
    cells.sort_by(|a, b| b.delivery_count.cmp(&a.delivery_count));
    Ok(cells)
}

/// Blue for quiet cells through purple to red for the busiest
pub fn intensity_color(intensity: f64) -> String {
    let intensity = intensity.clamp(0.0, 1.0);
    let red = (intensity * 255.0) as u8;
    let blue = ((1.0 - intensity) * 255.0) as u8;
    format!("#{:02x}00{:02x}", red, blue)
}

fn validate_range(range: &TimeRange) -> Result<()> {
    if range.start > range.end {
        return Err(GeotrackError::validation(
            "time_range",
            format!("start {} is after end {}", range.start, range.end),
        ));
    }
    Ok(())
}

/// Heatmap request
#[derive(Debug, Clone)]
pub struct HeatmapQuery {
    pub range: TimeRange,
    pub region: Option<String>,
    pub subregion: Option<String>,
}

impl HeatmapQuery {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            region: None,
            subregion: None,
        }
    }

    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn in_subregion(mut self, subregion: impl Into<String>) -> Self {
        self.subregion = Some(subregion.into());
        self
    }
}

/// Builds heatmaps from the delivery history collaborator
#[derive(Clone)]
pub struct HeatmapAggregator {
    history: Arc<dyn DeliveryHistory>,
}

impl HeatmapAggregator {
    pub fn new(history: Arc<dyn DeliveryHistory>) -> Self {
        Self { history }
    }

    pub async fn heatmap(&self, query: &HeatmapQuery) -> Result<HeatmapSummary> {
        validate_range(&query.range)?;

        let records = self
            .history
            .query_deliveries(query.region.as_deref(), query.range)
            .await
            .map_err(|e| e.into_dependency("delivery-history"))?;

        let records: Vec<DeliveryRecord> = match &query.subregion {
            Some(subregion) => records.into_iter().filter(|r| &r.subregion == subregion).collect(),
            None => records,
        };

        let cells = aggregate(&records, query.range)?;
        tracing::debug!(records = records.len(), cells = cells.len(), "Heatmap aggregated");
        Ok(summarize(cells))
    }
}

/// Totals over a list of cells
pub fn summarize(cells: Vec<HeatmapCell>) -> HeatmapSummary {
    let regions: BTreeSet<&str> = cells.iter().map(|c| c.region.as_str()).collect();
    let subregions: BTreeSet<(&str, &str)> =
        cells.iter().map(|c| (c.region.as_str(), c.subregion.as_str())).collect();

    HeatmapSummary {
        total_deliveries: cells.iter().map(|c| c.delivery_count).sum(),
        total_regions: regions.len(),
        total_subregions: subregions.len(),
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use geotrack_core::models::DeliveryId;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn record(id: u64, region: &str, subregion: &str, hour: u32) -> DeliveryRecord {
        DeliveryRecord {
            delivery_id: DeliveryId(id),
            region: region.to_string(),
            subregion: subregion.to_string(),
            completed_at: at(hour),
            dropoff: None,
        }
    }

    #[test]
    fn test_ordering_and_intensity() {
        let records = vec![
            record(1, "Yeka", "03", 9),
            record(2, "Bole", "01", 9),
            record(3, "Bole", "01", 10),
            record(4, "Arada", "02", 11),
            record(5, "Bole", "02", 11),
        ];

        let cells = aggregate(&records, TimeRange::new(at(0), at(23))).unwrap();
        let keys: Vec<_> = cells
            .iter()
            .map(|c| (c.region.as_str(), c.subregion.as_str()))
            .collect();
        assert_eq!(keys, vec![("Bole", "01"), ("Arada", "02"), ("Bole", "02"), ("Yeka", "03")]);
        assert_eq!(cells[0].intensity, 1.0);
        assert_eq!(cells[1].intensity, 0.5);
        assert_eq!(cells[0].color, "#ff0000");
    }

    #[test]
    fn test_window_is_half_open() {
        let records = vec![record(1, "Bole", "01", 8), record(2, "Bole", "01", 10)];
        let cells = aggregate(&records, TimeRange::new(at(8), at(10))).unwrap();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].delivery_count, 1);
    }

    #[test]
    fn test_empty_window() {
        let cells = aggregate(&[], TimeRange::new(at(8), at(8))).unwrap();
        assert!(cells.is_empty());
    }

    #[test]
    fn test_inverted_window_rejected() {
        let err = aggregate(&[], TimeRange::new(at(10), at(8))).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_center_from_dropoffs() {
        let mut a = record(1, "Bole", "01", 9);
        a.dropoff = Some(Coordinate::new(9.0, 38.7));
        let mut b = record(2, "Bole", "01", 9);
        b.dropoff = Some(Coordinate::new(9.2, 38.9));
        let c = record(3, "Bole", "01", 9);

        let cells = aggregate(&[a, b, c], TimeRange::new(at(0), at(23))).unwrap();
        let center = cells[0].center.unwrap();
        assert!((center.lat - 9.1).abs() < 1e-9);
        assert!((center.lon - 38.8).abs() < 1e-9);
    }

    #[test]
    fn test_colors() {
        assert_eq!(intensity_color(0.0), "#0000ff");
        assert_eq!(intensity_color(1.0), "#ff0000");
        assert_eq!(intensity_color(0.5), "#7f007f");
    }

    #[test]
    fn test_summary_totals() {
        let records = vec![
            record(1, "Bole", "01", 9),
            record(2, "Bole", "02", 9),
            record(3, "Yeka", "01", 9),
        ];
        let summary = summarize(aggregate(&records, TimeRange::new(at(0), at(23))).unwrap());
        assert_eq!(summary.total_deliveries, 3);
        assert_eq!(summary.total_regions, 2);
        assert_eq!(summary.total_subregions, 3);
    }
}
