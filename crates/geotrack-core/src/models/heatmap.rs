use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Half-open time window `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }
}

/// Delivery density for one administrative area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    pub region: String,
    pub subregion: String,

    /// Mean drop-off location, when the records carry one
    pub center: Option<Coordinate>,

    pub delivery_count: usize,

    /// `delivery_count` normalized against the busiest cell, in `[0, 1]`
    pub intensity: f64,

    /// Display color from blue (quiet) to red (busy)
    pub color: String,
}

/// Heatmap cells plus totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapSummary {
    pub total_deliveries: usize,
    pub total_regions: usize,
    pub total_subregions: usize,
    pub cells: Vec<HeatmapCell>,
}
