use geotrack_core::config::ConfigSource;
use geotrack_core::models::{DriverCluster, HeatmapCell, RouteWaypoint};
use serde::Serialize;
use tabled::Tabled;

/// Output for distance command
#[derive(Debug, Serialize)]
pub struct DistanceOutput {
    pub distance_km: f64,
    pub bearing_degrees: f64,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
    pub source: ConfigSource,
}

#[derive(Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

impl From<&ConfigEntry> for ConfigRow {
    fn from(entry: &ConfigEntry) -> Self {
        Self {
            key: entry.key.clone(),
            value: entry.value.clone(),
            source: format!("{:?}", entry.source),
        }
    }
}

#[derive(Tabled)]
pub struct LegRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Stop")]
    pub stop: String,
    #[tabled(rename = "Location")]
    pub location: String,
    #[tabled(rename = "From start (km)")]
    pub distance: String,
    #[tabled(rename = "ETA")]
    pub eta: String,
    #[tabled(rename = "Bearing")]
    pub bearing: String,
}

impl LegRow {
    pub fn new(index: usize, leg: &RouteWaypoint) -> Self {
        Self {
            index,
            stop: leg.label.clone().unwrap_or_else(|| "-".to_string()),
            location: format!("{:.5}, {:.5}", leg.location.lat, leg.location.lon),
            distance: format!("{:.2}", leg.distance_from_start_km),
            eta: format_duration(leg.duration_from_start_secs),
            bearing: leg
                .bearing_from_previous
                .map_or_else(|| "-".to_string(), |b| format!("{:.0}°", b)),
        }
    }
}

#[derive(Tabled)]
pub struct ClusterRow {
    #[tabled(rename = "Cluster")]
    pub id: String,
    #[tabled(rename = "Center")]
    pub center: String,
    #[tabled(rename = "Drivers")]
    pub count: usize,
    #[tabled(rename = "Members")]
    pub members: String,
}

impl From<&DriverCluster> for ClusterRow {
    fn from(cluster: &DriverCluster) -> Self {
        Self {
            id: cluster.cluster_id.clone(),
            center: format!("{:.5}, {:.5}", cluster.center_lat, cluster.center_long),
            count: cluster.driver_count(),
            members: cluster
                .member_driver_ids
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Tabled)]
pub struct HeatmapRow {
    #[tabled(rename = "Region")]
    pub region: String,
    #[tabled(rename = "Subregion")]
    pub subregion: String,
    #[tabled(rename = "Deliveries")]
    pub count: usize,
    #[tabled(rename = "Intensity")]
    pub intensity: String,
    #[tabled(rename = "Color")]
    pub color: String,
}

impl From<&HeatmapCell> for HeatmapRow {
    fn from(cell: &HeatmapCell) -> Self {
        Self {
            region: cell.region.clone(),
            subregion: cell.subregion.clone(),
            count: cell.delivery_count,
            intensity: format!("{:.2}", cell.intensity),
            color: cell.color.clone(),
        }
    }
}

/// Render seconds as "1h 05m", "12m 30s" or "45s"
pub fn format_duration(secs: u64) -> String {
    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m {:02}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(750), "12m 30s");
        assert_eq!(format_duration(3900), "1h 05m");
        assert_eq!(format_duration(0), "0s");
    }
}
