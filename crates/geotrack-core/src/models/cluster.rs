use serde::{Deserialize, Serialize};

use super::DriverId;

/// A group of nearby drivers computed for a single dashboard query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverCluster {
    pub cluster_id: String,
    pub center_lat: f64,
    pub center_long: f64,
    pub member_driver_ids: Vec<DriverId>,
    pub radius_km: f64,
}

impl DriverCluster {
    pub fn driver_count(&self) -> usize {
        self.member_driver_ids.len()
    }
}

/// Clusters plus totals for the dashboard view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterSummary {
    pub total_clusters: usize,
    pub total_drivers: usize,
    pub clusters: Vec<DriverCluster>,
}

impl ClusterSummary {
    pub fn from_clusters(clusters: Vec<DriverCluster>) -> Self {
        Self {
            total_clusters: clusters.len(),
            total_drivers: clusters.iter().map(DriverCluster::driver_count).sum(),
            clusters,
        }
    }
}
