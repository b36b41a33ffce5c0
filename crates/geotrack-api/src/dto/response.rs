use geotrack_core::models::{Alert, GeofenceState, IngestOutcome};
use geotrack_engine::IngestReport;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok",
            service: "geotrack-api",
        }
    }
}

/// Location ingestion result
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub status: IngestOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<Alert>,
}

impl From<IngestReport> for IngestResponse {
    fn from(report: IngestReport) -> Self {
        Self {
            status: report.outcome,
            alert: report.alert,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

impl DeleteResponse {
    pub fn success(entity: &str, id: impl std::fmt::Display) -> Self {
        Self {
            success: true,
            message: format!("{} '{}' removed", entity, id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GeofenceStateResponse {
    pub driver_id: u64,
    pub delivery_id: u64,
    pub state: GeofenceState,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    /// Subscribers the update was handed to
    pub delivered_to: usize,
}

/// Frame sent on a realtime socket after events were dropped for it
#[derive(Debug, Serialize)]
pub struct LagNotice {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub missed: u64,
}

impl LagNotice {
    pub fn new(missed: u64) -> Self {
        Self {
            kind: "LAGGED",
            missed,
        }
    }
}
