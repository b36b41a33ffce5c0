use std::sync::Arc;
use std::time::Duration;

use geotrack_core::config::LayeredConfig;
use geotrack_core::ports::AlertNotifier;
use geotrack_engine::TrackingService;
use geotrack_store::{MemoryDeliveryDirectory, MemoryDeliveryHistory};

#[derive(Clone)]
pub struct AppState {
    pub tracking: Arc<TrackingService>,
    /// The directory the tracking service consults during geofence checks
    pub directory: MemoryDeliveryDirectory,
    /// The history heatmaps are aggregated from
    pub history: MemoryDeliveryHistory,
    pub request_timeout: Duration,
}

impl AppState {
    /// Build a tracking service over in-memory delivery collaborators that
    /// the handlers keep up to date.
    pub fn in_memory(
        config: &LayeredConfig,
        notifier: Arc<dyn AlertNotifier>,
        request_timeout: Duration,
    ) -> Self {
        let directory = MemoryDeliveryDirectory::new();
        let history = MemoryDeliveryHistory::new();
        let tracking = TrackingService::new(
            config,
            Arc::new(directory.clone()),
            Arc::new(history.clone()),
            notifier,
        );

        Self {
            tracking: Arc::new(tracking),
            directory,
            history,
            request_timeout,
        }
    }
}
