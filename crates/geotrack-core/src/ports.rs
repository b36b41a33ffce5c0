//! Ports to the collaborators the tracking core depends on.
//!
//! Business entities live elsewhere; the core only reads delivery views and
//! hands alerts off for notification.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ActiveDelivery, Alert, DeliveryId, DeliveryRecord, TimeRange};

/// Port for looking up the live state of a delivery
#[async_trait]
pub trait DeliveryDirectory: Send + Sync {
    /// Get a delivery by ID, `None` when the directory does not know it
    async fn get_active_delivery(&self, id: DeliveryId) -> Result<Option<ActiveDelivery>>;
}

/// Port for completed-delivery history used by the heatmap
#[async_trait]
pub trait DeliveryHistory: Send + Sync {
    /// Deliveries completed inside `range`, optionally restricted to a region
    async fn query_deliveries(
        &self,
        region: Option<&str>,
        range: TimeRange,
    ) -> Result<Vec<DeliveryRecord>>;
}

/// Port for handing geofence alerts to a notification capability
#[async_trait]
pub trait AlertNotifier: Send + Sync {
    async fn notify(&self, alert: &Alert) -> Result<()>;
}
