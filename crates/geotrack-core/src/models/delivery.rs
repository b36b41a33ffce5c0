//! Delivery views consumed from the delivery collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinate, DeliveryId, DriverId, PartnerId};

/// Lifecycle status of a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    Pending,
    PickedUp,
    InTransit,
    InProgress,
    Overdue,
    Delivered,
    Canceled,
}

impl DeliveryStatus {
    /// Delivered and canceled deliveries no longer need tracking
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Delivered | DeliveryStatus::Canceled)
    }
}

/// Delivery as reported by the delivery directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveDelivery {
    pub delivery_id: DeliveryId,
    pub status: DeliveryStatus,
    pub assigned_driver_id: Option<DriverId>,
    #[serde(default)]
    pub partner_id: Option<PartnerId>,
    #[serde(default)]
    pub region: Option<String>,
}

/// Completed delivery used for heatmap aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub delivery_id: DeliveryId,
    pub region: String,
    pub subregion: String,
    pub completed_at: DateTime<Utc>,
    #[serde(default)]
    pub dropoff: Option<Coordinate>,
}

/// Status change pushed to observers of a delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryStatusUpdate {
    pub delivery_id: DeliveryId,
    pub status: DeliveryStatus,
    #[serde(default)]
    pub driver_id: Option<DriverId>,
    #[serde(default)]
    pub partner_id: Option<PartnerId>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub updated_at: DateTime<Utc>,
}
