//! Notification port definitions

use async_trait::async_trait;
use geotrack_core::error::Result;
use geotrack_core::models::{DeliveryId, DriverId, PartnerId};
use serde::{Deserialize, Serialize};

/// Who a notification is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Recipient {
    Driver(DriverId),
    /// Everyone following a delivery (customer, dispatcher)
    Delivery(DeliveryId),
    Partner(PartnerId),
}

/// What is being said
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    /// Structured payload for machine consumers
    #[serde(default)]
    pub data: serde_json::Value,
}

/// How a channel handled a notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered { channel: String },
    /// The channel was reached but refused the notification
    Rejected { channel: String, reason: String },
}

impl NotificationOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, NotificationOutcome::Delivered { .. })
    }
}

/// Port for sending notifications
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Send `content` to `recipient`.
    ///
    /// Transport failures are errors; a reachable channel that declines the
    /// message reports [`NotificationOutcome::Rejected`].
    async fn send(
        &self,
        recipient: &Recipient,
        content: &NotificationContent,
    ) -> Result<NotificationOutcome>;

    /// Short identifier used in logs
    fn name(&self) -> &str;
}
