//! Adapts notification channels to the alert port.

use async_trait::async_trait;
use geotrack_core::config::{LayeredConfig, NotificationChannelKind};
use geotrack_core::error::{GeotrackError, Result};
use geotrack_core::models::Alert;
use geotrack_core::ports::AlertNotifier;
use std::sync::Arc;

use crate::log::LogChannel;
use crate::ports::{NotificationChannel, NotificationContent, NotificationOutcome, Recipient};
use crate::webhook::WebhookChannel;

/// Select the notification channel named by configuration
pub fn build_channel(config: &LayeredConfig) -> Result<Arc<dyn NotificationChannel>> {
    match config.notification_channel.value {
        NotificationChannelKind::Log => Ok(Arc::new(LogChannel::new())),
        NotificationChannelKind::Webhook => {
            let url = config
                .webhook_url
                .value
                .clone()
                .ok_or_else(|| GeotrackError::ConfigMissing {
                    key: "webhook_url".to_string(),
                })?;
            Ok(Arc::new(WebhookChannel::new(url)))
        }
    }
}

/// Sends geofence alerts to the parties following the delivery
#[derive(Clone)]
pub struct ChannelNotifier {
    channel: Arc<dyn NotificationChannel>,
}

impl ChannelNotifier {
    pub fn new(channel: Arc<dyn NotificationChannel>) -> Self {
        Self { channel }
    }

    pub fn channel_name(&self) -> &str {
        self.channel.name()
    }
}

/// Render an alert as notification content
pub fn alert_content(alert: &Alert) -> Result<NotificationContent> {
    Ok(NotificationContent {
        title: format!("Delivery {} geofence update", alert.delivery_id),
        body: format!("{} ({:.2} km from drop-off)", alert.message, alert.distance_km),
        data: serde_json::to_value(alert)?,
    })
}

#[async_trait]
impl AlertNotifier for ChannelNotifier {
    async fn notify(&self, alert: &Alert) -> Result<()> {
        let content = alert_content(alert)?;
        match self.channel.send(&Recipient::Delivery(alert.delivery_id), &content).await? {
            NotificationOutcome::Delivered { .. } => Ok(()),
            NotificationOutcome::Rejected { channel, reason } => {
                Err(GeotrackError::dependency(channel, reason))
            }
        }
    }
}
