use async_trait::async_trait;
use geotrack_core::error::Result;

use crate::ports::{NotificationChannel, NotificationContent, NotificationOutcome, Recipient};

/// Writes notifications to the log. Useful in development and as a fallback.
#[derive(Debug, Clone, Default)]
pub struct LogChannel;

impl LogChannel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationChannel for LogChannel {
    async fn send(
        &self,
        recipient: &Recipient,
        content: &NotificationContent,
    ) -> Result<NotificationOutcome> {
        tracing::info!(
            recipient = ?recipient,
            title = %content.title,
            body = %content.body,
            "Notification"
        );
        Ok(NotificationOutcome::Delivered {
            channel: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotrack_core::models::DriverId;

    #[tokio::test]
    async fn test_log_channel_always_delivers() {
        let channel = LogChannel::new();
        let content = NotificationContent {
            title: "Geofence".to_string(),
            body: "Driver is within delivery zone".to_string(),
            data: serde_json::Value::Null,
        };

        let outcome = channel.send(&Recipient::Driver(DriverId(1)), &content).await.unwrap();
        assert_eq!(outcome, NotificationOutcome::Delivered {
            channel: "log".to_string(),
        });
    }
}
