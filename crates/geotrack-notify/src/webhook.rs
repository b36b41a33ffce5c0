use async_trait::async_trait;
use geotrack_core::error::{GeotrackError, Result};
use serde::Serialize;

use crate::ports::{NotificationChannel, NotificationContent, NotificationOutcome, Recipient};

/// POSTs notifications as JSON to a configured URL
#[derive(Debug, Clone)]
pub struct WebhookChannel {
    url: String,
    client: reqwest::Client,
}

impl WebhookChannel {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Request body sent to the webhook
#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    recipient: &'a Recipient,
    #[serde(flatten)]
    content: &'a NotificationContent,
}

#[async_trait]
impl NotificationChannel for WebhookChannel {
    async fn send(
        &self,
        recipient: &Recipient,
        content: &NotificationContent,
    ) -> Result<NotificationOutcome> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { recipient, content })
            .send()
            .await
            .map_err(|e| {
                GeotrackError::dependency("webhook", format!("Failed to reach {}: {}", self.url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(url = %self.url, %status, "Webhook refused notification");
            return Ok(NotificationOutcome::Rejected {
                channel: self.name().to_string(),
                reason: format!("{}: {}", status, error_text),
            });
        }

        Ok(NotificationOutcome::Delivered {
            channel: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "webhook"
    }
}
