use std::time::Duration;

use crate::core::models::message::Message;
use crate::core::notify::NotifyError;

/// Applied when the configured timeout is empty or unparsable.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Parse a configured delivery timeout like "10s" or "500ms", falling back
/// to the default rather than failing the run.
pub fn parse_timeout(raw: &str) -> Duration {
    humantime::parse_duration(raw.trim()).unwrap_or(DEFAULT_TIMEOUT)
}

/// Webhook-based sender for Slack incoming webhooks. Stateless: each send is
/// one POST of the serialized message.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NotifyError::Client)?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    pub async fn send(&self, message: &Message) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
