pub mod slack;

use thiserror::Error;

use crate::core::config::SlackSettings;
use crate::core::models::message::Message;
pub use self::slack::SlackNotifier;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("failed to build webhook HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("failed to deliver to Slack webhook: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Slack webhook returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// Validate a webhook URL before sending anything through it.
///
/// Incoming webhook URLs are bearer credentials, so plain HTTP and other
/// schemes are refused.
pub fn validate_webhook_url(url: &str) -> anyhow::Result<()> {
    if url.trim().is_empty() {
        anyhow::bail!("webhook URL is empty");
    }
    if !url.starts_with("https://") {
        anyhow::bail!("webhook URL must use HTTPS, got: {}", url);
    }
    Ok(())
}

/// Delivery capability with exactly two variants: administratively disabled,
/// or a Slack webhook sender.
pub enum Notifier {
    Disabled,
    Slack(SlackNotifier),
}

impl Notifier {
    /// Build a notifier from settings. Construction never fails the run:
    /// invalid webhook configuration downgrades to the disabled variant
    /// with a warning on stderr.
    pub fn from_settings(settings: &SlackSettings) -> Self {
        if !settings.enabled {
            return Self::Disabled;
        }
        if let Err(e) = validate_webhook_url(&settings.webhook_url) {
            eprintln!("warning: Slack delivery disabled: {e}");
            return Self::Disabled;
        }
        let timeout = slack::parse_timeout(&settings.timeout);
        match SlackNotifier::new(settings.webhook_url.clone(), timeout) {
            Ok(notifier) => Self::Slack(notifier),
            Err(e) => {
                eprintln!("warning: Slack delivery disabled: {e}");
                Self::Disabled
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Slack(_))
    }

    /// Deliver a message. The disabled variant succeeds without any
    /// external effect.
    pub async fn send(&self, message: &Message) -> Result<(), NotifyError> {
        match self {
            Self::Disabled => Ok(()),
            Self::Slack(notifier) => notifier.send(message).await,
        }
    }
}
