//! Notification channels
//!
//! One channel is chosen from the `notifications.method` setting. Each
//! channel decides on its own what to send for an empty event list.

pub mod console;
pub mod email;
pub mod webhook;

pub use console::ConsoleNotifier;
pub use email::EmailNotifier;
pub use webhook::WebhookNotifier;

use crate::config::{NotificationConfig, NotificationMethod};
use crate::models::{ResortForecasts, SnowEvent};
use anyhow::Result;
use std::time::Duration;

/// Configured notification channel
#[derive(Debug, Clone)]
pub enum Notifier {
    Console(ConsoleNotifier),
    Email(EmailNotifier),
    Webhook(WebhookNotifier),
}

impl Notifier {
    /// Build the channel selected by `config.method`
    pub fn from_config(config: &NotificationConfig, timeout: Duration) -> Result<Self> {
        Ok(match config.method {
            NotificationMethod::Console => Self::Console(ConsoleNotifier::new(config.forecast_summary)),
            NotificationMethod::Email => Self::Email(EmailNotifier::from_config(&config.email)?),
            NotificationMethod::Webhook => Self::Webhook(WebhookNotifier::from_config(&config.webhook, timeout)?),
        })
    }

    #[must_use]
    pub fn method(&self) -> NotificationMethod {
        match self {
            Self::Console(_) => NotificationMethod::Console,
            Self::Email(_) => NotificationMethod::Email,
            Self::Webhook(_) => NotificationMethod::Webhook,
        }
    }

    /// Deliver `events`. `forecasts` feeds the optional console summary.
    pub async fn notify(
        &self,
        events: &[SnowEvent],
        always_notify: bool,
        forecasts: Option<&ResortForecasts>,
    ) -> Result<()> {
        match self {
            Self::Console(console) => {
                console.notify(events, forecasts);
                Ok(())
            }
            Self::Email(email) => email.notify(events, always_notify).await,
            Self::Webhook(webhook) => webhook.notify(events, always_notify).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EmailConfig, WebhookConfig};

    #[test]
    fn test_console_is_default_channel() {
        let notifier = Notifier::from_config(&NotificationConfig::default(), Duration::from_secs(5)).unwrap();
        assert_eq!(notifier.method(), NotificationMethod::Console);
    }

    #[test]
    fn test_webhook_channel_from_config() {
        let config = NotificationConfig {
            method: NotificationMethod::Webhook,
            webhook: WebhookConfig {
                url: Some("https://hooks.example.com/powder".into()),
            },
            ..NotificationConfig::default()
        };

        let notifier = Notifier::from_config(&config, Duration::from_secs(5)).unwrap();
        assert_eq!(notifier.method(), NotificationMethod::Webhook);
    }

    #[test]
    fn test_incomplete_email_channel_rejected() {
        let config = NotificationConfig {
            method: NotificationMethod::Email,
            email: EmailConfig {
                smtp_server: Some("smtp.example.com".into()),
                ..EmailConfig::default()
            },
            ..NotificationConfig::default()
        };

        assert!(Notifier::from_config(&config, Duration::from_secs(5)).is_err());
    }
}
