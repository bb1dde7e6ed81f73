//! Webhook channel: POSTs a JSON payload

use crate::PowdertimeError;
use crate::config::WebhookConfig;
use crate::models::SnowEvent;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

const STATUS_CHECK_MESSAGE: &str = "Powdertime check complete - no significant snowfall forecasted";

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
enum AlertType {
    PowderAlert,
    StatusCheck,
}

#[derive(Debug, Serialize)]
struct WebhookPayload {
    alert_type: AlertType,
    event_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    events: Vec<EventPayload>,
}

#[derive(Debug, Serialize)]
struct EventPayload {
    resort_name: String,
    resort_state: Option<String>,
    total_snowfall_inches: f64,
    max_daily_snowfall_inches: f64,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl From<&SnowEvent> for EventPayload {
    fn from(event: &SnowEvent) -> Self {
        Self {
            resort_name: event.resort.name.clone(),
            resort_state: event.resort.state.clone(),
            total_snowfall_inches: event.total_snowfall,
            max_daily_snowfall_inches: event.max_daily_snowfall,
            start_date: event.start_date(),
            end_date: event.end_date(),
        }
    }
}

impl WebhookPayload {
    fn for_events(events: &[SnowEvent], always_notify: bool) -> Option<Self> {
        if events.is_empty() {
            return always_notify.then(|| Self {
                alert_type: AlertType::StatusCheck,
                event_count: 0,
                message: Some(STATUS_CHECK_MESSAGE),
                events: Vec::new(),
            });
        }

        Some(Self {
            alert_type: AlertType::PowderAlert,
            event_count: events.len(),
            message: None,
            events: events.iter().map(EventPayload::from).collect(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &WebhookConfig, timeout: Duration) -> Result<Self> {
        let url = config
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| anyhow!("Webhook URL not configured"))?;
        Self::new(url, timeout)
    }

    pub async fn notify(&self, events: &[SnowEvent], always_notify: bool) -> Result<()> {
        let Some(payload) = WebhookPayload::for_events(events, always_notify) else {
            debug!("No snow events, skipping webhook");
            return Ok(());
        };

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .with_context(|| format!("Webhook request to {} failed", self.url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PowdertimeError::notification(format!("Webhook returned status: {status}")).into());
        }

        info!(event_count = payload.event_count, "Sent webhook notification to {}", self.url);
        Ok(())
    }
}
