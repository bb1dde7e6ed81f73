use crate::config::EmailConfig;
use crate::models::SnowEvent;
use anyhow::{Context, Result, anyhow, bail};
use lettre::{
    Message, Transport, transport::smtp::SmtpTransport,
    transport::smtp::authentication::Credentials,
};

/// SMTP channel using STARTTLS
#[derive(Debug, Clone)]
pub struct EmailNotifier {
    smtp_server: String,
    smtp_port: u16,
    from_email: String,
    to_email: String,
    password: String,
}

impl EmailNotifier {
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let missing = config.missing_fields();
        if !missing.is_empty() {
            bail!("Email configuration incomplete, missing: {}", missing.join(", "));
        }

        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Ok(Self {
            smtp_server: field(&config.smtp_server),
            smtp_port: config.smtp_port,
            from_email: field(&config.from_email),
            to_email: field(&config.to_email),
            password: field(&config.password),
        })
    }

    fn create_mailer(&self) -> Result<SmtpTransport> {
        let credentials = Credentials::new(self.from_email.clone(), self.password.clone());

        let mailer = SmtpTransport::starttls_relay(&self.smtp_server)?
            .port(self.smtp_port)
            .credentials(credentials)
            .build();

        Ok(mailer)
    }

    /// Subject and body for `events`, or `None` when nothing should be sent
    #[must_use]
    pub fn compose(events: &[SnowEvent], always_notify: bool) -> Option<(String, String)> {
        if events.is_empty() {
            return always_notify.then(|| {
                (
                    "✅ Powdertime Check Complete - No Significant Snow".to_string(),
                    "Powdertime ran successfully.\n\nNo significant snowfall forecasted at monitored resorts.\n"
                        .to_string(),
                )
            });
        }

        let mut body = String::from("Significant snowfall forecasted at the following resort(s):\n\n");
        for event in events {
            body.push_str(&event.summary());
            body.push('\n');
        }

        Some((
            format!("❄️ Powder Alert! {} Resort(s) with Significant Snow", events.len()),
            body,
        ))
    }

    pub async fn notify(&self, events: &[SnowEvent], always_notify: bool) -> Result<()> {
        let Some((subject, body)) = Self::compose(events, always_notify) else {
            tracing::debug!("No snow events, skipping email");
            return Ok(());
        };

        let email = Message::builder()
            .from(
                format!("Powdertime <{}>", self.from_email)
                    .parse()
                    .context("Failed to parse from address")?,
            )
            .to(self.to_email.parse().context("Failed to parse to address")?)
            .subject(subject)
            .body(body)?;

        let mailer = self.create_mailer()?;

        tokio::task::spawn_blocking(move || mailer.send(&email))
            .await
            .map_err(|e| anyhow!("Email task failed: {e}"))?
            .context("Failed to send email")?;

        tracing::info!("Sent email notification to {}", self.to_email);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyForecast, Resort};
    use chrono::NaiveDate;

    fn event(name: &str) -> SnowEvent {
        SnowEvent {
            resort: Resort::new(name, 40.6, -111.6, Some(9600), Some("UT".into())),
            forecasts: vec![DailyForecast::new(
                NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
                9.0,
                Some(22.0),
            )],
            total_snowfall: 9.0,
            max_daily_snowfall: 9.0,
        }
    }

    #[test]
    fn test_compose_alert() {
        let (subject, body) = EmailNotifier::compose(&[event("Alta"), event("Snowbird")], false).unwrap();

        assert_eq!(subject, "❄️ Powder Alert! 2 Resort(s) with Significant Snow");
        assert!(body.contains("🎿 Alta, UT"));
        assert!(body.contains("🎿 Snowbird, UT"));
    }

    #[test]
    fn test_compose_without_events() {
        assert!(EmailNotifier::compose(&[], false).is_none());

        let (subject, _) = EmailNotifier::compose(&[], true).unwrap();
        assert_eq!(subject, "✅ Powdertime Check Complete - No Significant Snow");
    }

    #[test]
    fn test_from_config_lists_missing_fields() {
        let config = EmailConfig {
            smtp_server: Some("smtp.example.com".into()),
            from_email: Some("alerts@example.com".into()),
            ..EmailConfig::default()
        };

        let err = EmailNotifier::from_config(&config).unwrap_err().to_string();
        assert!(err.contains("to_email"));
        assert!(err.contains("password"));
        assert!(!err.contains("smtp_server"));
    }

    #[tokio::test]
    async fn test_nothing_sent_without_events() {
        let config = EmailConfig {
            smtp_server: Some("smtp.invalid".into()),
            smtp_port: 587,
            from_email: Some("alerts@example.com".into()),
            to_email: Some("me@example.com".into()),
            password: Some("secret".into()),
        };

        let notifier = EmailNotifier::from_config(&config).unwrap();
        assert!(notifier.notify(&[], false).await.is_ok());
    }
}
