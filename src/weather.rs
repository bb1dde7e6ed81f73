//! Weather forecast sources
//!
//! `OpenMeteoClient` fetches daily snowfall from the Open-Meteo API (no API key
//! required). `DemoWeather` serves canned storm patterns for offline runs.

use crate::PowdertimeError;
use crate::models::{Coordinates, DailyForecast};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Longest forecast window Open-Meteo serves
pub const MAX_FORECAST_DAYS: u32 = 16;

const CM_PER_INCH: f64 = 2.54;

/// Source of daily forecasts for a point
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn fetch_forecast(&self, coordinates: &Coordinates, days: u32) -> Result<Vec<DailyForecast>>;
}

/// Client for the Open-Meteo daily forecast endpoint
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    timezone: String,
}

impl OpenMeteoClient {
    pub fn new(base_url: impl Into<String>, timezone: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("powdertime/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timezone: timezone.into(),
        })
    }

    fn forecast_url(&self, coordinates: &Coordinates, days: u32) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&daily=snowfall_sum,temperature_2m_max&temperature_unit=fahrenheit&forecast_days={}&timezone={}",
            self.base_url,
            coordinates.latitude,
            coordinates.longitude,
            days.min(MAX_FORECAST_DAYS),
            urlencoding::encode(&self.timezone)
        )
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoClient {
    #[instrument(skip(self, coordinates), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    async fn fetch_forecast(&self, coordinates: &Coordinates, days: u32) -> Result<Vec<DailyForecast>> {
        let start_time = Instant::now();
        let url = self.forecast_url(coordinates, days);
        debug!("OpenMeteo API request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Forecast request failed for {}", coordinates.format_coordinates()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PowdertimeError::api(format!(
                "Forecast API request failed with status: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            ))
            .into());
        }

        let forecast_response: openmeteo::ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse OpenMeteo forecast response")?;

        let forecasts = forecast_response.into_daily_forecasts()?;
        let total_duration = start_time.elapsed();

        info!(
            "Retrieved {} forecast days in {:.3}s",
            forecasts.len(),
            total_duration.as_secs_f64()
        );

        if total_duration.as_secs() > 5 {
            warn!("Slow forecast API response: {:.3}s", total_duration.as_secs_f64());
        }

        Ok(forecasts)
    }
}

/// `OpenMeteo` API response structures and conversion utilities
mod openmeteo {
    use super::{CM_PER_INCH, DailyForecast};
    use anyhow::{Context, Result};
    use chrono::NaiveDate;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub daily: Option<DailyData>,
    }

    /// Daily weather data from `OpenMeteo`
    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<String>,
        /// Centimetres
        #[serde(default)]
        pub snowfall_sum: Vec<Option<f64>>,
        #[serde(rename = "temperature_2m_max", default)]
        pub temperature_max: Vec<Option<f64>>,
    }

    impl ForecastResponse {
        /// Convert to inches per day; missing snowfall counts as none
        pub fn into_daily_forecasts(self) -> Result<Vec<DailyForecast>> {
            let Some(daily) = self.daily else {
                return Ok(Vec::new());
            };

            daily
                .time
                .iter()
                .enumerate()
                .map(|(i, date)| {
                    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                        .with_context(|| format!("Invalid forecast date: {date}"))?;
                    let snowfall_cm = daily.snowfall_sum.get(i).copied().flatten().unwrap_or(0.0);
                    let temperature_f = daily.temperature_max.get(i).copied().flatten();

                    Ok(DailyForecast::new(date, snowfall_cm / CM_PER_INCH, temperature_f))
                })
                .collect()
        }
    }
}

// Major storm mid-week, extended storm, weekend storm, minimal, steady but light
const DEMO_PATTERNS: [[f64; 10]; 5] = [
    [0.0, 0.0, 4.5, 6.2, 3.8, 0.0, 0.0, 1.2, 0.0, 0.0],
    [0.0, 1.0, 2.0, 5.0, 4.0, 1.5, 0.0, 0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.5, 3.5, 2.0, 1.0],
    [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0, 1.5, 2.0, 1.5, 1.0, 0.5, 0.5, 0.0, 0.0, 0.0],
];

/// Offline weather source cycling through fixed snowfall patterns
#[derive(Debug)]
pub struct DemoWeather {
    start: NaiveDate,
    next_pattern: AtomicUsize,
}

impl DemoWeather {
    /// Patterns start today
    #[must_use]
    pub fn new() -> Self {
        Self::starting(Local::now().date_naive())
    }

    #[must_use]
    pub fn starting(start: NaiveDate) -> Self {
        Self {
            start,
            next_pattern: AtomicUsize::new(0),
        }
    }
}

impl Default for DemoWeather {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WeatherSource for DemoWeather {
    async fn fetch_forecast(&self, _coordinates: &Coordinates, days: u32) -> Result<Vec<DailyForecast>> {
        let index = self.next_pattern.fetch_add(1, Ordering::Relaxed) % DEMO_PATTERNS.len();

        Ok(DEMO_PATTERNS[index]
            .iter()
            .take(days as usize)
            .enumerate()
            .filter_map(|(offset, &snow)| {
                let date = self.start.checked_add_days(Days::new(offset as u64))?;
                // Colder on snowier days
                Some(DailyForecast::new(date, snow, Some(28.0 - snow * 2.0)))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VAIL: Coordinates = Coordinates {
        latitude: 39.6403,
        longitude: -106.3742,
    };

    fn client(server: &MockServer) -> OpenMeteoClient {
        OpenMeteoClient::new(server.uri(), "America/Denver", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_forecast_converts_units() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("daily", "snowfall_sum,temperature_2m_max"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .and(query_param("forecast_days", "3"))
            .and(query_param("timezone", "America/Denver"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": {
                    "time": ["2026-01-12", "2026-01-13", "2026-01-14"],
                    "snowfall_sum": [25.4, null, 0.0],
                    "temperature_2m_max": [28.5, 30.1, null]
                }
            })))
            .mount(&mock_server)
            .await;

        let forecasts = client(&mock_server).fetch_forecast(&VAIL, 3).await.unwrap();

        assert_eq!(forecasts.len(), 3);
        assert_eq!(forecasts[0].date, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
        assert!((forecasts[0].snowfall_inches - 10.0).abs() < 1e-9);
        assert_eq!(forecasts[0].temperature_f, Some(28.5));
        assert_eq!(forecasts[1].snowfall_inches, 0.0);
        assert_eq!(forecasts[2].temperature_f, None);
    }

    #[tokio::test]
    async fn test_forecast_days_capped_at_provider_maximum() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("forecast_days", "16"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "daily": {"time": [], "snowfall_sum": [], "temperature_2m_max": []}
            })))
            .mount(&mock_server)
            .await;

        let forecasts = client(&mock_server).fetch_forecast(&VAIL, 30).await.unwrap();
        assert!(forecasts.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_forecast_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let result = client(&mock_server).fetch_forecast(&VAIL, 10).await;
        assert!(result.unwrap_err().to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_missing_daily_block_is_empty() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let forecasts = client(&mock_server).fetch_forecast(&VAIL, 10).await.unwrap();
        assert!(forecasts.is_empty());
    }

    #[tokio::test]
    async fn test_demo_weather_cycles_patterns() {
        let start = NaiveDate::from_ymd_opt(2026, 1, 12).unwrap();
        let demo = DemoWeather::starting(start);

        let first = demo.fetch_forecast(&VAIL, 10).await.unwrap();
        let second = demo.fetch_forecast(&VAIL, 5).await.unwrap();

        assert_eq!(first.len(), 10);
        assert_eq!(first[0].date, start);
        assert_eq!(first[3].snowfall_inches, 6.2);
        assert_eq!(first[3].temperature_f, Some(28.0 - 12.4));
        assert_eq!(second.len(), 5);
        assert_eq!(second[3].snowfall_inches, 5.0);
    }
}
