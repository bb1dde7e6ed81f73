//! Application orchestration
//!
//! Wires the resort finder, weather source, analyzer and notifier into a
//! single check, and repeats it in watch mode.

use crate::PowdertimeError;
use crate::analyzer::SnowAnalyzer;
use crate::config::PowdertimeConfig;
use crate::geocoding::Geocoder;
use crate::location_resolver::LocationSpec;
use crate::models::forecast::total_snowfall;
use crate::models::{Resort, ResortForecasts, SnowEvent};
use crate::notifier::Notifier;
use crate::resorts::ResortFinder;
use crate::weather::WeatherSource;
use anyhow::Result;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const SECONDS_PER_HOUR: u64 = 60 * 60;

/// Sleep between watch-mode checks, saturating for huge hour counts
fn check_interval(hours: u64) -> Duration {
    Duration::from_secs(hours.saturating_mul(SECONDS_PER_HOUR))
}

/// Outcome of one check
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Candidate resorts, in search order
    pub resorts: Vec<Resort>,
    /// Forecasts that were fetched, in candidate order
    pub forecasts: ResortForecasts,
    /// Significant events, largest total first
    pub events: Vec<SnowEvent>,
}

impl RunReport {
    /// Resorts whose forecast could not be fetched or came back empty
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.resorts.len() - self.forecasts.len()
    }
}

pub struct PowdertimeApp<G, W> {
    config: PowdertimeConfig,
    finder: ResortFinder<'static, G>,
    weather: W,
    analyzer: SnowAnalyzer,
    notifier: Notifier,
}

impl<G: Geocoder, W: WeatherSource> PowdertimeApp<G, W> {
    pub fn new(config: PowdertimeConfig, geocoder: G, weather: W, notifier: Notifier) -> Self {
        let analyzer = SnowAnalyzer::new(config.snow_threshold.min_inches);
        Self {
            config,
            finder: ResortFinder::new(geocoder),
            weather,
            analyzer,
            notifier,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PowdertimeConfig {
        &self.config
    }

    /// Resorts to check: the manual list when configured, otherwise every
    /// catalog resort within the search radius of the configured location.
    pub async fn candidate_resorts(&self) -> Result<Vec<Resort>> {
        if let Some(specs) = self.config.resorts.as_deref().filter(|s| !s.is_empty()) {
            let resorts = self.finder.resolve_manual_list(specs)?;
            println!("📋 Monitoring {} configured resort(s)", resorts.len());
            return Ok(resorts);
        }

        let location = LocationSpec::from_config(&self.config.location)?;
        let origin = self.finder.resolve_origin(&location).await?;
        println!(
            "📍 Location: {} ({})",
            location.label(),
            origin.format_coordinates()
        );

        let radius = self.config.search_radius_miles;
        println!("🔍 Searching for ski resorts within {radius} miles...");
        let nearby = self.finder.find_nearby_with_distance(&origin, radius);

        if nearby.is_empty() {
            return Err(
                PowdertimeError::general(format!("No ski resorts found within {radius} miles")).into(),
            );
        }

        println!("✅ Found {} resort(s)", nearby.len());
        for (resort, distance) in &nearby {
            println!("   • {} ({distance:.1} miles)", resort.display_name());
        }

        Ok(nearby.into_iter().map(|(resort, _)| resort).collect())
    }

    /// Fetch forecasts one resort at a time. Failed or empty fetches are
    /// skipped; the rest keep candidate order.
    pub async fn fetch_forecasts(&self, resorts: &[Resort]) -> ResortForecasts {
        let days = self.config.snow_threshold.forecast_days;
        println!("\n🌤️  Fetching {days}-day forecasts...");

        let mut forecasts = ResortForecasts::with_capacity(resorts.len());
        for resort in resorts {
            match self.weather.fetch_forecast(&resort.coordinates, days).await {
                Ok(daily) if daily.is_empty() => {
                    warn!(resort = %resort.name, "Empty forecast, skipping");
                }
                Ok(daily) => {
                    debug!(resort = %resort.name, total = total_snowfall(&daily), "Forecast fetched");
                    forecasts.push((resort.clone(), daily));
                }
                Err(e) => {
                    warn!(resort = %resort.name, "Failed to fetch forecast: {e:#}");
                }
            }
        }

        forecasts
    }

    /// One full check: find resorts, fetch, analyze, notify.
    ///
    /// Notification failures are logged and do not fail the run.
    pub async fn run_once(&self, always_notify: bool) -> Result<RunReport> {
        let resorts = self.candidate_resorts().await?;
        let forecasts = self.fetch_forecasts(&resorts).await;

        println!(
            "\n❄️  Analyzing for significant snowfall (threshold: {}\")",
            self.analyzer.threshold_inches()
        );
        let events = self.analyzer.find_significant(&forecasts);

        info!(
            resorts = resorts.len(),
            fetched = forecasts.len(),
            events = events.len(),
            "Check complete"
        );

        if let Err(e) = self
            .notifier
            .notify(&events, always_notify, Some(&forecasts))
            .await
        {
            error!(method = ?self.notifier.method(), "{}", PowdertimeError::notification(format!("{e:#}")));
        }

        Ok(RunReport {
            resorts,
            forecasts,
            events,
        })
    }

    /// Run checks forever, `check_frequency_hours` apart. A failed check is
    /// logged and retried at the next interval.
    pub async fn watch(&self, always_notify: bool) -> Result<()> {
        let interval = check_interval(self.config.check_frequency_hours);
        info!(
            "Watching every {} hour(s)",
            self.config.check_frequency_hours
        );

        loop {
            if let Err(e) = self.run_once(always_notify).await {
                error!("Check failed: {e:#}");
            }
            debug!("Next check in {}s", interval.as_secs());
            tokio::time::sleep(interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::GeocodeQuery;
    use crate::models::{Coordinates, DailyForecast};
    use crate::notifier::ConsoleNotifier;
    use crate::resorts::ResortSpec;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct NoGeocoder;

    #[async_trait]
    impl Geocoder for NoGeocoder {
        async fn geocode(&self, _query: &GeocodeQuery) -> Result<Option<Coordinates>> {
            Ok(None)
        }
    }

    /// Snowfall keyed by latitude; unknown latitudes fail
    struct TableWeather(Vec<(f64, Vec<f64>)>);

    #[async_trait]
    impl WeatherSource for TableWeather {
        async fn fetch_forecast(&self, coordinates: &Coordinates, _days: u32) -> Result<Vec<DailyForecast>> {
            let (_, snow) = self
                .0
                .iter()
                .find(|(lat, _)| *lat == coordinates.latitude)
                .ok_or_else(|| anyhow!("upstream unavailable"))?;
            Ok(snow
                .iter()
                .enumerate()
                .map(|(i, &s)| DailyForecast::new(NaiveDate::from_ymd_opt(2026, 2, 1 + i as u32).unwrap(), s, None))
                .collect())
        }
    }

    fn manual_config(resorts: Vec<ResortSpec>) -> PowdertimeConfig {
        let mut config = PowdertimeConfig::default();
        config.resorts = Some(resorts);
        config.notifications.forecast_summary = false;
        config
    }

    fn app(config: PowdertimeConfig, weather: TableWeather) -> PowdertimeApp<NoGeocoder, TableWeather> {
        PowdertimeApp::new(config, NoGeocoder, weather, Notifier::Console(ConsoleNotifier::new(false)))
    }

    #[tokio::test]
    async fn test_failed_and_empty_fetches_are_skipped() {
        let config = manual_config(vec![
            ResortSpec::custom("Deep", 41.0, -106.0),
            ResortSpec::custom("Broken", 42.0, -106.0),
            ResortSpec::custom("Blank", 43.0, -106.0),
            ResortSpec::custom("Light", 44.0, -106.0),
        ]);
        let weather = TableWeather(vec![
            (41.0, vec![4.0, 5.0]),
            (43.0, vec![]),
            (44.0, vec![1.0]),
        ]);

        let report = app(config, weather).run_once(false).await.unwrap();

        let fetched: Vec<&str> = report.forecasts.iter().map(|(r, _)| r.name.as_str()).collect();
        assert_eq!(fetched, vec!["Deep", "Light"]);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].resort.name, "Deep");
    }

    #[tokio::test]
    async fn test_unknown_manual_resort_fails_run() {
        let config = manual_config(vec![ResortSpec::named("Nonexistent")]);
        let err = app(config, TableWeather(vec![])).run_once(false).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<PowdertimeError>(),
            Some(PowdertimeError::UnknownResort { .. })
        ));
    }

    #[tokio::test]
    async fn test_unresolvable_location_is_geocode_error() {
        let mut config = PowdertimeConfig::default();
        config.location.city = Some("Atlantis".into());

        let err = app(config, TableWeather(vec![])).candidate_resorts().await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PowdertimeError>(),
            Some(PowdertimeError::Geocode { .. })
        ));
    }

    #[tokio::test]
    async fn test_no_resorts_in_radius() {
        let mut config = PowdertimeConfig::default();
        config.location.latitude = Some(0.0);
        config.location.longitude = Some(0.0);
        config.search_radius_miles = 50.0;

        let err = app(config, TableWeather(vec![])).candidate_resorts().await.unwrap_err();
        assert!(err.to_string().contains("No ski resorts found within 50 miles"));
    }

    #[test]
    fn test_check_interval() {
        assert_eq!(check_interval(6), Duration::from_secs(6 * 3600));
        assert_eq!(check_interval(u64::MAX), Duration::from_secs(u64::MAX));
    }
}
