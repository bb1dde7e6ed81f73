//! Daily forecast and snow event models

use super::Resort;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Forecast windows keyed by resort, in insertion order
pub type ResortForecasts = Vec<(Resort, Vec<DailyForecast>)>;

/// Forecast for a single calendar day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Snowfall in inches
    pub snowfall_inches: f64,
    /// Daily maximum temperature in Fahrenheit
    pub temperature_f: Option<f64>,
}

impl DailyForecast {
    #[must_use]
    pub fn new(date: NaiveDate, snowfall_inches: f64, temperature_f: Option<f64>) -> Self {
        Self {
            date,
            snowfall_inches,
            temperature_f,
        }
    }
}

/// Sum of snowfall over a forecast window
#[must_use]
pub fn total_snowfall(forecasts: &[DailyForecast]) -> f64 {
    forecasts.iter().map(|f| f.snowfall_inches).sum()
}

/// A significant snowfall event at one resort
#[derive(Debug, Clone, Serialize)]
pub struct SnowEvent {
    pub resort: Resort,
    /// Days with non-zero snowfall, in date order
    pub forecasts: Vec<DailyForecast>,
    /// Total over the whole forecast window
    pub total_snowfall: f64,
    /// Largest single-day amount over the whole forecast window
    pub max_daily_snowfall: f64,
}

impl SnowEvent {
    /// First day with snow
    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.forecasts.first().map(|f| f.date)
    }

    /// Last day with snow
    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        self.forecasts.last().map(|f| f.date)
    }

    /// Human-readable multi-line summary used by every notification channel
    #[must_use]
    pub fn summary(&self) -> String {
        let snow_days: Vec<&DailyForecast> = self
            .forecasts
            .iter()
            .filter(|f| f.snowfall_inches > 0.0)
            .collect();

        let mut summary = format!("🎿 {}\n", self.resort.display_name());
        let _ = writeln!(
            summary,
            "   Total: {:.1}\" over {} day(s)",
            self.total_snowfall,
            snow_days.len()
        );
        let _ = writeln!(summary, "   Biggest day: {:.1}\"", self.max_daily_snowfall);
        summary.push_str("   Snow days:\n");

        for forecast in snow_days {
            let _ = write!(
                summary,
                "      • {}: {:.1}\"",
                forecast.date.format("%a %b %d"),
                forecast.snowfall_inches
            );
            if let Some(high) = forecast.temperature_f {
                let _ = write!(summary, " (High: {high:.0}°F)");
            }
            summary.push('\n');
        }

        summary
    }
}

impl std::fmt::Display for SnowEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SnowEvent({}, {:.1}in)", self.resort.name, self.total_snowfall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32, snow: f64, temp: Option<f64>) -> DailyForecast {
        DailyForecast::new(NaiveDate::from_ymd_opt(2026, 1, d).unwrap(), snow, temp)
    }

    fn event(forecasts: Vec<DailyForecast>) -> SnowEvent {
        SnowEvent {
            resort: Resort::new("Test Resort", 39.0, -106.0, Some(9000), Some("CO".into())),
            total_snowfall: total_snowfall(&forecasts),
            max_daily_snowfall: 8.0,
            forecasts,
        }
    }

    #[test]
    fn test_total_snowfall() {
        let forecasts = vec![day(12, 1.0, None), day(13, 0.5, None)];
        assert_eq!(total_snowfall(&forecasts), 1.5);
        assert_eq!(total_snowfall(&[]), 0.0);
    }

    #[test]
    fn test_start_and_end_dates() {
        let ev = event(vec![day(12, 3.0, None), day(14, 5.0, None)]);
        assert_eq!(ev.start_date(), NaiveDate::from_ymd_opt(2026, 1, 12));
        assert_eq!(ev.end_date(), NaiveDate::from_ymd_opt(2026, 1, 14));

        let empty = event(vec![]);
        assert_eq!(empty.start_date(), None);
        assert_eq!(empty.end_date(), None);
    }

    #[test]
    fn test_summary_lists_snow_days() {
        let ev = event(vec![day(12, 8.0, Some(28.0)), day(13, 2.0, None)]);
        let summary = ev.summary();

        assert!(summary.starts_with("🎿 Test Resort, CO"));
        assert!(summary.contains("Total: 10.0\" over 2 day(s)"));
        assert!(summary.contains("Biggest day: 8.0\""));
        assert!(summary.contains("• Mon Jan 12: 8.0\" (High: 28°F)"));
        assert!(summary.contains("• Tue Jan 13: 2.0\"\n"));
    }

    #[test]
    fn test_display() {
        let ev = event(vec![day(12, 8.0, None)]);
        assert_eq!(ev.to_string(), "SnowEvent(Test Resort, 8.0in)");
    }
}
