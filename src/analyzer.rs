//! Snow accumulation analyzer
//!
//! Reduces per-resort daily forecasts into significant snowfall events.

use crate::models::forecast::total_snowfall;
use crate::models::{DailyForecast, Resort, ResortForecasts, SnowEvent};

/// Detects forecast windows whose total snowfall reaches a threshold
#[derive(Debug, Clone, Copy)]
pub struct SnowAnalyzer {
    threshold_inches: f64,
}

impl SnowAnalyzer {
    #[must_use]
    pub fn new(threshold_inches: f64) -> Self {
        Self { threshold_inches }
    }

    #[must_use]
    pub fn threshold_inches(&self) -> f64 {
        self.threshold_inches
    }

    /// Analyze one resort's forecast window.
    ///
    /// Returns `None` for an empty window or when the total is below the
    /// threshold; a total exactly at the threshold qualifies. Total and max
    /// cover the whole window, while the event only keeps days with snow.
    #[must_use]
    pub fn analyze(&self, resort: &Resort, forecasts: &[DailyForecast]) -> Option<SnowEvent> {
        if forecasts.is_empty() {
            return None;
        }

        let total = total_snowfall(forecasts);
        if total < self.threshold_inches {
            return None;
        }

        let max_daily = forecasts
            .iter()
            .map(|f| f.snowfall_inches)
            .fold(0.0, f64::max);

        let snow_days: Vec<DailyForecast> = forecasts
            .iter()
            .filter(|f| f.snowfall_inches > 0.0)
            .cloned()
            .collect();

        Some(SnowEvent {
            resort: resort.clone(),
            forecasts: snow_days,
            total_snowfall: total,
            max_daily_snowfall: max_daily,
        })
    }

    /// All significant events, largest total first.
    ///
    /// Equal totals keep the order of `resort_forecasts`.
    #[must_use]
    pub fn find_significant(&self, resort_forecasts: &ResortForecasts) -> Vec<SnowEvent> {
        let mut events: Vec<SnowEvent> = resort_forecasts
            .iter()
            .filter_map(|(resort, forecasts)| self.analyze(resort, forecasts))
            .collect();

        events.sort_by(|a, b| b.total_snowfall.total_cmp(&a.total_snowfall));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn resort(name: &str) -> Resort {
        Resort::new(name, 39.0, -106.0, Some(9000), Some("CO".into()))
    }

    fn window(snowfall: &[f64]) -> Vec<DailyForecast> {
        snowfall
            .iter()
            .enumerate()
            .map(|(i, &snow)| {
                DailyForecast::new(
                    NaiveDate::from_ymd_opt(2026, 1, 12 + i as u32).unwrap(),
                    snow,
                    Some(28.0 - i as f64),
                )
            })
            .collect()
    }

    #[test]
    fn test_analyze_forecast_significant() {
        let analyzer = SnowAnalyzer::new(6.0);
        let forecasts = window(&[3.0, 5.0, 2.0, 0.0]);

        let event = analyzer.analyze(&resort("Test Resort"), &forecasts).unwrap();

        assert_eq!(event.total_snowfall, 10.0);
        assert_eq!(event.max_daily_snowfall, 5.0);
        assert_eq!(event.forecasts.len(), 3, "Should only include days with snow");
        assert_eq!(event.forecasts, forecasts[..3].to_vec());
        assert_eq!(event.start_date(), NaiveDate::from_ymd_opt(2026, 1, 12));
        assert_eq!(event.end_date(), NaiveDate::from_ymd_opt(2026, 1, 14));
    }

    #[test]
    fn test_analyze_forecast_insignificant() {
        let analyzer = SnowAnalyzer::new(6.0);
        let event = analyzer.analyze(&resort("Test Resort"), &window(&[1.0, 2.0, 1.5]));
        assert!(event.is_none(), "Should not detect event below threshold");
    }

    #[test]
    fn test_analyze_empty_window() {
        assert!(SnowAnalyzer::new(0.0).analyze(&resort("Test Resort"), &[]).is_none());
    }

    #[rstest]
    #[case(&[3.0, 3.0], true)]
    #[case(&[6.0], true)]
    #[case(&[5.9], false)]
    #[case(&[2.0, 0.0, 3.99], false)]
    fn test_threshold_boundary_is_inclusive(#[case] snowfall: &[f64], #[case] expected: bool) {
        let analyzer = SnowAnalyzer::new(6.0);
        let event = analyzer.analyze(&resort("Test Resort"), &window(snowfall));
        assert_eq!(event.is_some(), expected);
    }

    #[test]
    fn test_zero_threshold_with_no_snow_does_not_panic() {
        let analyzer = SnowAnalyzer::new(0.0);
        let event = analyzer.analyze(&resort("Dry Hill"), &window(&[0.0, 0.0])).unwrap();

        assert_eq!(event.total_snowfall, 0.0);
        assert_eq!(event.max_daily_snowfall, 0.0);
        assert!(event.forecasts.is_empty());
        assert_eq!(event.start_date(), None);
        assert_eq!(event.end_date(), None);
    }

    #[test]
    fn test_retained_days_keep_original_order() {
        let analyzer = SnowAnalyzer::new(1.0);
        let forecasts = window(&[0.0, 1.0, 0.0, 4.0, 0.0, 2.0]);
        let event = analyzer.analyze(&resort("Gappy"), &forecasts).unwrap();

        let snow: Vec<f64> = event.forecasts.iter().map(|f| f.snowfall_inches).collect();
        assert_eq!(snow, vec![1.0, 4.0, 2.0]);
        assert!(event.forecasts.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(event.max_daily_snowfall, 4.0);
    }

    #[test]
    fn test_find_significant_events() {
        let analyzer = SnowAnalyzer::new(6.0);
        let resort_forecasts: ResortForecasts = vec![
            (resort("Resort A"), window(&[8.0])),
            (resort("Resort B"), window(&[2.0])),
        ];

        let events = analyzer.find_significant(&resort_forecasts);

        assert_eq!(events.len(), 1, "Should find only one significant event");
        assert_eq!(events[0].resort.name, "Resort A");
    }

    #[test]
    fn test_find_significant_sorted_descending_with_stable_ties() {
        let analyzer = SnowAnalyzer::new(6.0);
        let resort_forecasts: ResortForecasts = vec![
            (resort("Seven"), window(&[7.0])),
            (resort("Twelve"), window(&[6.0, 6.0])),
            (resort("Dry"), window(&[0.0, 1.0])),
            (resort("Seven Again"), window(&[3.5, 3.5])),
            (resort("Empty"), vec![]),
            (resort("Nine"), window(&[9.0])),
        ];

        let names: Vec<String> = analyzer
            .find_significant(&resort_forecasts)
            .into_iter()
            .map(|e| e.resort.name)
            .collect();

        assert_eq!(names, vec!["Twelve", "Nine", "Seven", "Seven Again"]);
    }
}
