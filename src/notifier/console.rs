//! Console channel: writes the report to stdout

use crate::models::forecast::total_snowfall;
use crate::models::{ResortForecasts, SnowEvent};
use std::fmt::Write;

const RULE_WIDTH: usize = 70;

#[derive(Debug, Clone, Copy)]
pub struct ConsoleNotifier {
    forecast_summary: bool,
}

impl ConsoleNotifier {
    #[must_use]
    pub fn new(forecast_summary: bool) -> Self {
        Self { forecast_summary }
    }

    pub fn notify(&self, events: &[SnowEvent], forecasts: Option<&ResortForecasts>) {
        print!("{}", self.render(events, forecasts));
    }

    /// Full console report
    #[must_use]
    pub fn render(&self, events: &[SnowEvent], forecasts: Option<&ResortForecasts>) -> String {
        let mut out = String::new();

        if let Some(forecasts) = forecasts.filter(|f| self.forecast_summary && !f.is_empty()) {
            out.push_str("\n📊 Forecast Summary:\n");
            for (resort, days) in forecasts {
                let _ = writeln!(out, "   • {}: {:.1}\" total", resort.name, total_snowfall(days));
            }
        }

        if events.is_empty() {
            out.push_str("\n✅ No significant snowfall forecasted.\n");
            return out;
        }

        let rule = "=".repeat(RULE_WIDTH);
        let _ = writeln!(out, "\n{rule}");
        out.push_str("❄️  POWDER ALERT! Significant Snow Forecasted ❄️\n");
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "\nFound {} location(s) with significant snowfall:\n",
            events.len()
        );

        for (i, event) in events.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, event.summary());
        }

        let _ = writeln!(out, "{rule}");
        out
    }
}
