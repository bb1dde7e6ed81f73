//! Data models for the Powdertime application
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates
//! - Resort: Ski resorts known to the catalog or supplied by the user
//! - Forecast: Daily snowfall forecasts and derived snow events

pub mod forecast;
pub mod location;
pub mod resort;

// Re-export all public types for convenient access
pub use forecast::{DailyForecast, ResortForecasts, SnowEvent};
pub use location::Coordinates;
pub use resort::Resort;
