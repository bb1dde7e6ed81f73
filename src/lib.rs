//! Powdertime - ski resort snowfall monitor
//!
//! This library finds ski resorts near a location (or from a curated list),
//! fetches their daily snowfall forecasts, and reports the resorts where the
//! forecast total reaches a configured threshold.

pub mod analyzer;
pub mod app;
pub mod config;
pub mod error;
pub mod geo;
pub mod geocoding;
pub mod location_resolver;
pub mod models;
pub mod notifier;
pub mod resorts;
pub mod weather;

// Re-export core types for public API
pub use analyzer::SnowAnalyzer;
pub use app::{PowdertimeApp, RunReport};
pub use config::PowdertimeConfig;
pub use error::PowdertimeError;
pub use geocoding::{GeocodeQuery, Geocoder, NominatimGeocoder};
pub use location_resolver::{LocationParser, LocationSpec, OriginLookup};
pub use models::{Coordinates, DailyForecast, Resort, ResortForecasts, SnowEvent};
pub use notifier::Notifier;
pub use resorts::{ResortCatalog, ResortFinder, ResortSpec};
pub use weather::{DemoWeather, OpenMeteoClient, WeatherSource};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PowdertimeError>;
