//! Location Resolution Module
//!
//! This module turns the configured location block, or a location typed on the
//! command line, into a `LocationSpec` that the resort finder can resolve.

use crate::config::LocationConfig;
use crate::geocoding::GeocodeQuery;
use crate::models::Coordinates;
use crate::{PowdertimeError, Result};

/// Default country used when a place does not name one
pub const DEFAULT_COUNTRY: &str = "US";

/// Where to search for resorts from
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSpec {
    /// Explicit coordinates, used as-is
    Coordinates(Coordinates),
    /// City with optional state, geocoded
    Place {
        city: String,
        state: Option<String>,
        country: String,
    },
    /// US zipcode, geocoded
    Zipcode(String),
}

/// Coordinates known up front, or a query the geocoder must answer
#[derive(Debug, Clone, PartialEq)]
pub enum OriginLookup {
    Known(Coordinates),
    Geocode(GeocodeQuery),
}

impl LocationSpec {
    /// Build from the `[location]` config block.
    ///
    /// Precedence: latitude+longitude, then zipcode, then city.
    pub fn from_config(config: &LocationConfig) -> Result<Self> {
        if let (Some(latitude), Some(longitude)) = (config.latitude, config.longitude) {
            return Ok(Self::Coordinates(Coordinates::new(latitude, longitude)));
        }

        if let Some(zipcode) = non_empty(config.zipcode.as_deref()) {
            return Ok(Self::Zipcode(zipcode.to_string()));
        }

        if let Some(city) = non_empty(config.city.as_deref()) {
            return Ok(Self::Place {
                city: city.to_string(),
                state: non_empty(config.state.as_deref()).map(str::to_string),
                country: non_empty(config.country.as_deref())
                    .unwrap_or(DEFAULT_COUNTRY)
                    .to_string(),
            });
        }

        Err(PowdertimeError::config(
            "Location must specify latitude and longitude, a zipcode, or a city",
        ))
    }

    /// How this spec becomes coordinates
    #[must_use]
    pub fn lookup(&self) -> OriginLookup {
        match self {
            LocationSpec::Coordinates(coords) => OriginLookup::Known(*coords),
            LocationSpec::Place {
                city,
                state: Some(state),
                country,
            } => OriginLookup::Geocode(GeocodeQuery::Place(format!("{city}, {state}, {country}"))),
            LocationSpec::Place {
                city,
                state: None,
                country,
            } => OriginLookup::Geocode(GeocodeQuery::Place(format!("{city}, {country}"))),
            LocationSpec::Zipcode(code) => OriginLookup::Geocode(GeocodeQuery::PostalCode {
                code: code.clone(),
                country: DEFAULT_COUNTRY.to_lowercase(),
            }),
        }
    }

    /// The geocoder query for this spec, `None` for explicit coordinates
    #[must_use]
    pub fn geocode_query(&self) -> Option<GeocodeQuery> {
        match self.lookup() {
            OriginLookup::Geocode(query) => Some(query),
            OriginLookup::Known(_) => None,
        }
    }

    /// Short label for log and console output
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            LocationSpec::Coordinates(coords) => coords.format_coordinates(),
            LocationSpec::Place { city, .. } => city.clone(),
            LocationSpec::Zipcode(code) => code.clone(),
        }
    }
}

impl From<&LocationSpec> for LocationConfig {
    fn from(spec: &LocationSpec) -> Self {
        match spec {
            LocationSpec::Coordinates(coords) => LocationConfig {
                latitude: Some(coords.latitude),
                longitude: Some(coords.longitude),
                ..LocationConfig::default()
            },
            LocationSpec::Place {
                city,
                state,
                country,
            } => LocationConfig {
                city: Some(city.clone()),
                state: state.clone(),
                country: Some(country.clone()),
                ..LocationConfig::default()
            },
            LocationSpec::Zipcode(code) => LocationConfig {
                zipcode: Some(code.clone()),
                ..LocationConfig::default()
            },
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Parses free-text locations given on the command line
pub struct LocationParser;

impl LocationParser {
    /// Parse location input (coordinates, zipcodes, place names)
    pub fn parse(input: &str) -> Result<LocationSpec> {
        let input = input.trim();
        if input.is_empty() {
            return Err(PowdertimeError::config("Location cannot be empty"));
        }

        if let Some((lat, lon)) = Self::parse_coordinates(input) {
            return Ok(LocationSpec::Coordinates(Coordinates::new(lat, lon)));
        }

        if Self::is_zipcode(input) {
            return Ok(LocationSpec::Zipcode(input.to_string()));
        }

        Ok(LocationSpec::Place {
            city: input.to_string(),
            state: None,
            country: DEFAULT_COUNTRY.to_string(),
        })
    }

    /// Parse coordinates from string like "39.7392,-104.9903" or "39.7392 -104.9903"
    fn parse_coordinates(input: &str) -> Option<(f64, f64)> {
        let parts: Vec<&str> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();

        let [lat, lon] = parts.as_slice() else {
            return None;
        };

        let lat = lat.parse::<f64>().ok()?;
        let lon = lon.parse::<f64>().ok()?;

        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }

        Some((lat, lon))
    }

    /// US ZIP: `ddddd`, `ddddd-dddd` or `ddddddddd`
    fn is_zipcode(input: &str) -> bool {
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        match input.split_once('-') {
            Some((zip, plus4)) => zip.len() == 5 && plus4.len() == 4 && all_digits(zip) && all_digits(plus4),
            None => (input.len() == 5 || input.len() == 9) && all_digits(input),
        }
    }
}
