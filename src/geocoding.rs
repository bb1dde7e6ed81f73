//! Geocoding client for Nominatim (OpenStreetMap)
//!
//! Turns a place description or postal code into coordinates. Nominatim is
//! free and needs no API key, but requires an identifying user agent.

use crate::PowdertimeError;
use crate::models::Coordinates;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const USER_AGENT: &str = concat!("powdertime/", env!("CARGO_PKG_VERSION"));

/// What to ask the geocoder for
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodeQuery {
    /// Free-form place such as "Denver, CO, US"
    Place(String),
    /// Postal code restricted to a country (ISO 3166-1 alpha-2, lowercase)
    PostalCode { code: String, country: String },
}

impl fmt::Display for GeocodeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeocodeQuery::Place(query) => f.write_str(query),
            GeocodeQuery::PostalCode { code, .. } => f.write_str(code),
        }
    }
}

/// Resolves place descriptions to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Returns `Ok(None)` when the service has no match for the query
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

/// HTTP geocoder backed by the Nominatim search API
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .with_context(|| "Failed to create geocoding HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &GeocodeQuery) -> String {
        match query {
            GeocodeQuery::Place(text) => format!(
                "{}/search?q={}&format=json&limit=1",
                self.base_url,
                urlencoding::encode(text)
            ),
            GeocodeQuery::PostalCode { code, country } => format!(
                "{}/search?postalcode={}&countrycodes={}&format=json&limit=1",
                self.base_url,
                urlencoding::encode(code),
                urlencoding::encode(country)
            ),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self, query), fields(query = %query))]
    async fn geocode(&self, query: &GeocodeQuery) -> Result<Option<Coordinates>> {
        info!("Geocoding location: '{}'", query);
        let url = self.search_url(query);
        debug!("Nominatim request URL: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Geocoding request failed for '{query}'"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PowdertimeError::api(format!("Geocoding service returned status {status}")).into());
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .with_context(|| "Failed to parse Nominatim geocoding response")?;

        let Some(place) = places.into_iter().next() else {
            warn!("No results found for location '{}'", query);
            return Ok(None);
        };

        let latitude: f64 = place
            .lat
            .parse()
            .with_context(|| format!("Invalid latitude in geocoding result: {}", place.lat))?;
        let longitude: f64 = place
            .lon
            .parse()
            .with_context(|| format!("Invalid longitude in geocoding result: {}", place.lon))?;

        debug!(
            "Found location: {} ({:.4}, {:.4})",
            place.display_name.as_deref().unwrap_or("unnamed"),
            latitude,
            longitude
        );

        Ok(Some(Coordinates::new(latitude, longitude)))
    }
}
