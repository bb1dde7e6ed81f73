//! Resort search
//!
//! Resolves the search origin, filters the catalog by distance and resolves
//! user-curated resort lists.

use super::ResortCatalog;
use crate::geocoding::Geocoder;
use crate::location_resolver::{LocationSpec, OriginLookup};
use crate::models::{Coordinates, Resort};
use crate::{PowdertimeError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One entry of the manual `resorts` list in the config.
///
/// Either `{ name }` for a catalog lookup or
/// `{ name, latitude, longitude, elevation?, state? }` for a custom resort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResortSpec {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<u32>,
    pub state: Option<String>,
}

impl ResortSpec {
    /// Spec that looks a resort up in the catalog
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Spec for a resort that is not in the catalog
    #[must_use]
    pub fn custom(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: Some(name.into()),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Self::default()
        }
    }
}

/// Finds candidate resorts around an origin or from a manual list
pub struct ResortFinder<'a, G> {
    catalog: &'a ResortCatalog,
    geocoder: G,
}

impl<G: Geocoder> ResortFinder<'static, G> {
    /// Finder over the built-in catalog
    pub fn new(geocoder: G) -> Self {
        Self::with_catalog(ResortCatalog::global(), geocoder)
    }
}

impl<'a, G: Geocoder> ResortFinder<'a, G> {
    pub fn with_catalog(catalog: &'a ResortCatalog, geocoder: G) -> Self {
        Self { catalog, geocoder }
    }

    #[must_use]
    pub fn catalog(&self) -> &ResortCatalog {
        self.catalog
    }

    /// Resolve a location to coordinates, geocoding places and zipcodes
    pub async fn resolve_origin(&self, location: &LocationSpec) -> Result<Coordinates> {
        let query = match location.lookup() {
            OriginLookup::Known(coords) => return Ok(coords),
            OriginLookup::Geocode(query) => query,
        };

        debug!("Resolving origin via geocoder: {}", query);
        match self.geocoder.geocode(&query).await {
            Ok(Some(coords)) => Ok(coords),
            Ok(None) => Err(PowdertimeError::geocode(query.to_string(), "no match found")),
            Err(e) => Err(PowdertimeError::geocode(query.to_string(), format!("{e:#}"))),
        }
    }

    /// Resorts within `radius_miles` of `origin`, closest first
    #[must_use]
    pub fn find_nearby(&self, origin: &Coordinates, radius_miles: f64) -> Vec<Resort> {
        self.find_nearby_with_distance(origin, radius_miles)
            .into_iter()
            .map(|(resort, _)| resort)
            .collect()
    }

    /// Like [`Self::find_nearby`], keeping each resort's distance in miles.
    ///
    /// The boundary is inclusive; equal distances keep catalog order.
    #[must_use]
    pub fn find_nearby_with_distance(
        &self,
        origin: &Coordinates,
        radius_miles: f64,
    ) -> Vec<(Resort, f64)> {
        let mut nearby: Vec<(Resort, f64)> = self
            .catalog
            .all()
            .iter()
            .map(|resort| (resort, resort.distance_from(origin)))
            .filter(|(_, distance)| *distance <= radius_miles)
            .map(|(resort, distance)| (resort.clone(), distance))
            .collect();

        nearby.sort_by(|a, b| a.1.total_cmp(&b.1));

        debug!(
            "Found {} resorts within {} miles of {}",
            nearby.len(),
            radius_miles,
            origin.format_coordinates()
        );
        nearby
    }

    /// Resolve a manual resort list, preserving its order
    pub fn resolve_manual_list(&self, specs: &[ResortSpec]) -> Result<Vec<Resort>> {
        specs.iter().map(|spec| self.resolve_spec(spec)).collect()
    }

    fn resolve_spec(&self, spec: &ResortSpec) -> Result<Resort> {
        let name = spec
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        match (name, spec.latitude, spec.longitude) {
            (Some(name), None, None) => self
                .catalog
                .find_by_name(name)
                .cloned()
                .ok_or_else(|| PowdertimeError::unknown_resort(name, self.catalog.names())),
            (Some(name), Some(latitude), Some(longitude)) => Ok(Resort::new(
                name,
                latitude,
                longitude,
                spec.elevation,
                spec.state.clone(),
            )),
            _ => Err(PowdertimeError::invalid_spec(format!(
                "{spec:?}. Must have 'name' (for lookup) or 'name' + 'latitude' + 'longitude' (for custom)"
            ))),
        }
    }
}
