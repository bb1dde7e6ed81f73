//! Ski resort model

use super::Coordinates;
use serde::{Deserialize, Serialize};

/// A ski resort, either from the built-in catalog or defined in the config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resort {
    pub name: String,
    pub coordinates: Coordinates,
    /// Base elevation in feet
    pub elevation_ft: Option<u32>,
    /// State or region code, e.g. "CO"
    pub state: Option<String>,
}

impl Resort {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        elevation_ft: Option<u32>,
        state: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::new(latitude, longitude),
            elevation_ft,
            state,
        }
    }

    /// Distance from the given point in miles
    #[must_use]
    pub fn distance_from(&self, origin: &Coordinates) -> f64 {
        self.coordinates.distance_to(origin)
    }

    /// Name with the state appended when known, e.g. "Vail, CO"
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}", self.name, state),
            None => self.name.clone(),
        }
    }
}
