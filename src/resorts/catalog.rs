//! Built-in table of US ski resorts

use crate::models::Resort;
use std::sync::LazyLock;

// (name, latitude, longitude, base elevation ft, state)
const RESORT_TABLE: &[(&str, f64, f64, u32, &str)] = &[
    // Colorado
    ("Vail", 39.6403, -106.3742, 8120, "CO"),
    ("Breckenridge", 39.4817, -106.0384, 9600, "CO"),
    ("Keystone", 39.6042, -105.9347, 9280, "CO"),
    ("Aspen Mountain", 39.1911, -106.8175, 7945, "CO"),
    ("Steamboat", 40.4572, -106.8047, 6900, "CO"),
    ("Winter Park", 39.8868, -105.7625, 9000, "CO"),
    ("Copper Mountain", 39.5019, -106.1503, 9712, "CO"),
    ("Arapahoe Basin", 39.6425, -105.8719, 10780, "CO"),
    ("Loveland", 39.6800, -105.8978, 10800, "CO"),
    ("Telluride", 37.9375, -107.8123, 8725, "CO"),
    // Utah
    ("Park City", 40.6514, -111.5079, 6900, "UT"),
    ("Alta", 40.5885, -111.6381, 8530, "UT"),
    ("Snowbird", 40.5833, -111.6572, 7760, "UT"),
    ("Deer Valley", 40.6374, -111.4783, 6570, "UT"),
    ("Brighton", 40.5981, -111.5831, 8755, "UT"),
    ("Solitude", 40.6199, -111.5916, 7988, "UT"),
    ("Snowbasin", 41.2161, -111.8567, 6400, "UT"),
    // Wyoming
    ("Jackson Hole", 43.5875, -110.8278, 6311, "WY"),
    // California
    ("Mammoth Mountain", 37.6308, -119.0326, 7953, "CA"),
    ("Palisades Tahoe", 39.1970, -120.2356, 6200, "CA"),
    ("Heavenly", 38.9350, -119.9403, 6565, "CA"),
    ("Northstar", 39.2731, -120.1186, 6330, "CA"),
    ("Kirkwood", 38.6836, -120.0661, 7800, "CA"),
    // Vermont
    ("Stowe", 44.5303, -72.7817, 1340, "VT"),
    ("Killington", 43.6042, -72.8203, 1290, "VT"),
    ("Sugarbush", 44.1358, -72.9028, 1535, "VT"),
    // New Hampshire
    ("Loon Mountain", 44.0364, -71.6208, 950, "NH"),
    ("Bretton Woods", 44.2625, -71.4431, 1500, "NH"),
    // New York
    ("Whiteface", 44.3656, -73.9025, 1220, "NY"),
    ("Hunter", 42.2042, -74.2172, 1600, "NY"),
    ("Bellayre", 42.127342, -74.518576, 2025, "NY"),
    ("Windham", 42.3600, -74.2900, 1500, "NY"),
    ("Plattekill Mountain", 42.2700, -74.6400, 3500, "NY"),
    ("Holiday Mountain", 41.6300, -74.6200, 1050, "NY"),
    ("Catamount", 42.1691, -73.4770, 2000, "NY"),
    // Massachusetts
    ("Butternut", 42.1867, -73.3203, 1800, "MA"),
    // Pennsylvania
    ("Camelback", 41.0423, -75.3521, 2133, "PA"),
    // Montana
    ("Big Sky", 45.2847, -111.4008, 7500, "MT"),
    // Idaho
    ("Sun Valley", 43.6972, -114.3517, 5750, "ID"),
    // Washington
    ("Crystal Mountain", 46.9358, -121.4747, 4400, "WA"),
    ("Stevens Pass", 47.7453, -121.0892, 4061, "WA"),
];

static GLOBAL_CATALOG: LazyLock<ResortCatalog> = LazyLock::new(|| {
    ResortCatalog::new(
        RESORT_TABLE
            .iter()
            .map(|&(name, lat, lon, elevation, state)| {
                Resort::new(name, lat, lon, Some(elevation), Some(state.to_string()))
            })
            .collect(),
    )
});

/// Read-only registry of known resorts
#[derive(Debug, Clone)]
pub struct ResortCatalog {
    resorts: Vec<Resort>,
}

impl ResortCatalog {
    /// Build a catalog from an explicit list, keeping its order
    #[must_use]
    pub fn new(resorts: Vec<Resort>) -> Self {
        Self { resorts }
    }

    /// The built-in catalog, constructed on first use
    #[must_use]
    pub fn global() -> &'static ResortCatalog {
        &GLOBAL_CATALOG
    }

    /// Case-insensitive exact name lookup
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Resort> {
        let name_lower = name.to_lowercase();
        self.resorts
            .iter()
            .find(|resort| resort.name.to_lowercase() == name_lower)
    }

    /// All resorts in declaration order
    #[must_use]
    pub fn all(&self) -> &[Resort] {
        &self.resorts
    }

    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.resorts.iter().map(|r| r.name.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.resorts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resorts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn test_global_catalog_contents() {
        let catalog = ResortCatalog::global();
        assert_eq!(catalog.len(), RESORT_TABLE.len());
        assert!(catalog.len() >= 40);
        assert_eq!(catalog.all()[0].name, "Vail");

        let states: HashSet<_> = catalog.all().iter().filter_map(|r| r.state.as_deref()).collect();
        assert!(states.len() > 5, "catalog should span multiple states");
    }

    #[test]
    fn test_names_are_unique_ignoring_case() {
        let names: HashSet<String> = ResortCatalog::global()
            .names()
            .into_iter()
            .map(|n| n.to_lowercase())
            .collect();
        assert_eq!(names.len(), ResortCatalog::global().len());
    }

    #[rstest]
    #[case("Vail")]
    #[case("vail")]
    #[case("VAIL")]
    fn test_find_by_name_case_insensitive(#[case] query: &str) {
        let catalog = ResortCatalog::global();
        let vail = catalog.find_by_name(query).unwrap();
        assert_eq!(vail.name, "Vail");
        assert_eq!(catalog.find_by_name("Vail"), Some(vail));
    }

    #[rstest]
    #[case("Hunter")]
    #[case("Bellayre")]
    #[case("Windham")]
    fn test_catskills_resorts_exist(#[case] name: &str) {
        let resort = ResortCatalog::global().find_by_name(name).unwrap();
        assert_eq!(resort.state.as_deref(), Some("NY"));
    }

    #[test]
    fn test_find_by_name_requires_exact_match() {
        let catalog = ResortCatalog::global();
        assert!(catalog.find_by_name("Nonexistent").is_none());
        assert!(catalog.find_by_name("Vai").is_none());
    }
}
