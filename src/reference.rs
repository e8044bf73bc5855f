use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{MatchError, ReferenceError};
use crate::pipeline::matching;
use crate::types::reference::{
    Animal, AnimalComparison, CountryRoutes, Peak, PeakMatch, RouteMatch,
};

const PEAKS_JSON: &str = include_str!("../data/peaks.json");
const ROUTES_JSON: &str = include_str!("../data/routes.json");
const ANIMALS_JSON: &str = include_str!("../data/animals.json");

/// Read-only comparison tables, loaded once and shared by every session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceTables {
    pub peaks: Vec<Peak>,
    pub routes: Vec<CountryRoutes>,
    pub animals: Vec<Animal>,
}

impl ReferenceTables {
    pub fn builtin() -> Result<Self, ReferenceError> {
        Ok(Self {
            peaks: from_json("peaks", PEAKS_JSON)?,
            routes: from_json("routes", ROUTES_JSON)?,
            animals: from_json("animals", ANIMALS_JSON)?,
        })
    }

    /// Loads `peaks.json`, `routes.json` and `animals.json` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self, ReferenceError> {
        Ok(Self {
            peaks: read_table(dir, "peaks")?,
            routes: read_table(dir, "routes")?,
            animals: read_table(dir, "animals")?,
        })
    }

    pub fn load(dir: Option<&Path>) -> Result<Self, ReferenceError> {
        let tables = match dir {
            Some(dir) => Self::from_dir(dir)?,
            None => Self::builtin()?,
        };
        tracing::info!(
            "Reference tables loaded: {} peaks, {} route countries, {} animals",
            tables.peaks.len(),
            tables.routes.len(),
            tables.animals.len()
        );
        Ok(tables)
    }

    pub fn closest_peak(&self, elevation_gain_m: f64) -> Result<PeakMatch, MatchError> {
        matching::closest_peak(&self.peaks, elevation_gain_m)
    }

    pub fn closest_route(&self, distance_km: f64) -> Result<RouteMatch, MatchError> {
        matching::closest_route(&self.routes, distance_km)
    }

    pub fn compare_animals(&self, speed_kmh: f64) -> Result<AnimalComparison, MatchError> {
        matching::compare_animals(&self.animals, speed_kmh)
    }
}

fn from_json<T: DeserializeOwned>(
    name: &'static str,
    json: &str,
) -> Result<Vec<T>, ReferenceError> {
    serde_json::from_str(json).map_err(|source| ReferenceError::Json { name, source })
}

fn read_table<T: DeserializeOwned>(
    dir: &Path,
    name: &'static str,
) -> Result<Vec<T>, ReferenceError> {
    let path = dir.join(format!("{}.json", name));
    let json = std::fs::read_to_string(&path).map_err(|source| ReferenceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    from_json(name, &json)
}
