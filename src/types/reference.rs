use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub country: String,
    pub name: String,
    pub altitude_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRoute {
    pub name: String,
    pub length_km: f64,
}

/// Every scenic route listed for one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRoutes {
    pub country: String,
    pub routes: Vec<NamedRoute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub species: String,
    pub top_speed_kmh: f64,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeakMatch {
    pub country: String,
    pub peak: String,
    pub altitude_m: f64,
    pub ascent_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMatch {
    pub country: String,
    pub route: String,
    pub length_km: f64,
    pub percent_travelled: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalMatch {
    pub species: String,
    pub top_speed_kmh: f64,
    pub image: String,
}

impl From<&Animal> for AnimalMatch {
    fn from(animal: &Animal) -> Self {
        Self {
            species: animal.species.clone(),
            top_speed_kmh: animal.top_speed_kmh,
            image: animal.image.clone(),
        }
    }
}

/// The nearest species on either side of an achieved speed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalComparison {
    pub speed_kmh: f64,
    pub faster: Option<AnimalMatch>,
    pub slower: Option<AnimalMatch>,
}
