use crate::error::MatchError;
use crate::pipeline::geo::round2;
use crate::types::reference::{
    Animal, AnimalComparison, AnimalMatch, CountryRoutes, NamedRoute, Peak, PeakMatch, RouteMatch,
};

/// Entry with the smallest key strictly greater than `value`. Equal keys keep
/// the first entry in table order.
fn closest_ceiling<T>(
    items: impl IntoIterator<Item = T>,
    value: f64,
    key: impl Fn(&T) -> f64,
) -> Option<T> {
    items
        .into_iter()
        .filter(|item| key(item) > value)
        .fold(None, |best: Option<T>, item| match best {
            Some(b) if key(&b) <= key(&item) => Some(b),
            _ => Some(item),
        })
}

/// Entry with the largest key strictly less than `value`.
fn closest_floor<T>(
    items: impl IntoIterator<Item = T>,
    value: f64,
    key: impl Fn(&T) -> f64,
) -> Option<T> {
    items
        .into_iter()
        .filter(|item| key(item) < value)
        .fold(None, |best: Option<T>, item| match best {
            Some(b) if key(&b) >= key(&item) => Some(b),
            _ => Some(item),
        })
}

fn percent_of(achieved: f64, target: f64) -> f64 {
    round2(achieved / target * 100.0)
}

pub fn closest_peak(peaks: &[Peak], elevation_gain_m: f64) -> Result<PeakMatch, MatchError> {
    let peak = closest_ceiling(peaks, elevation_gain_m, |p| p.altitude_m).ok_or(
        MatchError::NoReferenceMatch {
            table: "peaks",
            value: elevation_gain_m,
        },
    )?;

    Ok(PeakMatch {
        country: peak.country.clone(),
        peak: peak.name.clone(),
        altitude_m: peak.altitude_m,
        ascent_percent: percent_of(elevation_gain_m, peak.altitude_m),
    })
}

pub fn closest_route(routes: &[CountryRoutes], distance_km: f64) -> Result<RouteMatch, MatchError> {
    let candidates = routes.iter().flat_map(|country| {
        country
            .routes
            .iter()
            .map(move |route| (country.country.as_str(), route))
    });

    let length_km = |(_, route): &(&str, &NamedRoute)| route.length_km;
    let (country, route) = closest_ceiling(candidates, distance_km, length_km).ok_or(
        MatchError::NoReferenceMatch {
            table: "routes",
            value: distance_km,
        },
    )?;

    Ok(RouteMatch {
        country: country.to_string(),
        route: route.name.clone(),
        length_km: route.length_km,
        percent_travelled: percent_of(distance_km, route.length_km),
    })
}

/// Nearest faster and slower species. A speed equal to a recorded top speed
/// counts as neither faster nor slower than that species.
pub fn compare_animals(animals: &[Animal], speed_kmh: f64) -> Result<AnimalComparison, MatchError> {
    let faster = closest_ceiling(animals, speed_kmh, |a| a.top_speed_kmh).map(AnimalMatch::from);
    let slower = closest_floor(animals, speed_kmh, |a| a.top_speed_kmh).map(AnimalMatch::from);

    if faster.is_none() && slower.is_none() {
        return Err(MatchError::NoReferenceMatch {
            table: "animals",
            value: speed_kmh,
        });
    }

    Ok(AnimalComparison {
        speed_kmh,
        faster,
        slower,
    })
}
