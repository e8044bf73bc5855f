const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres. Altitude is ignored.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Straight-line displacement in metres combining the great-circle distance
/// with the altitude difference.
pub fn displacement_3d_m(
    (lat1, lon1, alt1): (f64, f64, f64),
    (lat2, lon2, alt2): (f64, f64, f64),
) -> f64 {
    let flat_m = haversine_km(lat1, lon1, lat2, lon2) * 1000.0;
    let climb_m = alt2 - alt1;
    (flat_m * flat_m + climb_m * climb_m).sqrt()
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
