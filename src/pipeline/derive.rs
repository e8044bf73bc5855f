use crate::types::activity::{duration_seconds, DerivedRow, DerivedTrack, Track};

/// Computes per-point deltas and segment speed in a single forward pass.
///
/// Takes the track by value: a derived table cannot be handed back to the
/// deriver, so the deltas are computed exactly once per ride.
pub fn derive(track: Track) -> DerivedTrack {
    let mut rows: Vec<DerivedRow> = Vec::with_capacity(track.points.len());
    let mut cumulative_seconds = 0.0;

    for point in track.points {
        let row = match rows.last() {
            None => DerivedRow {
                distance_km: point.distance_m / 1000.0,
                time_delta: None,
                altitude_delta_m: None,
                segment_speed_kmh: None,
                cumulative_time_min: 0.0,
                point,
            },
            Some(prev) => {
                let time_delta = point.time - prev.point.time;
                let seconds = duration_seconds(&time_delta);
                cumulative_seconds += seconds;

                DerivedRow {
                    distance_km: point.distance_m / 1000.0,
                    time_delta: Some(time_delta),
                    altitude_delta_m: Some(point.altitude_m - prev.point.altitude_m),
                    segment_speed_kmh: Some(segment_speed_kmh(
                        point.distance_m - prev.point.distance_m,
                        seconds,
                    )),
                    cumulative_time_min: cumulative_seconds / 60.0,
                    point,
                }
            }
        };
        rows.push(row);
    }

    DerivedTrack { rows }
}

/// Speed over one segment. A zero-length interval reports 0 rather than an
/// infinite or undefined value.
pub fn segment_speed_kmh(distance_m: f64, seconds: f64) -> f64 {
    if seconds == 0.0 {
        return 0.0;
    }
    (distance_m / 1000.0) / (seconds / 3600.0)
}
