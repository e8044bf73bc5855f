use chrono::Duration;

use crate::error::SummaryError;
use crate::pipeline::geo::{haversine_km, round2};
use crate::types::activity::{
    duration_seconds, DerivedRow, DerivedTrack, RideSummary, WindowedSpeed,
};

pub const DEFAULT_SPEED_WINDOW: usize = 6;

/// Reduces a derived table to ride-level statistics.
///
/// A ride shorter than `window` rows still summarizes; it simply reports no
/// windowed fastest speed.
pub fn summarize(derived: &DerivedTrack, window: usize) -> Result<RideSummary, SummaryError> {
    let rows = derived.rows();
    let first = rows.first().ok_or(SummaryError::EmptyTrack)?;

    let distance_km = total_distance_km(rows);
    let moving_time = moving_time(rows);

    let mut elevation_gain_m = 0.0;
    let mut elevation_loss_m = 0.0;
    let mut net_elevation_change_m = 0.0;
    for delta in rows.iter().filter_map(|r| r.altitude_delta_m) {
        if delta > 0.0 {
            elevation_gain_m += delta;
        } else if delta < 0.0 {
            elevation_loss_m += delta;
        }
        net_elevation_change_m += delta;
    }

    let min_altitude_m = rows
        .iter()
        .map(|r| r.point.altitude_m)
        .fold(f64::INFINITY, f64::min);
    let max_altitude_m = rows
        .iter()
        .map(|r| r.point.altitude_m)
        .fold(f64::NEG_INFINITY, f64::max);

    let moving_seconds = duration_seconds(&moving_time);
    let average_speed_kmh = if moving_seconds > 0.0 {
        distance_km / (moving_seconds / 3600.0)
    } else {
        0.0
    };

    let fastest_windowed = match fastest_windowed_speed(rows, window) {
        Ok(fastest) => Some(WindowedSpeed {
            speed_kmh: round2(fastest.speed_kmh),
            ..fastest
        }),
        Err(SummaryError::InsufficientWindow { rows, window }) => {
            tracing::debug!("No windowed speed: {} rows for a {}-row window", rows, window);
            None
        }
        Err(e) => return Err(e),
    };

    let slowest_segment_speed_kmh = rows
        .iter()
        .filter_map(|r| r.segment_speed_kmh)
        .reduce(f64::min)
        .map(round2);

    Ok(RideSummary {
        distance_km: round2(distance_km),
        moving_time,
        elevation_gain_m,
        elevation_loss_m,
        net_elevation_change_m: round2(net_elevation_change_m),
        min_altitude_m: round2(min_altitude_m),
        max_altitude_m: round2(max_altitude_m),
        average_speed_kmh: round2(average_speed_kmh),
        fastest_windowed,
        slowest_segment_speed_kmh,
        start_date: first.point.time.format("%Y-%m-%d").to_string(),
        start_time: first.point.time.format("%H:%M:%S").to_string(),
        point_count: rows.len(),
    })
}

/// Sum of great-circle distances between consecutive points, from raw
/// coordinates only; loader distances are not consulted.
pub fn total_distance_km(rows: &[DerivedRow]) -> f64 {
    rows.windows(2)
        .map(|pair| {
            let (a, b) = (&pair[0].point, &pair[1].point);
            haversine_km(a.lat, a.lon, b.lat, b.lon)
        })
        .sum()
}

pub fn moving_time(rows: &[DerivedRow]) -> Duration {
    rows.iter()
        .filter_map(|r| r.time_delta)
        .fold(Duration::zero(), |acc, delta| acc + delta)
}

/// Highest mean segment speed over every run of `window` consecutive rows.
///
/// Row 0 has no speed and contributes 0 to any window containing it. Ties go
/// to the lowest start index.
pub fn fastest_windowed_speed(
    rows: &[DerivedRow],
    window: usize,
) -> Result<WindowedSpeed, SummaryError> {
    if window == 0 || rows.len() < window {
        return Err(SummaryError::InsufficientWindow {
            rows: rows.len(),
            window,
        });
    }

    let speeds: Vec<f64> = rows
        .iter()
        .map(|r| r.segment_speed_kmh.unwrap_or(0.0))
        .collect();

    let mut best: Option<(usize, f64)> = None;
    for (start, slice) in speeds.windows(window).enumerate() {
        let mean = slice.iter().sum::<f64>() / window as f64;
        match best {
            Some((_, best_mean)) if mean <= best_mean => {}
            _ => best = Some((start, mean)),
        }
    }

    // windows() yields at least one slice once rows.len() >= window > 0
    let (start_index, speed_kmh) = best.ok_or(SummaryError::InsufficientWindow {
        rows: rows.len(),
        window,
    })?;

    Ok(WindowedSpeed {
        speed_kmh,
        start_index,
        center_index: start_index + window / 2,
        window,
    })
}
