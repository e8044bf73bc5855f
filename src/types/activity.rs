use chrono::{DateTime, Duration, Utc};
use serde::{Serialize, Serializer};

use crate::error::ParseError;

/// One recorded GPS sample, as produced by the loader for either file format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackPoint {
    pub time: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    pub altitude_m: f64,
    /// Cumulative distance at ingestion time. Declared by TCX files, computed for GPX.
    pub distance_m: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Gpx,
    Tcx,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Result<Self, ParseError> {
        match ext.to_lowercase().as_str() {
            "gpx" => Ok(FileFormat::Gpx),
            "tcx" => Ok(FileFormat::Tcx),
            other => Err(ParseError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn from_filename(filename: &str) -> Result<Self, ParseError> {
        match filename.rsplit_once('.') {
            Some((_, ext)) => Self::from_extension(ext),
            None => Err(ParseError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Gpx => "gpx",
            FileFormat::Tcx => "tcx",
        }
    }
}

/// Ordered, format-agnostic trackpoint sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Track {
    pub points: Vec<TrackPoint>,
}

impl Track {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A trackpoint augmented with its deltas against the previous point.
///
/// Row 0 has no predecessor, so `time_delta`, `altitude_delta_m` and
/// `segment_speed_kmh` are `None` there. A zero time delta yields a speed of
/// exactly `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    #[serde(flatten)]
    pub point: TrackPoint,
    pub distance_km: f64,
    #[serde(rename = "time_delta_s", serialize_with = "serialize_opt_seconds")]
    pub time_delta: Option<Duration>,
    pub altitude_delta_m: Option<f64>,
    pub segment_speed_kmh: Option<f64>,
    pub cumulative_time_min: f64,
}

/// Derived table for one ride. Only constructible from a [`Track`] by the deriver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DerivedTrack {
    pub(crate) rows: Vec<DerivedRow>,
}

impl DerivedTrack {
    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Peak-speed estimate from the best sliding window of segment speeds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowedSpeed {
    pub speed_kmh: f64,
    pub start_index: usize,
    pub center_index: usize,
    pub window: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RideSummary {
    pub distance_km: f64,
    #[serde(rename = "moving_time_seconds", serialize_with = "serialize_seconds")]
    pub moving_time: Duration,
    pub elevation_gain_m: f64,
    pub elevation_loss_m: f64,
    pub net_elevation_change_m: f64,
    pub min_altitude_m: f64,
    pub max_altitude_m: f64,
    pub average_speed_kmh: f64,
    /// `None` when the ride has fewer rows than the smoothing window.
    pub fastest_windowed: Option<WindowedSpeed>,
    /// `None` when the ride has no segments.
    pub slowest_segment_speed_kmh: Option<f64>,
    pub start_date: String,
    pub start_time: String,
    pub point_count: usize,
}

pub fn duration_seconds(duration: &Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}

fn serialize_seconds<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration_seconds(duration))
}

fn serialize_opt_seconds<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(duration) => serializer.serialize_some(&duration_seconds(duration)),
        None => serializer.serialize_none(),
    }
}
