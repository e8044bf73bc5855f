mod gpx;
mod tcx;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::error::ParseError;
use crate::types::activity::{FileFormat, Track};

const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub trait Parser {
    fn parse(&self, bytes: &[u8]) -> Result<Track, ParseError>;
}

pub fn parse(bytes: &[u8], format: FileFormat) -> Result<Track, ParseError> {
    match format {
        FileFormat::Gpx => gpx::GpxParser.parse(bytes),
        FileFormat::Tcx => tcx::TcxParser.parse(bytes),
    }
}

/// Loads a track from raw file content and its declared extension.
pub fn load(bytes: &[u8], extension: &str) -> Result<Track, ParseError> {
    let format = FileFormat::from_extension(extension)?;
    parse(bytes, format)
}

/// Parses an RFC 3339 timestamp. Timestamps without an offset are read as UTC.
pub(crate) fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = text.parse::<DateTime<Utc>>() {
        return Some(time);
    }

    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}
