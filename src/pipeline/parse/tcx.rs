use crate::error::ParseError;
use crate::pipeline::parse::{parse_timestamp, Parser};
use crate::types::activity::{Track, TrackPoint};
use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;

const TCX_NAMESPACE: &[u8] = b"http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2";

pub struct TcxParser;

#[derive(Debug, Clone, Copy)]
enum Field {
    Time,
    Latitude,
    Longitude,
    Altitude,
    Distance,
}

impl Field {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"Time" => Some(Field::Time),
            b"LatitudeDegrees" => Some(Field::Latitude),
            b"LongitudeDegrees" => Some(Field::Longitude),
            b"AltitudeMeters" => Some(Field::Altitude),
            b"DistanceMeters" => Some(Field::Distance),
            _ => None,
        }
    }

    fn element(&self) -> &'static str {
        match self {
            Field::Time => "Time",
            Field::Latitude => "Position/LatitudeDegrees",
            Field::Longitude => "Position/LongitudeDegrees",
            Field::Altitude => "AltitudeMeters",
            Field::Distance => "DistanceMeters",
        }
    }
}

#[derive(Default)]
struct PendingPoint {
    time: Option<DateTime<Utc>>,
    lat: Option<f64>,
    lon: Option<f64>,
    altitude_m: Option<f64>,
    distance_m: Option<f64>,
}

impl PendingPoint {
    fn set(&mut self, field: Field, text: &str, index: usize) -> Result<(), ParseError> {
        let invalid = || ParseError::invalid(index, field.element(), text);
        match field {
            Field::Time => self.time = Some(parse_timestamp(text).ok_or_else(invalid)?),
            Field::Latitude => self.lat = Some(text.parse().map_err(|_| invalid())?),
            Field::Longitude => self.lon = Some(text.parse().map_err(|_| invalid())?),
            Field::Altitude => self.altitude_m = Some(text.parse().map_err(|_| invalid())?),
            Field::Distance => self.distance_m = Some(text.parse().map_err(|_| invalid())?),
        }
        Ok(())
    }

    fn finish(self, index: usize) -> Result<TrackPoint, ParseError> {
        let require = |value: Option<f64>, field: Field| {
            value.ok_or_else(|| ParseError::missing(index, field.element()))
        };

        Ok(TrackPoint {
            time: self
                .time
                .ok_or_else(|| ParseError::missing(index, Field::Time.element()))?,
            lat: require(self.lat, Field::Latitude)?,
            lon: require(self.lon, Field::Longitude)?,
            altitude_m: require(self.altitude_m, Field::Altitude)?,
            distance_m: require(self.distance_m, Field::Distance)?,
        })
    }
}

fn in_tcx_namespace(ns: &ResolveResult) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == TCX_NAMESPACE)
}

impl Parser for TcxParser {
    fn parse(&self, bytes: &[u8]) -> Result<Track, ParseError> {
        let mut reader = NsReader::from_reader(bytes);
        reader.trim_text(true);

        let mut points: Vec<TrackPoint> = Vec::new();
        let mut current_point: Option<PendingPoint> = None;
        let mut current_field: Option<Field> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_resolved_event_into(&mut buf) {
                Ok((ns, Event::Start(e))) if in_tcx_namespace(&ns) => {
                    let local = e.local_name();
                    if local.as_ref() == b"Trackpoint" {
                        current_point = Some(PendingPoint::default());
                    } else if current_point.is_some() {
                        current_field = Field::from_local_name(local.as_ref());
                    }
                }
                Ok((ns, Event::Empty(e))) if in_tcx_namespace(&ns) => {
                    if e.local_name().as_ref() == b"Trackpoint" {
                        return Err(ParseError::missing(points.len(), Field::Time.element()));
                    }
                }
                Ok((_, Event::Text(e))) => {
                    if let (Some(point), Some(field)) = (current_point.as_mut(), current_field) {
                        let text = e
                            .unescape()
                            .map_err(|e| ParseError::MalformedTrack(e.to_string()))?;
                        point.set(field, text.trim(), points.len())?;
                    }
                }
                Ok((ns, Event::End(e))) => {
                    if in_tcx_namespace(&ns) && e.local_name().as_ref() == b"Trackpoint" {
                        if let Some(point) = current_point.take() {
                            let finished = point.finish(points.len())?;
                            points.push(finished);
                        }
                    }
                    current_field = None;
                }
                Ok((_, Event::Eof)) => break,
                Err(e) => return Err(ParseError::MalformedTrack(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(Track { points })
    }
}
