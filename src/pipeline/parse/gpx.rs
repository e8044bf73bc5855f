use crate::error::ParseError;
use crate::pipeline::geo::displacement_3d_m;
use crate::pipeline::parse::{parse_timestamp, Parser};
use crate::types::activity::{Track, TrackPoint};
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

pub struct GpxParser;

struct PendingPoint {
    lat: f64,
    lon: f64,
    altitude_m: Option<f64>,
    time: Option<DateTime<Utc>>,
}

impl PendingPoint {
    fn from_element(e: &BytesStart, index: usize) -> Result<Self, ParseError> {
        let mut lat = None;
        let mut lon = None;

        for attr in e.attributes() {
            let attr = attr.map_err(|e| ParseError::MalformedTrack(e.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| ParseError::MalformedTrack(e.to_string()))?;
            let value = std::str::from_utf8(&attr.value)
                .map_err(|e| ParseError::MalformedTrack(e.to_string()))?;

            match key {
                "lat" => lat = Some(parse_f64(index, "lat", value)?),
                "lon" => lon = Some(parse_f64(index, "lon", value)?),
                _ => {}
            }
        }

        Ok(Self {
            lat: lat.ok_or_else(|| ParseError::missing(index, "lat"))?,
            lon: lon.ok_or_else(|| ParseError::missing(index, "lon"))?,
            altitude_m: None,
            time: None,
        })
    }

    fn finish(self, index: usize) -> Result<(DateTime<Utc>, f64, f64, f64), ParseError> {
        let time = self.time.ok_or_else(|| ParseError::missing(index, "time"))?;
        let altitude_m = self.altitude_m.ok_or_else(|| ParseError::missing(index, "ele"))?;
        Ok((time, self.lat, self.lon, altitude_m))
    }
}

impl Parser for GpxParser {
    fn parse(&self, bytes: &[u8]) -> Result<Track, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut raw: Vec<(DateTime<Utc>, f64, f64, f64)> = Vec::new();
        let mut current_point: Option<PendingPoint> = None;
        let mut current_element = String::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let name = e.name();
                    let name_str = std::str::from_utf8(name.as_ref())
                        .map_err(|e| ParseError::MalformedTrack(e.to_string()))?;

                    if name_str == "trkpt" {
                        current_point = Some(PendingPoint::from_element(&e, raw.len())?);
                    } else if current_point.is_some() {
                        current_element = name_str.to_string();
                    }
                }
                Ok(Event::Empty(e)) => {
                    // A self-closing trkpt can carry neither time nor elevation.
                    if e.name().as_ref() == b"trkpt" {
                        PendingPoint::from_element(&e, raw.len())?;
                        return Err(ParseError::missing(raw.len(), "time"));
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(point) = current_point.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| ParseError::MalformedTrack(e.to_string()))?;
                        let text = text.trim();
                        let index = raw.len();

                        match current_element.as_str() {
                            "ele" => point.altitude_m = Some(parse_f64(index, "ele", text)?),
                            "time" => {
                                point.time = Some(
                                    parse_timestamp(text)
                                        .ok_or_else(|| ParseError::invalid(index, "time", text))?,
                                )
                            }
                            _ => {}
                        }
                    }
                }
                Ok(Event::End(e)) => {
                    if e.name().as_ref() == b"trkpt" {
                        if let Some(point) = current_point.take() {
                            let finished = point.finish(raw.len())?;
                            raw.push(finished);
                        }
                    }
                    current_element.clear();
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(ParseError::MalformedTrack(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(Track {
            points: accumulate_distance(raw),
        })
    }
}

/// GPX carries no distance, so it is accumulated point to point over the
/// whole file. Segment boundaries do not reset the running total.
fn accumulate_distance(raw: Vec<(DateTime<Utc>, f64, f64, f64)>) -> Vec<TrackPoint> {
    let mut points: Vec<TrackPoint> = Vec::with_capacity(raw.len());
    let mut distance_m = 0.0;

    for (time, lat, lon, altitude_m) in raw {
        if let Some(prev) = points.last() {
            distance_m += displacement_3d_m(
                (prev.lat, prev.lon, prev.altitude_m),
                (lat, lon, altitude_m),
            );
        }
        points.push(TrackPoint {
            time,
            lat,
            lon,
            altitude_m,
            distance_m,
        });
    }

    points
}

fn parse_f64(index: usize, field: &str, value: &str) -> Result<f64, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::invalid(index, field, value))
}
