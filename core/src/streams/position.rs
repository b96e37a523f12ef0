use crate::prelude::{LineDiagnostic, LineError, StreamKind, MIN_FIX_QUALITY};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

const GPS_TAG: &str = "GPS";
const MIN_GPS_FIELDS: usize = 15;

const TIME_US_FIELD: usize = 1;
const STATUS_FIELD: usize = 3;
const LATITUDE_FIELD: usize = 8;
const LONGITUDE_FIELD: usize = 9;
const ALTITUDE_FIELD: usize = 10;

/// One accepted absolute-time location sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionFix {
    pub timestamp_abs: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub quality_status: i64,
}

impl PositionFix {
    pub fn coords(&self) -> (f64, f64, f64) {
        (self.latitude, self.longitude, self.altitude)
    }
}

/// Fixes in source order plus the lines that were dropped on the way.
#[derive(Debug, Clone, Default)]
pub struct PositionStream {
    pub fixes: Vec<PositionFix>,
    pub diagnostics: Vec<LineDiagnostic>,
    /// Lines tagged `GPS` but too short to carry a fix.
    pub short_lines: usize,
}

impl PositionStream {
    /// Parses a whole positional log. Lines not tagged `GPS` are ignored.
    pub fn parse(text: &str, reference_date: NaiveDate) -> Self {
        let epoch = reference_date.and_hms_opt(0, 0, 0).unwrap_or_default();
        let mut stream = PositionStream::default();

        for (index, line) in text.lines().enumerate() {
            if !line.starts_with(GPS_TAG) {
                continue;
            }
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < MIN_GPS_FIELDS {
                stream.short_lines += 1;
                continue;
            }
            match parse_fix(&fields, epoch) {
                Ok(fix) => stream.fixes.push(fix),
                Err(error) => stream.diagnostics.push(LineDiagnostic::new(
                    StreamKind::Position,
                    index + 1,
                    line,
                    error,
                )),
            }
        }

        stream
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.fixes.iter().map(|fix| fix.timestamp_abs).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fixes.len()
    }
}

fn parse_fix(fields: &[&str], epoch: NaiveDateTime) -> Result<PositionFix, LineError> {
    let status: i64 = parse_field(fields, STATUS_FIELD, "status")?;
    if status < MIN_FIX_QUALITY {
        return Err(LineError::LowQuality { status });
    }
    let latitude: f64 = parse_field(fields, LATITUDE_FIELD, "latitude")?;
    let longitude: f64 = parse_field(fields, LONGITUDE_FIELD, "longitude")?;
    let altitude: f64 = parse_field(fields, ALTITUDE_FIELD, "altitude")?;
    let time_us: i64 = parse_field(fields, TIME_US_FIELD, "time_us")?;
    let timestamp_abs = epoch
        .checked_add_signed(Duration::microseconds(time_us))
        .ok_or_else(|| LineError::InvalidNumber {
            field: "time_us",
            value: time_us.to_string(),
        })?;

    Ok(PositionFix {
        timestamp_abs,
        latitude,
        longitude,
        altitude,
        quality_status: status,
    })
}

fn parse_field<T: std::str::FromStr>(
    fields: &[&str],
    index: usize,
    name: &'static str,
) -> Result<T, LineError> {
    let raw = fields.get(index).copied().unwrap_or_default();
    raw.parse().map_err(|_| LineError::InvalidNumber {
        field: name,
        value: raw.to_string(),
    })
}
