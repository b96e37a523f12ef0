use crate::prelude::{CorrelationError, CorrelationResult, LineDiagnostic, StreamKind};
use crate::streams::{MeasurementStream, PositionStream};
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

/// Maps the measurement clock onto the absolute clock of the fixes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeBase {
    /// Timestamp of the first accepted fix.
    pub origin_abs: NaiveDateTime,
    /// Time of the first measurement line with a positive time.
    pub first_valid_rel: f64,
    /// Index of that line; everything before it is pre-roll.
    pub first_valid_index: usize,
}

/// A resolved time base plus the pre-roll lines that could not be read.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub time_base: TimeBase,
    pub diagnostics: Vec<LineDiagnostic>,
}

impl TimeBase {
    pub fn resolve(
        positions: &PositionStream,
        measurements: &MeasurementStream,
    ) -> CorrelationResult<Resolution> {
        let origin_abs = positions
            .fixes
            .first()
            .map(|fix| fix.timestamp_abs)
            .ok_or(CorrelationError::EmptyPositionData)?;

        let mut diagnostics = Vec::new();
        for (index, line) in measurements.lines.iter().enumerate() {
            match line.time() {
                Ok(time) if time > 0.0 => {
                    return Ok(Resolution {
                        time_base: TimeBase {
                            origin_abs,
                            first_valid_rel: time,
                            first_valid_index: index,
                        },
                        diagnostics,
                    });
                }
                Ok(_) => {}
                Err(error) => diagnostics.push(LineDiagnostic::new(
                    StreamKind::Measurement,
                    line.number,
                    &line.raw,
                    error,
                )),
            }
        }

        Err(CorrelationError::NoValidTimeBase)
    }

    /// Seconds elapsed on the measurement clock since the first valid line.
    pub fn relative_time(&self, time_rel: f64) -> f64 {
        time_rel - self.first_valid_rel
    }

    /// Absolute instant of a relative time, rounded to the microsecond.
    pub fn measured_at(&self, relative_time: f64) -> Option<NaiveDateTime> {
        let micros = (relative_time * 1_000_000.0).round();
        if !micros.is_finite() || micros.abs() > i64::MAX as f64 {
            return None;
        }
        self.origin_abs
            .checked_add_signed(Duration::microseconds(micros as i64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::default_reference_date;
    use crate::streams::position::tests::gps_line;

    fn positions() -> PositionStream {
        let text = [gps_line(7_000_000, 3, 1.0, 2.0, 3.0), gps_line(8_000_000, 3, 1.0, 2.0, 3.0)]
            .join("\n");
        PositionStream::parse(&text, default_reference_date())
    }

    #[test]
    fn first_positive_time_sets_the_base() {
        let measurements = MeasurementStream::parse("-1:1:2:3\n0:1:2:3\nbad\n2.5:1:2:3\n4:1:2:3\n");
        let resolution = TimeBase::resolve(&positions(), &measurements).unwrap();

        assert_eq!(resolution.time_base.first_valid_index, 3);
        assert_eq!(resolution.time_base.first_valid_rel, 2.5);
        assert_eq!(resolution.time_base.origin_abs, positions().fixes[0].timestamp_abs);
        assert_eq!(resolution.diagnostics.len(), 1);
        assert_eq!(resolution.diagnostics[0].line_number, 3);
    }

    #[test]
    fn missing_positive_time_is_fatal() {
        let measurements = MeasurementStream::parse("-1:1:2:3\n0:1:2:3\n");
        let err = TimeBase::resolve(&positions(), &measurements).unwrap_err();
        assert!(matches!(err, CorrelationError::NoValidTimeBase));
    }

    #[test]
    fn empty_positions_fail_before_time_base() {
        let measurements = MeasurementStream::parse("1:1:2:3\n");
        let err = TimeBase::resolve(&PositionStream::default(), &measurements).unwrap_err();
        assert!(matches!(err, CorrelationError::EmptyPositionData));
    }

    #[test]
    fn measured_at_offsets_origin() {
        let measurements = MeasurementStream::parse("2:1:2:3\n");
        let base = TimeBase::resolve(&positions(), &measurements).unwrap().time_base;
        let at = base.measured_at(base.relative_time(3.25)).unwrap();
        assert_eq!((at - base.origin_abs).num_milliseconds(), 1_250);
        assert!(base.measured_at(f64::NAN).is_none());
    }
}
