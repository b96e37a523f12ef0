use crate::encoding::ResultEncoder;
use crate::prelude::{FilterConfig, LineDiagnostic, StreamKind};
use crate::processing::matcher::{MatchDecision, Matcher};
use crate::processing::time_base::TimeBase;
use crate::streams::{MeasurementLine, PositionFix};
use crate::telemetry::{LogManager, MetricsRecorder};
use chrono::NaiveDateTime;
use serde::Serialize;

/// A sweep annotated with the fix nearest to it in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedObservation {
    /// Latitude, longitude, altitude of the matched fix.
    pub coords: (f64, f64, f64),
    /// Timestamp of the matched fix.
    pub timestamp_abs: NaiveDateTime,
    /// Origin plus the sweep's relative time.
    pub measured_at: NaiveDateTime,
    pub relative_time: f64,
    pub freq_min: i64,
    pub freq_max: i64,
    /// Samples strictly above the power threshold; never empty.
    pub powers: Vec<f64>,
    /// Source line in the measurement log.
    pub line_number: usize,
}

/// Outcome of running one measurement line through the predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted(MatchedObservation),
    BelowPowerThreshold,
    OutOfTolerance,
    OutOfBand,
    Malformed(LineDiagnostic),
}

/// Applies power, time and band predicates to individual sweeps.
///
/// Holds only shared references so lines can be evaluated from several
/// threads at once.
#[derive(Debug, Clone, Copy)]
pub struct SweepFilter<'a> {
    pub filter: &'a FilterConfig,
    pub time_base: &'a TimeBase,
    pub matcher: &'a Matcher,
    pub fixes: &'a [PositionFix],
}

impl<'a> SweepFilter<'a> {
    pub fn evaluate(&self, line: &MeasurementLine) -> Verdict {
        let record = match line.record() {
            Ok(record) => record,
            Err(error) => {
                return Verdict::Malformed(LineDiagnostic::new(
                    StreamKind::Measurement,
                    line.number,
                    &line.raw,
                    error,
                ))
            }
        };

        // Thresholding first spares the fix search for sweeps with nothing left.
        let powers = self.filter.retain_powers(&record.powers);
        if powers.is_empty() {
            return Verdict::BelowPowerThreshold;
        }

        let relative_time = self.time_base.relative_time(record.time_rel);
        let fix = match self.matcher.locate(relative_time) {
            Some(MatchDecision::Accepted { fix_index, .. }) => match self.fixes.get(fix_index) {
                Some(fix) => fix,
                None => return Verdict::OutOfTolerance,
            },
            _ => return Verdict::OutOfTolerance,
        };

        if !self.filter.accepts_band(record.freq_min, record.freq_max) {
            return Verdict::OutOfBand;
        }

        Verdict::Accepted(MatchedObservation {
            coords: fix.coords(),
            timestamp_abs: fix.timestamp_abs,
            measured_at: self
                .time_base
                .measured_at(relative_time)
                .unwrap_or(fix.timestamp_abs),
            relative_time,
            freq_min: record.freq_min,
            freq_max: record.freq_max,
            powers,
            line_number: line.number,
        })
    }
}

/// Folds verdicts, in input order, into the output collection.
#[derive(Debug, Default)]
pub struct Aggregator {
    observations: Vec<MatchedObservation>,
    encoded: Vec<String>,
    diagnostics: Vec<LineDiagnostic>,
    metrics: MetricsRecorder,
    logger: LogManager,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, verdict: Verdict) {
        self.metrics.record_verdict(&verdict);
        match verdict {
            Verdict::Accepted(observation) => {
                self.encoded.push(ResultEncoder::encode(&observation));
                self.observations.push(observation);
            }
            Verdict::Malformed(diagnostic) => {
                self.logger.skipped(&diagnostic);
                self.diagnostics.push(diagnostic);
            }
            Verdict::BelowPowerThreshold | Verdict::OutOfTolerance | Verdict::OutOfBand => {}
        }
    }

    pub fn matches(&self) -> usize {
        self.observations.len()
    }

    pub fn finish(self) -> AggregatedSweeps {
        AggregatedSweeps {
            observations: self.observations,
            encoded: self.encoded,
            diagnostics: self.diagnostics,
            metrics: self.metrics,
        }
    }
}

/// Everything the aggregator collected over one pass.
#[derive(Debug)]
pub struct AggregatedSweeps {
    pub observations: Vec<MatchedObservation>,
    pub encoded: Vec<String>,
    pub diagnostics: Vec<LineDiagnostic>,
    pub metrics: MetricsRecorder,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::{default_reference_date, EngineOptions};
    use crate::streams::position::tests::gps_line;
    use crate::streams::{MeasurementStream, PositionStream};

    struct Fixture {
        positions: PositionStream,
        time_base: TimeBase,
        matcher: Matcher,
        filter: FilterConfig,
    }

    fn fixture() -> Fixture {
        let text = [
            gps_line(0, 3, 10.0, 20.0, 30.0),
            gps_line(1_000_000, 3, 11.0, 21.0, 31.0),
        ]
        .join("\n");
        let positions = PositionStream::parse(&text, default_reference_date());
        let time_base = TimeBase::resolve(&positions, &MeasurementStream::parse("1:1:1:1"))
            .unwrap()
            .time_base;
        let matcher = Matcher::new(&positions, &EngineOptions::default());
        Fixture {
            positions,
            time_base,
            matcher,
            filter: FilterConfig::new(100, 200, -50.0).unwrap(),
        }
    }

    fn evaluate(fixture: &Fixture, raw: &str) -> Verdict {
        let sweep = SweepFilter {
            filter: &fixture.filter,
            time_base: &fixture.time_base,
            matcher: &fixture.matcher,
            fixes: &fixture.positions.fixes,
        };
        sweep.evaluate(&MeasurementLine {
            number: 7,
            raw: raw.to_string(),
        })
    }

    #[test]
    fn accepted_sweep_keeps_only_powers_above_threshold() {
        let fixture = fixture();
        let verdict = evaluate(&fixture, "2:0100:0200: -50.0 -49.5 -70 -10");
        let Verdict::Accepted(observation) = verdict else {
            panic!("expected a match");
        };
        assert_eq!(observation.powers, vec![-49.5, -10.0]);
        assert_eq!(observation.coords, (11.0, 21.0, 31.0));
        assert_eq!(observation.relative_time, 1.0);
        assert_eq!(observation.line_number, 7);
    }

    #[test]
    fn straddling_band_is_rejected() {
        let fixture = fixture();
        assert_eq!(evaluate(&fixture, "1:150:250:0"), Verdict::OutOfBand);
        assert_eq!(evaluate(&fixture, "1:50:150:0"), Verdict::OutOfBand);
    }

    #[test]
    fn all_powers_at_threshold_drop_the_sweep() {
        let fixture = fixture();
        assert_eq!(evaluate(&fixture, "1:100:200:-50 -50.0"), Verdict::BelowPowerThreshold);
    }

    #[test]
    fn distant_sweeps_are_out_of_tolerance() {
        let fixture = fixture();
        assert_eq!(evaluate(&fixture, "3.5:100:200:0"), Verdict::OutOfTolerance);
    }

    #[test]
    fn matcher_from_a_longer_stream_does_not_index_past_fixes() {
        let fixture = fixture();
        let sweep = SweepFilter {
            filter: &fixture.filter,
            time_base: &fixture.time_base,
            matcher: &fixture.matcher,
            fixes: &fixture.positions.fixes[..1],
        };
        let line = MeasurementLine {
            number: 1,
            raw: "2:100:200:0".to_string(),
        };
        assert_eq!(sweep.evaluate(&line), Verdict::OutOfTolerance);
    }

    #[test]
    fn aggregator_counts_and_encodes_in_order() {
        let fixture = fixture();
        let mut aggregator = Aggregator::new();
        for raw in ["1:100:200:1", "junk", "1.5:100:150:2 3", "9:100:200:1"] {
            aggregator.push(evaluate(&fixture, raw));
        }
        assert_eq!(aggregator.matches(), 2);
        let collected = aggregator.finish();
        assert_eq!(
            collected.encoded,
            vec!["0.000:0100:0200: 1.0\n", "0.500:0100:0150: 2.0 3.0\n"]
        );
        assert_eq!(collected.diagnostics.len(), 1);
        let summary = collected.metrics.snapshot();
        assert_eq!(summary.matches, 2);
        assert_eq!(summary.malformed_lines, 1);
        assert_eq!(summary.out_of_tolerance, 1);
    }
}
