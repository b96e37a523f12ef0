use crate::prelude::{CorrelationError, CorrelationResult, EngineOptions, FilterConfig, LineDiagnostic};
use crate::processing::filter::{Aggregator, MatchedObservation, SweepFilter, Verdict};
use crate::processing::matcher::Matcher;
use crate::processing::time_base::TimeBase;
use crate::streams::{MeasurementStream, PositionStream};
use crate::telemetry::{LogManager, RunSummary};
use rayon::prelude::*;

/// A run that produced at least one observation.
#[derive(Debug, Clone)]
pub struct CorrelationReport {
    pub time_base: TimeBase,
    pub observations: Vec<MatchedObservation>,
    /// Encoded form of each observation, same order.
    pub encoded: Vec<String>,
    pub summary: RunSummary,
    pub diagnostics: Vec<LineDiagnostic>,
}

impl CorrelationReport {
    pub fn encoded_text(&self) -> String {
        self.encoded.concat()
    }
}

/// A run that completed but matched nothing under the given filter.
#[derive(Debug, Clone)]
pub struct EmptyReport {
    pub time_base: TimeBase,
    pub summary: RunSummary,
    pub diagnostics: Vec<LineDiagnostic>,
}

#[derive(Debug, Clone)]
pub enum CorrelationOutcome {
    Matched(CorrelationReport),
    Empty(EmptyReport),
}

impl CorrelationOutcome {
    pub fn summary(&self) -> &RunSummary {
        match self {
            CorrelationOutcome::Matched(report) => &report.summary,
            CorrelationOutcome::Empty(report) => &report.summary,
        }
    }

    pub fn observations(&self) -> &[MatchedObservation] {
        match self {
            CorrelationOutcome::Matched(report) => &report.observations,
            CorrelationOutcome::Empty(_) => &[],
        }
    }

    pub fn diagnostics(&self) -> &[LineDiagnostic] {
        match self {
            CorrelationOutcome::Matched(report) => &report.diagnostics,
            CorrelationOutcome::Empty(report) => &report.diagnostics,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CorrelationOutcome::Empty(_))
    }
}

/// Parses both logs, aligns them and filters the sweeps.
pub struct CorrelationEngine {
    filter: FilterConfig,
    options: EngineOptions,
    logger: LogManager,
}

impl CorrelationEngine {
    pub fn new(filter: FilterConfig, options: EngineOptions) -> Self {
        Self {
            filter,
            options,
            logger: LogManager::new(),
        }
    }

    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    pub fn run(&self, position_text: &str, measurement_text: &str) -> CorrelationResult<CorrelationOutcome> {
        let positions = PositionStream::parse(position_text, self.options.reference_date);
        let measurements = MeasurementStream::parse(measurement_text);
        self.run_streams(&positions, &measurements)
    }

    pub fn run_streams(
        &self,
        positions: &PositionStream,
        measurements: &MeasurementStream,
    ) -> CorrelationResult<CorrelationOutcome> {
        let mut diagnostics = positions.diagnostics.clone();
        diagnostics.iter().for_each(|d| self.logger.skipped(d));

        if positions.is_empty() {
            self.logger.record("no GPS fixes available");
            return Err(CorrelationError::EmptyPositionData);
        }
        self.logger
            .record(&format!("read {} GPS fixes", positions.len()));

        let resolution = TimeBase::resolve(positions, measurements)?;
        let time_base = resolution.time_base;
        resolution
            .diagnostics
            .iter()
            .for_each(|d| self.logger.skipped(d));
        diagnostics.extend(resolution.diagnostics);
        self.logger.record(&format!(
            "time base at measurement line {} (t={})",
            time_base.first_valid_index + 1,
            time_base.first_valid_rel
        ));

        let matcher = Matcher::new(positions, &self.options);
        let sweep_filter = SweepFilter {
            filter: &self.filter,
            time_base: &time_base,
            matcher: &matcher,
            fixes: &positions.fixes,
        };
        let pending = &measurements.lines[time_base.first_valid_index..];

        let mut aggregator = Aggregator::new();
        if self.options.parallel {
            let verdicts: Vec<Verdict> = pending
                .par_iter()
                .map(|line| sweep_filter.evaluate(line))
                .collect();
            verdicts.into_iter().for_each(|v| aggregator.push(v));
        } else {
            pending
                .iter()
                .for_each(|line| aggregator.push(sweep_filter.evaluate(line)));
        }

        let mut collected = aggregator.finish();
        collected.metrics.record_positions(
            positions.len(),
            positions.diagnostics.len() + positions.short_lines,
        );
        collected
            .metrics
            .record_measurements(measurements.len(), time_base.first_valid_index);
        diagnostics.extend(collected.diagnostics);
        let summary = collected.metrics.snapshot();
        self.logger
            .record(&format!("found {} points matching the filter", summary.matches));

        if collected.observations.is_empty() {
            return Ok(CorrelationOutcome::Empty(EmptyReport {
                time_base,
                summary,
                diagnostics,
            }));
        }

        Ok(CorrelationOutcome::Matched(CorrelationReport {
            time_base,
            observations: collected.observations,
            encoded: collected.encoded,
            summary,
            diagnostics,
        }))
    }
}
