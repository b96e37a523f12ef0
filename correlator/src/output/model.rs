use geosweep::prelude::FilterConfig;
use geosweep::processing::{CorrelationReport, MatchedObservation, TimeBase};
use geosweep::RunSummary;
use serde::Serialize;

/// Serializable view of a finished run, handed to JSON consumers.
#[derive(Debug, Clone, Serialize)]
pub struct ReportModel {
    pub filter: FilterConfig,
    pub time_base: TimeBase,
    pub summary: RunSummary,
    pub skipped_lines: usize,
    pub observations: Vec<MatchedObservation>,
}

impl ReportModel {
    pub fn new(filter: FilterConfig, report: &CorrelationReport) -> Self {
        Self {
            filter,
            time_base: report.time_base,
            summary: report.summary,
            skipped_lines: report.diagnostics.len(),
            observations: report.observations.clone(),
        }
    }
}
