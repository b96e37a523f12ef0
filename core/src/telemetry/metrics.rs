use crate::processing::filter::Verdict;
use serde::Serialize;

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub fixes_read: usize,
    /// Position lines dropped for low quality, bad numbers or too few fields.
    pub position_lines_skipped: usize,
    pub measurement_lines: usize,
    pub pre_roll_discarded: usize,
    pub malformed_lines: usize,
    pub below_power_threshold: usize,
    pub out_of_tolerance: usize,
    pub out_of_band: usize,
    pub matches: usize,
}

#[derive(Debug, Default)]
pub struct MetricsRecorder {
    summary: RunSummary,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_verdict(&mut self, verdict: &Verdict) {
        let counter = match verdict {
            Verdict::Accepted(_) => &mut self.summary.matches,
            Verdict::BelowPowerThreshold => &mut self.summary.below_power_threshold,
            Verdict::OutOfTolerance => &mut self.summary.out_of_tolerance,
            Verdict::OutOfBand => &mut self.summary.out_of_band,
            Verdict::Malformed(_) => &mut self.summary.malformed_lines,
        };
        *counter += 1;
    }

    pub fn record_positions(&mut self, fixes_read: usize, skipped: usize) {
        self.summary.fixes_read = fixes_read;
        self.summary.position_lines_skipped = skipped;
    }

    pub fn record_measurements(&mut self, total: usize, pre_roll: usize) {
        self.summary.measurement_lines = total;
        self.summary.pre_roll_discarded = pre_roll;
    }

    pub fn snapshot(&self) -> RunSummary {
        self.summary
    }
}
