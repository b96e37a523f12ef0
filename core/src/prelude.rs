use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Maximum distance in seconds between a sweep and its nearest fix.
pub const DEFAULT_TOLERANCE_SECS: f64 = 1.0;

/// Minimum GPS status accepted as a usable fix.
pub const MIN_FIX_QUALITY: i64 = 3;

/// Calendar date the microsecond clock of the positional log counts from.
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 28).unwrap_or(NaiveDate::MIN)
}

/// Frequency band and power threshold applied to every sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub min_frequency: i64,
    pub max_frequency: i64,
    pub min_power_db: f64,
}

impl FilterConfig {
    pub fn new(min_frequency: i64, max_frequency: i64, min_power_db: f64) -> CorrelationResult<Self> {
        let config = Self {
            min_frequency,
            max_frequency,
            min_power_db,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CorrelationResult<()> {
        if self.min_frequency > self.max_frequency {
            return Err(CorrelationError::InvalidFilter {
                min: self.min_frequency,
                max: self.max_frequency,
            });
        }
        Ok(())
    }

    /// Both band edges must sit inside the inclusive range.
    pub fn accepts_band(&self, freq_min: i64, freq_max: i64) -> bool {
        let range = self.min_frequency..=self.max_frequency;
        range.contains(&freq_min) && range.contains(&freq_max)
    }

    /// Keeps samples strictly above the threshold, preserving order.
    pub fn retain_powers(&self, powers: &[f64]) -> Vec<f64> {
        powers
            .iter()
            .copied()
            .filter(|&p| p > self.min_power_db)
            .collect()
    }
}

/// How the nearest fix is located for each sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// O(n) scan per sweep.
    #[default]
    Linear,
    /// O(log n) search over the time-ordered offsets.
    Binary,
}

/// Knobs that do not change what a filter accepts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub search: SearchStrategy,
    pub parallel: bool,
    pub tolerance_secs: f64,
    pub reference_date: NaiveDate,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            search: SearchStrategy::Linear,
            parallel: false,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
            reference_date: default_reference_date(),
        }
    }
}

/// Which input log a diagnostic or failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamKind {
    Position,
    Measurement,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Position => write!(f, "position"),
            StreamKind::Measurement => write!(f, "measurement"),
        }
    }
}

/// Terminal failures of a correlation run.
#[derive(thiserror::Error, Debug)]
pub enum CorrelationError {
    #[error("{stream} source not found: {}", .path.display())]
    SourceNotFound { stream: StreamKind, path: PathBuf },
    #[error("failed to read {stream} source {}: {source}", .path.display())]
    SourceUnreadable {
        stream: StreamKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no position data: no fix passed the quality filter")]
    EmptyPositionData,
    #[error("no valid time base: no measurement record has a positive time")]
    NoValidTimeBase,
    #[error("invalid filter: min frequency {min} exceeds max frequency {max}")]
    InvalidFilter { min: i64, max: i64 },
}

pub type CorrelationResult<T> = Result<T, CorrelationError>;

/// Reasons a single line is skipped. Never fatal.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize)]
pub enum LineError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },
    #[error("field `{field}` is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("fix status {status} below minimum quality")]
    LowQuality { status: i64 },
}

/// A skipped line, kept for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineDiagnostic {
    pub stream: StreamKind,
    /// 1-based line number in the source text.
    pub line_number: usize,
    pub content: String,
    pub error: LineError,
}

impl LineDiagnostic {
    pub fn new(stream: StreamKind, line_number: usize, content: &str, error: LineError) -> Self {
        Self {
            stream,
            line_number,
            content: content.trim().to_string(),
            error,
        }
    }
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} line {}: {} ({:?})",
            self.stream, self.line_number, self.error, self.content
        )
    }
}
