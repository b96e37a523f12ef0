use crate::prelude::LineError;
use serde::Serialize;

const MIN_SWEEP_FIELDS: usize = 4;

/// One relative-time spectral power sample spanning a frequency band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepRecord {
    pub time_rel: f64,
    pub freq_min: i64,
    pub freq_max: i64,
    pub powers: Vec<f64>,
}

impl SweepRecord {
    /// Parses `<time>:<freqMin>:<freqMax>:<powers...>`.
    ///
    /// Powers come from the fourth field only; anything after a further
    /// colon is ignored.
    pub fn parse(line: &str) -> Result<Self, LineError> {
        let fields = split_fields(line)?;
        let time_rel = parse_number(fields[0], "time")?;
        let freq_min = parse_number(fields[1], "freq_min")?;
        let freq_max = parse_number(fields[2], "freq_max")?;
        let powers = fields[3]
            .split_whitespace()
            .map(|token| parse_number(token, "power"))
            .collect::<Result<Vec<f64>, _>>()?;

        Ok(Self {
            time_rel,
            freq_min,
            freq_max,
            powers,
        })
    }
}

/// A raw measurement line, kept whole so records can be re-indexed later.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementLine {
    /// 1-based position in the source text.
    pub number: usize,
    pub raw: String,
}

impl MeasurementLine {
    /// Reads only the leading time field, which is all the time base needs.
    pub fn time(&self) -> Result<f64, LineError> {
        let fields = split_fields(&self.raw)?;
        parse_number(fields[0], "time")
    }

    pub fn record(&self) -> Result<SweepRecord, LineError> {
        SweepRecord::parse(&self.raw)
    }
}

/// Every line of a measurement log in source order.
#[derive(Debug, Clone, Default)]
pub struct MeasurementStream {
    pub lines: Vec<MeasurementLine>,
}

impl MeasurementStream {
    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(index, raw)| MeasurementLine {
                number: index + 1,
                raw: raw.to_string(),
            })
            .collect();
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn split_fields(line: &str) -> Result<Vec<&str>, LineError> {
    let fields: Vec<&str> = line.trim().split(':').collect();
    if fields.len() < MIN_SWEEP_FIELDS {
        return Err(LineError::TooFewFields {
            expected: MIN_SWEEP_FIELDS,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn parse_number<T: std::str::FromStr>(raw: &str, field: &'static str) -> Result<T, LineError> {
    let trimmed = raw.trim();
    trimmed.parse().map_err(|_| LineError::InvalidNumber {
        field,
        value: trimmed.to_string(),
    })
}
