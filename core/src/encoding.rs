//! Line-oriented text form of matched observations.
//!
//! Each observation becomes `{relative:.3}:{freq_min:04}:{freq_max:04}: {powers}`
//! with powers printed to one decimal. The output parses back as a
//! measurement log line.

use crate::prelude::FilterConfig;
use crate::processing::filter::MatchedObservation;

pub const FILTERED_FILE_SUFFIX: &str = "_filtered.data";

pub struct ResultEncoder;

impl ResultEncoder {
    /// Encodes one observation, newline included.
    pub fn encode(observation: &MatchedObservation) -> String {
        Self::encode_parts(
            observation.relative_time,
            observation.freq_min,
            observation.freq_max,
            &observation.powers,
        )
    }

    pub fn encode_parts(relative_time: f64, freq_min: i64, freq_max: i64, powers: &[f64]) -> String {
        let powers = powers
            .iter()
            .map(|p| format!("{:.1}", p))
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "{:.3}:{:04}:{:04}: {}\n",
            relative_time, freq_min, freq_max, powers
        )
    }

    pub fn encode_all(observations: &[MatchedObservation]) -> String {
        observations.iter().map(Self::encode).collect()
    }

    /// Filename stem naming the filter that produced a result set.
    pub fn base_filename(filter: &FilterConfig) -> String {
        format!(
            "filtered_data_minfreq-{}_maxfreq-{}_minpower-{:.2}",
            filter.min_frequency, filter.max_frequency, filter.min_power_db
        )
    }

    pub fn data_filename(filter: &FilterConfig) -> String {
        format!("{}{}", Self::base_filename(filter), FILTERED_FILE_SUFFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streams::SweepRecord;

    #[test]
    fn encodes_with_padding_and_fixed_precision() {
        let line = ResultEncoder::encode_parts(1.23456, 95, 1200, &[-40.04, 3.0]);
        assert_eq!(line, "1.235:0095:1200: -40.0 3.0\n");
    }

    #[test]
    fn encoded_line_parses_as_a_sweep() {
        let line = ResultEncoder::encode_parts(12.0, 433, 434, &[-61.26, -58.71]);
        let record = SweepRecord::parse(&line).unwrap();
        assert_eq!(record.freq_min, 433);
        assert_eq!(record.freq_max, 434);
        assert_eq!(record.powers, vec![-61.3, -58.7]);
        assert_eq!(record.time_rel, 12.0);
    }

    #[test]
    fn filenames_carry_the_filter() {
        let filter = FilterConfig::new(400, 450, -60.5).unwrap();
        assert_eq!(
            ResultEncoder::base_filename(&filter),
            "filtered_data_minfreq-400_maxfreq-450_minpower--60.50"
        );
        assert_eq!(
            ResultEncoder::data_filename(&filter),
            "filtered_data_minfreq-400_maxfreq-450_minpower--60.50_filtered.data"
        );
    }
}
