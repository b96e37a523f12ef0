use crate::output::model::ReportModel;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use geosweep::processing::{CorrelationReport, MatchedObservation};
use geosweep::ResultEncoder;
use std::fs;
use std::path::PathBuf;

/// First `limit` encoded lines, plus a trailer counting the rest.
pub fn preview(encoded: &[String], limit: usize) -> Vec<String> {
    let mut lines: Vec<String> = encoded
        .iter()
        .take(limit)
        .map(|line| line.trim_end().to_string())
        .collect();
    if encoded.len() > limit {
        lines.push(format!("... and {} more lines", encoded.len() - limit));
    }
    lines
}

/// Human-readable description of every matched point.
pub fn point_listing(observations: &[MatchedObservation]) -> Vec<String> {
    observations
        .iter()
        .enumerate()
        .map(|(index, obs)| {
            let (lat, lon, alt) = obs.coords;
            let powers = obs
                .powers
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            format!(
                "point {}: lat {:.6}, lon {:.6}, alt {:.2} m, time {}, band {}-{} MHz, powers {} dB",
                index + 1,
                lat,
                lon,
                alt,
                obs.measured_at.format("%H:%M:%S"),
                obs.freq_min,
                obs.freq_max,
                powers
            )
        })
        .collect()
}

/// Writes whichever outputs the workflow asks for and returns their paths.
pub fn persist(report: &CorrelationReport, config: &WorkflowConfig) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    if !config.save_data && !config.save_json {
        return Ok(written);
    }
    fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating output dir {}", config.output_dir.display()))?;

    if config.save_data {
        let path = config
            .output_dir
            .join(ResultEncoder::data_filename(&config.filter));
        fs::write(&path, report.encoded_text())
            .with_context(|| format!("writing filtered data {}", path.display()))?;
        log::info!("filtered data saved to {}", path.display());
        written.push(path);
    }

    if config.save_json {
        let path = config
            .output_dir
            .join(format!("{}.json", ResultEncoder::base_filename(&config.filter)));
        let model = ReportModel::new(config.filter, report);
        let json = serde_json::to_string_pretty(&model).context("serializing observations")?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("observations saved to {}", path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{write_survey, GeneratorConfig};
    use crate::workflow::runner::Runner;
    use geosweep::processing::CorrelationOutcome;
    use geosweep::streams::MeasurementStream;
    use tempfile::tempdir;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("{}.000:0100:0200: 1.0\n", i)).collect()
    }

    #[test]
    fn preview_truncates_with_trailer() {
        let shown = preview(&lines(13), 10);
        assert_eq!(shown.len(), 11);
        assert_eq!(shown[0], "0.000:0100:0200: 1.0");
        assert_eq!(shown[10], "... and 3 more lines");
        assert_eq!(preview(&lines(4), 10).len(), 4);
    }

    #[test]
    fn persist_writes_data_and_json() {
        let dir = tempdir().unwrap();
        let survey = write_survey(&dir.path().join("in"), &GeneratorConfig::default()).unwrap();
        let mut cfg =
            WorkflowConfig::from_args(survey.gps_log, survey.data_log, 420, 450, -70.0).unwrap();
        cfg.output_dir = dir.path().join("out");
        cfg.save_data = true;
        cfg.save_json = true;

        let CorrelationOutcome::Matched(report) = Runner::new(cfg.clone()).execute().unwrap() else {
            panic!("expected matches");
        };
        let written = persist(&report, &cfg).unwrap();
        assert_eq!(written.len(), 2);
        assert!(written[0]
            .to_string_lossy()
            .ends_with("filtered_data_minfreq-420_maxfreq-450_minpower--70.00_filtered.data"));

        let saved = fs::read_to_string(&written[0]).unwrap();
        assert_eq!(saved, report.encoded_text());
        assert_eq!(MeasurementStream::parse(&saved).len(), report.observations.len());

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(
            json["observations"].as_array().unwrap().len(),
            report.observations.len()
        );
    }

    #[test]
    fn listing_formats_coordinates() {
        let dir = tempdir().unwrap();
        let survey = write_survey(dir.path(), &GeneratorConfig::default()).unwrap();
        let cfg = WorkflowConfig::from_args(survey.gps_log, survey.data_log, 430, 440, -70.0).unwrap();
        let outcome = Runner::new(cfg).execute().unwrap();
        let listing = point_listing(outcome.observations());
        assert_eq!(listing.len(), outcome.observations().len());
        assert!(listing[0].starts_with("point 1: lat 55.75"));
        assert!(listing[0].contains("band 430-440 MHz"));
    }
}
