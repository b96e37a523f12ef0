use crate::generator::template::{gps_line, sweep_line};
use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for generating a synthetic pair of survey logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub fixes: usize,
    pub fix_interval_us: i64,
    pub start_us: i64,
    /// Every n-th fix is written with a status below the quality cut.
    pub low_quality_every: usize,
    pub origin: (f64, f64, f64),
    pub step_deg: f64,
    pub sweeps: usize,
    pub sweep_interval_secs: f64,
    /// Sweeps written before the instrument clock turns positive.
    pub pre_roll: usize,
    pub clock_offset_secs: f64,
    /// Every n-th sweep line is replaced with garbage.
    pub corrupt_every: usize,
    pub bands: Vec<(i64, i64)>,
    pub samples_per_sweep: usize,
    pub noise_floor_db: f64,
    pub noise_spread_db: f64,
    pub signal_db: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fixes: 120,
            fix_interval_us: 1_000_000,
            start_us: 361_000_000,
            low_quality_every: 7,
            origin: (55.7522, 37.6156, 144.0),
            step_deg: 0.0001,
            sweeps: 200,
            sweep_interval_secs: 0.5,
            pre_roll: 3,
            clock_offset_secs: 1_000.0,
            corrupt_every: 50,
            bands: vec![(420, 430), (430, 440), (440, 450)],
            samples_per_sweep: 8,
            noise_floor_db: -85.0,
            noise_spread_db: 6.0,
            signal_db: -50.0,
            seed: 7,
        }
    }
}

/// Generated log contents, not yet written anywhere.
pub struct SyntheticSurvey {
    pub gps_log: String,
    pub data_log: String,
}

/// Paths of a survey written to disk.
pub struct SurveyFiles {
    pub gps_log: PathBuf,
    pub data_log: PathBuf,
}

fn build_gps_log(config: &GeneratorConfig) -> String {
    let (lat, lon, alt) = config.origin;
    let mut lines = Vec::with_capacity(config.fixes);
    for index in 0..config.fixes {
        let low_quality = config.low_quality_every > 0
            && index % config.low_quality_every == config.low_quality_every - 1;
        let status = if low_quality { 1 } else { 3 };
        let step = index as f64 * config.step_deg;
        lines.push(gps_line(
            config.start_us + index as i64 * config.fix_interval_us,
            status,
            lat + step,
            lon + step * 0.5,
            alt + (index % 10) as f64 * 0.25,
        ));
    }
    lines.join("\n") + "\n"
}

fn build_data_log(config: &GeneratorConfig) -> anyhow::Result<String> {
    if config.bands.is_empty() {
        anyhow::bail!("generator needs at least one frequency band");
    }
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut out = String::new();

    for index in 0..config.pre_roll {
        let time = -(index as f64) * config.sweep_interval_secs;
        let (freq_min, freq_max) = config.bands[index % config.bands.len()];
        out.push_str(&sweep_line(time, freq_min, freq_max, &[config.signal_db]));
    }

    let spread = config.noise_spread_db.abs().max(f64::EPSILON);
    for index in 0..config.sweeps {
        if config.corrupt_every > 0 && index % config.corrupt_every == config.corrupt_every - 1 {
            out.push_str("ERR:checksum\n");
            continue;
        }
        let time = config.clock_offset_secs + index as f64 * config.sweep_interval_secs;
        let (freq_min, freq_max) = config.bands[index % config.bands.len()];
        let peak = rng.gen_range(0..config.samples_per_sweep.max(1));
        let powers: Vec<f64> = (0..config.samples_per_sweep.max(1))
            .map(|sample| {
                let jitter = rng.gen_range(-spread..spread);
                if sample == peak {
                    config.signal_db + jitter
                } else {
                    config.noise_floor_db + jitter
                }
            })
            .collect();
        out.push_str(&sweep_line(time, freq_min, freq_max, &powers));
    }

    Ok(out)
}

pub fn build_survey(config: &GeneratorConfig) -> anyhow::Result<SyntheticSurvey> {
    Ok(SyntheticSurvey {
        gps_log: build_gps_log(config),
        data_log: build_data_log(config).context("building synthetic sweep log")?,
    })
}

/// Writes `survey.log` and `survey.data` into `dir`, creating it if needed.
pub fn write_survey(dir: &Path, config: &GeneratorConfig) -> anyhow::Result<SurveyFiles> {
    let survey = build_survey(config)?;
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let files = SurveyFiles {
        gps_log: dir.join("survey.log"),
        data_log: dir.join("survey.data"),
    };
    fs::write(&files.gps_log, survey.gps_log)
        .with_context(|| format!("writing {}", files.gps_log.display()))?;
    fs::write(&files.data_log, survey.data_log)
        .with_context(|| format!("writing {}", files.data_log.display()))?;
    Ok(files)
}
