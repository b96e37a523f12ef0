use anyhow::Context;
use geosweep::prelude::{EngineOptions, FilterConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_preview_lines() -> usize {
    10
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub gps_log: PathBuf,
    pub data_log: PathBuf,
    pub filter: FilterConfig,
    #[serde(default)]
    pub engine: EngineOptions,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub save_data: bool,
    #[serde(default)]
    pub save_json: bool,
    #[serde(default)]
    pub list_points: bool,
    #[serde(default = "default_preview_lines")]
    pub preview_lines: usize,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config
            .filter
            .validate()
            .with_context(|| format!("validating workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        gps_log: PathBuf,
        data_log: PathBuf,
        min_frequency: i64,
        max_frequency: i64,
        min_power_db: f64,
    ) -> anyhow::Result<Self> {
        let filter = FilterConfig::new(min_frequency, max_frequency, min_power_db)
            .context("building filter from arguments")?;
        Ok(Self {
            gps_log,
            data_log,
            filter,
            engine: EngineOptions::default(),
            output_dir: default_output_dir(),
            save_data: false,
            save_json: false,
            list_points: false,
            preview_lines: default_preview_lines(),
        })
    }
}
