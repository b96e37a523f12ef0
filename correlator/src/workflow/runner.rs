use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use geosweep::prelude::StreamKind;
use geosweep::processing::{CorrelationEngine, CorrelationOutcome};
use geosweep::sources::read_source;

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Loads both logs and runs one correlation pass over them.
    pub fn execute(&self) -> anyhow::Result<CorrelationOutcome> {
        let gps_text = read_source(StreamKind::Position, &self.config.gps_log)
            .context("loading GPS log")?;
        let data_text = read_source(StreamKind::Measurement, &self.config.data_log)
            .context("loading measurement data")?;

        log::info!(
            "filter: min freq={} max freq={} min power={:.2}",
            self.config.filter.min_frequency,
            self.config.filter.max_frequency,
            self.config.filter.min_power_db
        );

        let engine = CorrelationEngine::new(self.config.filter, self.config.engine.clone());
        engine
            .run(&gps_text, &data_text)
            .context("correlating GPS fixes with sweeps")
    }
}
