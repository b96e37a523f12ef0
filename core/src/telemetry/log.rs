use crate::prelude::{LineDiagnostic, LineError};
use log::{debug, info, warn};

#[derive(Debug, Default, Clone, Copy)]
pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    /// Low-quality fixes are routine; everything else is worth a warning.
    pub fn skipped(&self, diagnostic: &LineDiagnostic) {
        match diagnostic.error {
            LineError::LowQuality { .. } => debug!("skipping {}", diagnostic),
            _ => warn!("skipping {}", diagnostic),
        }
    }
}
