pub mod measurement;
pub mod position;

pub use measurement::{MeasurementLine, MeasurementStream, SweepRecord};
pub use position::{PositionFix, PositionStream};
