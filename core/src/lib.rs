//! Correlation core for GPS fixes and spectral power sweeps.
//!
//! Both logs are parsed from memory, aligned on a shared time base, and
//! each sweep is paired with its nearest fix before frequency and power
//! predicates decide what is kept. Accepted sweeps come back in input order
//! together with a line-oriented encoding that can be written out as-is.

pub mod encoding;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod sources;
pub mod streams;
pub mod telemetry;

pub use encoding::ResultEncoder;
pub use prelude::{
    CorrelationError, CorrelationResult, EngineOptions, FilterConfig, LineDiagnostic, LineError,
    SearchStrategy, StreamKind,
};
pub use processing::{CorrelationEngine, CorrelationOutcome, CorrelationReport, MatchedObservation};
pub use streams::{PositionFix, SweepRecord};
pub use telemetry::RunSummary;
