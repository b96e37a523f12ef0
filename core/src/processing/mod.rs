pub mod engine;
pub mod filter;
pub mod matcher;
pub mod time_base;

pub use engine::{CorrelationEngine, CorrelationOutcome, CorrelationReport, EmptyReport};
pub use filter::{Aggregator, MatchedObservation, SweepFilter, Verdict};
pub use matcher::{MatchDecision, Matcher};
pub use time_base::{Resolution, TimeBase};
