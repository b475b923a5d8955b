pub mod detector;
pub mod intervals;

pub use detector::{StepConfig, StepDetector, StepOutcome};
pub use intervals::{IntervalTracker, DEFAULT_INTERVAL_CAPACITY};
