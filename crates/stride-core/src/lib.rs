pub mod contracts;
pub mod metrics;
pub mod signal;
pub mod step;
pub mod time;
