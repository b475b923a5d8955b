use std::fmt;

use log::debug;

use crate::host::AccelSample;

/// Whether a sensing strategy can deliver samples on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable(String),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

/// Outcome of the access half of the two-phase acquisition handshake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied(String),
}

/// Runtime fault raised by an active sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorFault {
    pub message: String,
}

impl SensorFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// A source of accelerometer samples.
///
/// Acquisition is two-phase: callers probe `availability`, then
/// `request_access`, then `activate`. While active, samples queue inside the
/// strategy and are drained in arrival order with `next_sample`; faults from
/// the underlying sensor are drained separately with `take_fault` so a bad
/// sensor degrades the session instead of crashing it.
pub trait MotionSensor {
    /// Short strategy name for logs.
    fn name(&self) -> &'static str;

    fn availability(&self) -> Availability;

    fn request_access(&mut self) -> AccessDecision;

    /// Begins sample delivery. Must be a no-op when already active.
    fn activate(&mut self) -> Result<(), SensorFault>;

    /// Halts delivery and discards anything still queued; events that raced
    /// the deactivation must not surface afterwards.
    fn deactivate(&mut self);

    /// Next pending sample in arrival order, if any.
    fn next_sample(&mut self) -> Option<AccelSample>;

    /// Oldest unreported runtime fault, if any.
    fn take_fault(&mut self) -> Option<SensorFault>;
}

/// Picks the first available strategy from `candidates`, probing in order.
///
/// Returns the per-candidate rejection reasons when none qualifies, so the
/// caller can report why the host has no usable motion source.
pub fn first_available(
    candidates: Vec<Box<dyn MotionSensor>>,
) -> Result<Box<dyn MotionSensor>, Vec<String>> {
    let mut reasons = Vec::new();
    for candidate in candidates {
        match candidate.availability() {
            Availability::Available => {
                debug!(target: "stride_providers", "Selected motion source: {}", candidate.name());
                return Ok(candidate);
            }
            Availability::Unavailable(reason) => {
                debug!(
                    target: "stride_providers",
                    "Skipping motion source {}: {}",
                    candidate.name(),
                    reason
                );
                reasons.push(format!("{}: {}", candidate.name(), reason));
            }
        }
    }
    Err(reasons)
}
