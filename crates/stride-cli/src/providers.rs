use std::collections::VecDeque;

use nalgebra::Vector3;
use stride_core::time::MonotonicTimeline;
use stride_providers::{
    AccelSample, AccessDecision, Availability, MotionSensor, RawMotionEvent, SensorFault,
};

/// Replay sensing strategy backed by a parsed recording.
///
/// Follows the same two-phase protocol as the live host bridge so the replay
/// binary exercises the exact session path an embedding would: probing and
/// access always succeed, and the recorded samples drain in order while the
/// strategy is active.
pub struct RecordingSensor {
    samples: VecDeque<AccelSample>,
    active: bool,
}

impl RecordingSensor {
    pub fn new(events: Vec<RawMotionEvent>) -> Self {
        let mut timeline = MonotonicTimeline::new();
        let samples = events
            .into_iter()
            .map(|event| AccelSample {
                timestamp: timeline.ingest(event.timestamp.unwrap_or_default()),
                acceleration: Vector3::new(event.x, event.y, event.z),
            })
            .collect();
        Self {
            samples,
            active: false,
        }
    }

    /// Number of recorded samples not yet drained.
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl MotionSensor for RecordingSensor {
    fn name(&self) -> &'static str {
        "recording-replay"
    }

    fn availability(&self) -> Availability {
        Availability::Available
    }

    fn request_access(&mut self) -> AccessDecision {
        AccessDecision::Granted
    }

    fn activate(&mut self) -> Result<(), SensorFault> {
        self.active = true;
        Ok(())
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.samples.clear();
    }

    fn next_sample(&mut self) -> Option<AccelSample> {
        if !self.active {
            return None;
        }
        self.samples.pop_front()
    }

    fn take_fault(&mut self) -> Option<SensorFault> {
        None
    }
}
