use std::collections::VecDeque;
use std::time::Duration;

use log::debug;
use nalgebra::Vector3;
use stride_core::time::{Clock, MonotonicTimeline, SystemClock};

use crate::sensor::{AccessDecision, Availability, MotionSensor, SensorFault};

/// A raw motion event as delivered by the embedding host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMotionEvent {
    /// Host-provided timestamp; events without one are stamped from the
    /// provider clock on arrival.
    pub timestamp: Option<Duration>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A normalized accelerometer sample ready for the session pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample {
    /// Strictly increasing stream timestamp.
    pub timestamp: Duration,
    /// Acceleration in m/s², device coordinates.
    pub acceleration: Vector3<f64>,
}

/// Push-bridge sensing strategy backed by the host's accelerometer.
///
/// The embedding forwards each reading through `push_reading`; samples queue
/// in FIFO order and are drained by the session while active. Timestamps are
/// forced strictly monotonic so a glitched sensor clock cannot feed the
/// interval math zero or negative spacings.
#[derive(Debug, Clone)]
pub struct HostMotionSensor<C: Clock = SystemClock> {
    clock: C,
    timeline: MonotonicTimeline,
    queue: VecDeque<AccelSample>,
    faults: VecDeque<SensorFault>,
    availability: Availability,
    access: AccessDecision,
    active: bool,
}

impl HostMotionSensor<SystemClock> {
    /// An available, pre-authorized bridge stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock::default())
    }

    /// A bridge whose capability probe fails, modelling a host without a
    /// compatible accelerometer.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        let mut sensor = Self::new();
        sensor.availability = Availability::Unavailable(reason.into());
        sensor
    }

    /// A bridge whose access request is refused, modelling a user who
    /// declined the motion permission prompt.
    pub fn denied(reason: impl Into<String>) -> Self {
        let mut sensor = Self::new();
        sensor.access = AccessDecision::Denied(reason.into());
        sensor
    }
}

impl Default for HostMotionSensor<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> HostMotionSensor<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            timeline: MonotonicTimeline::new(),
            queue: VecDeque::new(),
            faults: VecDeque::new(),
            availability: Availability::Available,
            access: AccessDecision::Granted,
            active: false,
        }
    }

    /// Queues one reading from the host's sensor callback. Readings pushed
    /// while inactive are discarded so late events cannot leak into a
    /// stopped session. Returns the normalized sample when queued.
    pub fn push_reading(&mut self, event: RawMotionEvent) -> Option<AccelSample> {
        if !self.active {
            debug!(target: "stride_providers", "Discarding motion event pushed while inactive");
            return None;
        }

        let raw = match event.timestamp {
            Some(timestamp) => timestamp,
            None => self.clock.now(),
        };
        let sample = AccelSample {
            timestamp: self.timeline.ingest(raw),
            acceleration: Vector3::new(event.x, event.y, event.z),
        };
        self.queue.push_back(sample);
        Some(sample)
    }

    /// Records a runtime fault reported by the underlying sensor.
    pub fn push_fault(&mut self, message: impl Into<String>) {
        self.faults.push_back(SensorFault::new(message));
    }

    /// Number of samples waiting to be drained.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<C: Clock> MotionSensor for HostMotionSensor<C> {
    fn name(&self) -> &'static str {
        "host-accelerometer"
    }

    fn availability(&self) -> Availability {
        self.availability.clone()
    }

    fn request_access(&mut self) -> AccessDecision {
        self.access.clone()
    }

    fn activate(&mut self) -> Result<(), SensorFault> {
        if !self.active {
            self.active = true;
            self.timeline.reset();
            self.queue.clear();
            debug!(target: "stride_providers", "Host accelerometer activated");
        }
        Ok(())
    }

    fn deactivate(&mut self) {
        if self.active {
            debug!(
                target: "stride_providers",
                "Host accelerometer deactivated ({} queued samples discarded)",
                self.queue.len()
            );
        }
        self.active = false;
        self.queue.clear();
    }

    fn next_sample(&mut self) -> Option<AccelSample> {
        self.queue.pop_front()
    }

    fn take_fault(&mut self) -> Option<SensorFault> {
        self.faults.pop_front()
    }
}
