use std::time::{Duration, Instant};

const EPSILON: Duration = Duration::from_nanos(1);

/// Source of stream time for components that need "now" without reaching for
/// the wall clock directly.
pub trait Clock {
    fn now(&mut self) -> Duration;
}

#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Duration {
        self.origin.elapsed()
    }
}

/// Forces a stream of sample timestamps to be strictly increasing.
///
/// Host sensor clocks occasionally stall or deliver duplicate stamps; a
/// repeated or regressed timestamp is replaced with the previous one nudged
/// forward by a nanosecond so downstream interval math never sees a zero or
/// negative spacing.
#[derive(Debug, Clone, Default)]
pub struct MonotonicTimeline {
    last: Option<Duration>,
}

impl MonotonicTimeline {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Admits one raw timestamp and returns its monotonic replacement.
    pub fn ingest(&mut self, raw: Duration) -> Duration {
        let next = match self.last {
            Some(prev) if raw <= prev => prev.checked_add(EPSILON).unwrap_or(prev),
            _ => raw,
        };
        self.last = Some(next);
        next
    }

    /// Most recent admitted timestamp, if any.
    pub fn last(&self) -> Option<Duration> {
        self.last
    }

    /// Forgets the stream history so a new session can restart from zero.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
