use log::debug;
use std::collections::VecDeque;
use std::time::Duration;

/// Default interval history size (20 intervals at typical walking cadence
/// spans roughly 10–15 seconds)
pub const DEFAULT_INTERVAL_CAPACITY: usize = 20;

/// Bounded history of accepted inter-step intervals.
///
/// Keeps the newest `capacity` intervals in arrival order for metric
/// computation, and counts every acceptance monotonically. The count keeps
/// growing after the buffer caps; it drives the metrics trigger and the
/// cadence numerator, where evicted intervals still matter.
#[derive(Debug, Clone)]
pub struct IntervalTracker {
    window: VecDeque<Duration>,
    capacity: usize,
    recorded: u64,
}

impl IntervalTracker {
    /// Creates a tracker with the given history capacity
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            recorded: 0,
        }
    }

    /// Appends an accepted interval, evicting the oldest once at capacity.
    pub fn record(&mut self, interval: Duration) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(interval);
        self.recorded += 1;

        debug!(target: "stride_core::step",
            "Interval recorded: {} ms (held {}, accepted {})",
            interval.as_millis(), self.window.len(), self.recorded
        );
    }

    /// Buffered intervals in insertion order, oldest first.
    pub fn snapshot(&self) -> Vec<Duration> {
        self.window.iter().copied().collect()
    }

    /// Total number of intervals accepted this session, eviction included.
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Number of intervals currently held.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clears the history and the acceptance count for a new session.
    pub fn clear(&mut self) {
        self.window.clear();
        self.recorded = 0;
        debug!(target: "stride_core::step", "Interval tracker cleared");
    }
}

impl Default for IntervalTracker {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_CAPACITY)
    }
}
