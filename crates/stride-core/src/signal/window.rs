use std::collections::VecDeque;

/// Size of the rolling magnitude window (about 3.3 seconds at 60 Hz)
pub const DEFAULT_WINDOW_CAPACITY: usize = 200;

/// Rolling FIFO of recent filtered-magnitude values.
///
/// Holds at most `capacity` values; pushing past that evicts the oldest.
/// Step detection only ever inspects the newest three entries, so lookback
/// access stays O(1) regardless of capacity.
#[derive(Debug, Clone)]
pub struct MagnitudeWindow {
    window: VecDeque<f64>,
    capacity: usize,
}

impl MagnitudeWindow {
    /// Creates a window with the given capacity; at least three samples of
    /// lookback are required for peak detection.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity >= 3);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a magnitude, evicting the oldest value once at capacity.
    pub fn push(&mut self, magnitude: f64) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(magnitude);
    }

    /// The three newest magnitudes in arrival order `(prev2, prev, curr)`,
    /// or `None` until three samples have been buffered.
    pub fn last_three(&self) -> Option<(f64, f64, f64)> {
        let n = self.window.len();
        if n < 3 {
            return None;
        }
        Some((self.window[n - 3], self.window[n - 2], self.window[n - 1]))
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Buffered magnitudes, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.window.iter().copied()
    }

    /// Drops all buffered magnitudes; capacity is retained.
    pub fn clear(&mut self) {
        self.window.clear();
    }
}

impl Default for MagnitudeWindow {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_never_exceeds_capacity() {
        let mut window = MagnitudeWindow::new(5);
        for i in 0..100 {
            window.push(i as f64);
            assert!(window.len() <= 5);
        }
        assert_eq!(window.len(), 5);
    }

    #[test]
    fn overflow_keeps_the_newest_values_in_order() {
        let mut window = MagnitudeWindow::new(4);
        for i in 0..7 {
            window.push(i as f64);
        }

        let values: Vec<f64> = window.iter().collect();
        assert_eq!(values, vec![3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn last_three_requires_three_samples() {
        let mut window = MagnitudeWindow::new(8);
        window.push(1.0);
        assert_eq!(window.last_three(), None);
        window.push(2.0);
        assert_eq!(window.last_three(), None);
        window.push(3.0);
        assert_eq!(window.last_three(), Some((1.0, 2.0, 3.0)));
    }

    #[test]
    fn last_three_tracks_the_newest_entries() {
        let mut window = MagnitudeWindow::new(3);
        for value in [9.8, 12.4, 11.1, 9.9] {
            window.push(value);
        }
        assert_eq!(window.last_three(), Some((12.4, 11.1, 9.9)));
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut window = MagnitudeWindow::new(4);
        window.push(1.0);
        window.push(2.0);
        window.clear();

        assert!(window.is_empty());
        assert_eq!(window.capacity(), 4);
        assert_eq!(window.last_three(), None);
    }
}
