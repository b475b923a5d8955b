use log::{debug, warn};
use nalgebra::Vector3;

/// Default smoothing coefficient; keeps heel-strike transients visible at
/// walking cadences while flattening sensor noise.
pub const DEFAULT_ALPHA: f64 = 0.25;

/// Per-axis single-pole low-pass filter over raw accelerometer samples.
///
/// Each axis follows `state += alpha * (raw - state)`. A smaller `alpha`
/// smooths harder but reacts slower; values in the 0.2–0.3 range work well
/// for body-worn phones sampled at 50–60 Hz.
#[derive(Debug, Clone)]
pub struct LowPassFilter {
    alpha: f64,
    state: Vector3<f64>,
    rejected: u64,
}

impl LowPassFilter {
    /// Creates a filter with the given smoothing coefficient. `alpha` must be
    /// finite and inside `(0, 1]`.
    pub fn new(alpha: f64) -> Self {
        assert!(alpha.is_finite() && alpha > 0.0 && alpha <= 1.0);
        Self {
            alpha,
            state: Vector3::zeros(),
            rejected: 0,
        }
    }

    /// Runs one raw sample through the filter and returns the smoothed triple.
    ///
    /// A sample carrying a non-finite component is dropped without touching
    /// the filter state, so one garbage reading cannot poison the smoothed
    /// signal; the rejection counter records the drop.
    pub fn apply(&mut self, raw: Vector3<f64>) -> Option<Vector3<f64>> {
        if !(raw.x.is_finite() && raw.y.is_finite() && raw.z.is_finite()) {
            self.rejected += 1;
            warn!(
                target: "stride_core::signal",
                "Dropping non-finite accelerometer sample ({} dropped so far)",
                self.rejected
            );
            return None;
        }

        self.state += (raw - self.state) * self.alpha;
        debug!(
            target: "stride_core::signal",
            "Filtered sample: [{:.4}, {:.4}, {:.4}], magnitude={:.4}",
            self.state.x, self.state.y, self.state.z, self.state.magnitude()
        );
        Some(self.state)
    }

    /// Euclidean magnitude of the current filtered state.
    pub fn magnitude(&self) -> f64 {
        self.state.magnitude()
    }

    /// Number of samples dropped for carrying non-finite components.
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    /// Zeroes the filter state and the rejection counter for a new session.
    pub fn reset(&mut self) {
        self.state = Vector3::zeros();
        self.rejected = 0;
    }
}

impl Default for LowPassFilter {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
