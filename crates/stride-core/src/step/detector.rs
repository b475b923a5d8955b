use log::debug;
use std::time::Duration;

/// Peak and spacing gates for step detection.
#[derive(Debug, Clone)]
pub struct StepConfig {
    /// Minimum peak magnitude that counts as a footstep (m/s²). Sits above
    /// resting gravity so only impact transients qualify.
    pub threshold: f64,
    /// Shortest plausible spacing between consecutive steps (~240 steps/min).
    pub min_interval: Duration,
    /// Longest spacing still attributed to continuous walking (~30 steps/min).
    pub max_interval: Duration,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            threshold: 11.0,
            min_interval: Duration::from_millis(250),
            max_interval: Duration::from_millis(2000),
        }
    }
}

/// What the detector concluded about the newest sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No qualifying local maximum at this sample.
    None,
    /// First step of the session; there is no previous step to measure
    /// an interval against.
    First { at: Duration },
    /// A step whose spacing from the previous one is physiologically
    /// plausible.
    Accepted { at: Duration, interval: Duration },
    /// A peak whose spacing fell outside the plausibility band. It becomes
    /// the new spacing anchor but contributes no interval.
    Rejected { at: Duration, interval: Duration },
}

/// Three-point local-maximum step detector.
///
/// A footstep is declared when the middle of the three newest magnitudes is a
/// strict local maximum above the threshold. Detection therefore lands one
/// sample after the physical peak, once a smaller value confirms the descent.
/// Every declared peak becomes the new spacing anchor whether its interval
/// was accepted or not, so after a long pause the first peak re-anchors and
/// counting resumes on the following step.
#[derive(Debug, Clone)]
pub struct StepDetector {
    config: StepConfig,
    last_step_at: Option<Duration>,
}

impl StepDetector {
    pub fn new(config: StepConfig) -> Self {
        assert!(config.threshold.is_finite() && config.threshold > 0.0);
        assert!(config.min_interval <= config.max_interval);
        Self {
            config,
            last_step_at: None,
        }
    }

    /// Evaluates the three newest magnitudes, oldest first, against the peak
    /// and spacing gates. `at` is the stream timestamp of the newest sample.
    pub fn evaluate(&mut self, prev2: f64, prev: f64, curr: f64, at: Duration) -> StepOutcome {
        let is_peak = prev > curr && prev > prev2 && prev > self.config.threshold;
        if !is_peak {
            return StepOutcome::None;
        }

        let Some(anchor) = self.last_step_at else {
            self.last_step_at = Some(at);
            debug!(
                target: "stride_core::step",
                "First step at {:.3}s (peak {:.2} m/s²)",
                at.as_secs_f64(),
                prev
            );
            return StepOutcome::First { at };
        };

        let interval = at.saturating_sub(anchor);
        self.last_step_at = Some(at);

        if interval >= self.config.min_interval && interval <= self.config.max_interval {
            debug!(
                target: "stride_core::step",
                "Step at {:.3}s: interval {} ms accepted",
                at.as_secs_f64(),
                interval.as_millis()
            );
            StepOutcome::Accepted { at, interval }
        } else {
            debug!(
                target: "stride_core::step",
                "Peak at {:.3}s: interval {} ms outside {}..{} ms, rejected",
                at.as_secs_f64(),
                interval.as_millis(),
                self.config.min_interval.as_millis(),
                self.config.max_interval.as_millis()
            );
            StepOutcome::Rejected { at, interval }
        }
    }

    /// Timestamp of the most recent declared peak, if any.
    pub fn last_step_at(&self) -> Option<Duration> {
        self.last_step_at
    }

    /// Forgets the spacing anchor for a new session.
    pub fn reset(&mut self) {
        self.last_step_at = None;
    }
}

impl Default for StepDetector {
    fn default() -> Self {
        Self::new(StepConfig::default())
    }
}
