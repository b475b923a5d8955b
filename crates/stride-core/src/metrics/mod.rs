use log::debug;
use std::time::Duration;

/// Symmetry score reported before enough intervals exist to measure spread
pub const DEFAULT_SYMMETRY: u8 = 100;

/// Minimum number of buffered intervals required to compute metrics
pub const MIN_INTERVALS: usize = 4;

/// Derived gait metrics for a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaitMetrics {
    /// Session-average cadence in steps per minute.
    pub cadence_spm: u32,
    /// Regularity score in 0..=100; 100 means perfectly even step timing.
    /// A proxy for gait symmetry from a single sensor, not a true
    /// left/right comparison.
    pub symmetry: u8,
}

impl Default for GaitMetrics {
    fn default() -> Self {
        Self {
            cadence_spm: 0,
            symmetry: DEFAULT_SYMMETRY,
        }
    }
}

impl GaitMetrics {
    /// Computes both metrics from the interval history.
    ///
    /// * `intervals`: buffered inter-step intervals; callers provide at
    ///   least [`MIN_INTERVALS`] of them.
    /// * `recorded`: monotonic count of intervals accepted this session,
    ///   which keeps counting past the buffer capacity.
    /// * `elapsed`: stream time since the first processed sample.
    pub fn from_intervals(intervals: &[Duration], recorded: u64, elapsed: Duration) -> Self {
        debug_assert!(intervals.len() >= MIN_INTERVALS);
        let metrics = Self {
            cadence_spm: cadence_spm(recorded, elapsed),
            symmetry: symmetry_index(intervals),
        };
        debug!(target: "stride_core::metrics",
            "Metrics from {} intervals ({} accepted, {:.2}s elapsed): cadence={} spm, symmetry={}",
            intervals.len(), recorded, elapsed.as_secs_f64(), metrics.cadence_spm, metrics.symmetry
        );
        metrics
    }
}

/// Inverse-variability score: 100 minus the coefficient of variation of the
/// intervals as a percentage, clamped to 0..=100 and rounded.
///
/// Identical intervals score 100; a spread whose standard deviation reaches
/// the mean scores 0. Uses the population standard deviation.
pub fn symmetry_index(intervals: &[Duration]) -> u8 {
    if intervals.is_empty() {
        return DEFAULT_SYMMETRY;
    }

    let n = intervals.len() as f64;
    let mean = intervals.iter().map(Duration::as_secs_f64).sum::<f64>() / n;
    if mean <= 0.0 {
        return DEFAULT_SYMMETRY;
    }

    let variance = intervals
        .iter()
        .map(|interval| {
            let deviation = interval.as_secs_f64() - mean;
            deviation * deviation
        })
        .sum::<f64>()
        / n;
    let cv_percent = variance.sqrt() / mean * 100.0;

    (100.0 - cv_percent).clamp(0.0, 100.0).round() as u8
}

/// Session-average cadence: accepted steps per elapsed minute, rounded.
/// Returns 0 before any stream time has passed.
pub fn cadence_spm(recorded: u64, elapsed: Duration) -> u32 {
    let minutes = elapsed.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }
    (recorded as f64 / minutes).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(values: &[u64]) -> Vec<Duration> {
        values.iter().map(|v| Duration::from_millis(*v)).collect()
    }

    #[test]
    fn identical_intervals_score_perfect_symmetry() {
        let intervals = ms(&[600, 600, 600, 600]);
        assert_eq!(symmetry_index(&intervals), 100);
    }

    #[test]
    fn alternating_intervals_lower_the_score() {
        // mean 600 ms, population stddev 100 ms, CV 16.67%
        let intervals = ms(&[500, 700, 500, 700]);
        assert_eq!(symmetry_index(&intervals), 83);
    }

    #[test]
    fn wider_spread_scores_lower_at_equal_mean() {
        let tight = symmetry_index(&ms(&[600, 600, 600, 600]));
        let loose = symmetry_index(&ms(&[500, 700, 500, 700]));
        let looser = symmetry_index(&ms(&[400, 800, 400, 800]));

        assert!(tight > loose);
        assert!(loose > looser);
        assert_eq!(looser, 67);
    }

    #[test]
    fn extreme_spread_clamps_to_zero() {
        // stddev exceeds the mean, so the raw score goes negative
        let intervals = ms(&[100, 100, 100, 2000]);
        assert_eq!(symmetry_index(&intervals), 0);
    }

    #[test]
    fn symmetry_stays_within_bounds_for_random_spreads() {
        for _ in 0..200 {
            let len = 4 + (rand::random::<usize>() % 17);
            let intervals: Vec<Duration> = (0..len)
                .map(|_| Duration::from_millis(100 + rand::random::<u64>() % 2900))
                .collect();
            assert!(symmetry_index(&intervals) <= 100);
        }
    }

    #[test]
    fn empty_and_zero_mean_inputs_fall_back_to_default() {
        assert_eq!(symmetry_index(&[]), DEFAULT_SYMMETRY);
        assert_eq!(symmetry_index(&ms(&[0, 0, 0, 0])), DEFAULT_SYMMETRY);
    }

    #[test]
    fn cadence_counts_steps_per_minute() {
        assert_eq!(cadence_spm(20, Duration::from_secs(30)), 40);
        assert_eq!(cadence_spm(9, Duration::from_secs(6)), 90);
        assert_eq!(cadence_spm(4, Duration::from_millis(3000)), 80);
    }

    #[test]
    fn cadence_is_zero_before_time_passes() {
        assert_eq!(cadence_spm(5, Duration::ZERO), 0);
    }

    #[test]
    fn cadence_uses_the_monotonic_count_not_the_buffer() {
        // 30 accepted over one minute even if only 20 are still buffered
        assert_eq!(cadence_spm(30, Duration::from_secs(60)), 30);
    }

    #[test]
    fn combined_metrics_carry_both_scores() {
        let intervals = ms(&[600, 600, 600, 600]);
        let metrics = GaitMetrics::from_intervals(&intervals, 4, Duration::from_secs(3));
        assert_eq!(metrics.cadence_spm, 80);
        assert_eq!(metrics.symmetry, 100);
    }

    #[test]
    fn default_metrics_are_idle_values() {
        let metrics = GaitMetrics::default();
        assert_eq!(metrics.cadence_spm, 0);
        assert_eq!(metrics.symmetry, DEFAULT_SYMMETRY);
    }
}
