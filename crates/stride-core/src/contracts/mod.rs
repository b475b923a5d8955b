use serde::{Deserialize, Serialize};

use crate::metrics::DEFAULT_SYMMETRY;

/// Lifecycle phase of a tracking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    Running,
}

/// Payload delivered to the metrics listener each time the session
/// recomputes its gait metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsUpdate {
    pub symmetry: u8,
    pub cadence_spm: u32,
    /// Buffered inter-step intervals in milliseconds, oldest first.
    pub step_intervals_ms: Vec<u64>,
    /// Stream timestamp of the step that triggered this update.
    pub timestamp_ms: u64,
}

/// Synchronously queryable mirror of a session's state, safe to hand across
/// an embedding boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub step_count: u64,
    pub symmetry: u8,
    pub cadence_spm: u32,
    pub recorded_intervals: u64,
    pub dropped_samples: u64,
    pub error: Option<String>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Idle,
            step_count: 0,
            symmetry: DEFAULT_SYMMETRY,
            cadence_spm: 0,
            recorded_intervals: 0,
            dropped_samples: 0,
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_update_round_trips_through_json() {
        let update = MetricsUpdate {
            symmetry: 93,
            cadence_spm: 104,
            step_intervals_ms: vec![580, 602, 575, 610],
            timestamp_ms: 12_345,
        };

        let json = serde_json::to_string(&update).unwrap();
        let back: MetricsUpdate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, update);
    }

    #[test]
    fn default_snapshot_is_idle() {
        let snapshot = SessionSnapshot::default();
        assert_eq!(snapshot.phase, SessionPhase::Idle);
        assert_eq!(snapshot.symmetry, DEFAULT_SYMMETRY);
        assert_eq!(snapshot.step_count, 0);
        assert!(snapshot.error.is_none());
    }
}
