pub mod errors;
pub mod output;
pub mod providers;
pub mod recording;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use log::info;
use stride_engine::{GaitEngine, SessionConfig};
use stride_providers::RawMotionEvent;

use crate::errors::{ReplayError, Result};
use crate::output::{Metadata, ReplayOutput, Summary};
use crate::providers::RecordingSensor;
use crate::recording::RecordingParser;

/// Replays recorded accelerometer sessions through the gait engine
pub struct ReplayProcessor {
    config: SessionConfig,
}

impl ReplayProcessor {
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Replay one recording end to end and collect the session's output
    pub fn process_recording<P: AsRef<Path>>(&mut self, path: P) -> Result<ReplayOutput> {
        let events = RecordingParser::parse_file(path.as_ref())?;
        let sample_count = events.len();
        let duration_seconds = recording_span_seconds(&events);

        info!(
            "Replaying {} samples ({:.3}s) from {}",
            sample_count,
            duration_seconds,
            path.as_ref().display()
        );

        let sensor = RecordingSensor::new(events);
        let mut engine = GaitEngine::with_config(self.config.clone(), Box::new(sensor));

        let updates = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&updates);
        engine.set_metrics_listener(move |update| sink.borrow_mut().push(update.clone()));

        engine.start();
        if let Some(error) = engine.error() {
            return Err(ReplayError::SessionStart(error.to_string()));
        }

        let processed = engine.pump();
        engine.stop();

        let snapshot = engine.snapshot();
        info!(
            "Replay finished: {} of {} samples processed, {} steps detected",
            processed, sample_count, snapshot.step_count
        );

        // The borrow must end before the return expression drops the cell.
        let collected = updates.borrow().clone();

        Ok(ReplayOutput {
            metadata: Metadata {
                recording_file: path.as_ref().display().to_string(),
                sample_count,
                duration_seconds,
            },
            updates: collected,
            summary: Summary {
                steps: snapshot.step_count,
                recorded_intervals: snapshot.recorded_intervals,
                dropped_samples: snapshot.dropped_samples,
                final_cadence_spm: snapshot.cadence_spm,
                final_symmetry: snapshot.symmetry,
            },
        })
    }
}

fn recording_span_seconds(events: &[RawMotionEvent]) -> f64 {
    match (events.first(), events.last()) {
        (Some(first), Some(last)) => {
            let start = first.timestamp.unwrap_or_default();
            let end = last.timestamp.unwrap_or_default();
            end.saturating_sub(start).as_secs_f64()
        }
        _ => 0.0,
    }
}
