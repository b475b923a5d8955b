use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use nalgebra::Vector3;
use stride_core::contracts::{MetricsUpdate, SessionPhase};
use stride_core::metrics::GaitMetrics;
use stride_core::time::Clock;
use stride_engine::GaitEngine;
use stride_providers::{AccelSample, HostMotionSensor, MotionSensor, RawMotionEvent};

const SAMPLE_PERIOD_MS: u64 = 20;
const BASELINE_Z: f64 = 9.81;
const IMPACT_Z: f64 = 22.0;

#[derive(Clone)]
struct DeterministicClock {
    now: Duration,
    step: Duration,
}

impl Default for DeterministicClock {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            step: Duration::from_millis(SAMPLE_PERIOD_MS),
        }
    }
}

impl Clock for DeterministicClock {
    fn now(&mut self) -> Duration {
        self.now = self.now.saturating_add(self.step);
        self.now
    }
}

/// Builds a 50 Hz accelerometer stream: resting gravity with a one-sample
/// impact burst at each index in `spikes`. After low-pass smoothing each
/// burst leaves a clean local maximum one sample later.
fn walk(total: usize, spikes: &[usize]) -> Vec<AccelSample> {
    (0..total)
        .map(|i| {
            let z = if spikes.contains(&i) {
                IMPACT_Z
            } else {
                BASELINE_Z
            };
            AccelSample {
                timestamp: Duration::from_millis(SAMPLE_PERIOD_MS * i as u64),
                acceleration: Vector3::new(0.0, 0.0, z),
            }
        })
        .collect()
}

/// Spike indices for steps separated by the given gaps (in samples),
/// starting at `first`.
fn spikes_with_gaps(first: usize, gaps: &[usize]) -> Vec<usize> {
    let mut indices = vec![first];
    for gap in gaps {
        indices.push(indices.last().unwrap() + gap);
    }
    indices
}

fn running_engine() -> (GaitEngine, Rc<RefCell<Vec<MetricsUpdate>>>) {
    let mut engine = GaitEngine::new(Box::new(HostMotionSensor::new()));
    let updates = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&updates);
    engine.set_metrics_listener(move |update| sink.borrow_mut().push(update.clone()));
    engine.start();
    assert!(engine.is_running());
    (engine, updates)
}

#[test]
fn steady_walk_yields_even_metrics() {
    let (mut engine, updates) = running_engine();

    // 10 steps exactly 600 ms apart; detections land at 220 ms + k * 600 ms.
    let spikes = spikes_with_gaps(10, &[30; 9]);
    for sample in walk(320, &spikes) {
        engine.ingest_sample(&sample);
    }

    assert_eq!(engine.step_count(), 10);
    assert_eq!(engine.recorded_intervals(), 9);

    let updates = updates.borrow();
    assert_eq!(updates.len(), 2);

    // Cadence divides the accepted count by time since the first sample,
    // not by the span of the intervals, so the pre-walk warm-up keeps it
    // slightly under the 100 spm that 600 ms spacing would suggest.
    assert_eq!(updates[0].timestamp_ms, 2620);
    assert_eq!(updates[0].cadence_spm, 92);
    assert_eq!(updates[0].symmetry, 100);
    assert_eq!(updates[0].step_intervals_ms, vec![600, 600, 600, 600]);

    assert_eq!(updates[1].timestamp_ms, 5020);
    assert_eq!(updates[1].cadence_spm, 96);
    assert_eq!(updates[1].symmetry, 100);
    assert!(updates[1].step_intervals_ms.iter().all(|&ms| ms == 600));

    assert_eq!(engine.cadence_spm(), 96);
    assert_eq!(engine.symmetry(), 100);
    assert_eq!(
        engine.metrics(),
        GaitMetrics {
            cadence_spm: 96,
            symmetry: 100
        }
    );
}

#[test]
fn alternating_intervals_depress_symmetry() {
    let (mut engine, updates) = running_engine();

    // 10 steps alternating 500 ms and 700 ms spacing.
    let spikes = spikes_with_gaps(10, &[25, 35, 25, 35, 25, 35, 25, 35, 25]);
    for sample in walk(300, &spikes) {
        engine.ingest_sample(&sample);
    }

    assert_eq!(engine.step_count(), 10);
    assert_eq!(engine.recorded_intervals(), 9);

    let updates = updates.borrow();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].step_intervals_ms, vec![500, 700, 500, 700]);

    // mean 600 ms, stddev 100 ms: a ~17% coefficient of variation.
    assert_eq!(updates[0].symmetry, 83);
    assert!(updates[0].symmetry < 90);
    assert_eq!(updates[1].symmetry, 83);
    assert_eq!(engine.symmetry(), 83);
}

#[test]
fn samples_after_stop_leave_metrics_untouched() {
    let (mut engine, updates) = running_engine();
    let spikes = spikes_with_gaps(10, &[30; 9]);
    let stream = walk(320, &spikes);

    for sample in &stream[..160] {
        engine.ingest_sample(sample);
    }
    engine.stop();
    assert_eq!(engine.phase(), SessionPhase::Idle);

    let frozen = engine.snapshot();
    assert_eq!(frozen.step_count, 5);
    assert_eq!(frozen.cadence_spm, 92);
    assert_eq!(frozen.symmetry, 100);
    let frozen_updates = updates.borrow().len();

    for sample in &stream[160..] {
        assert!(!engine.ingest_sample(sample));
    }

    assert_eq!(engine.snapshot(), frozen);
    assert_eq!(updates.borrow().len(), frozen_updates);
}

#[test]
fn second_start_while_running_preserves_session_state() {
    let (mut engine, updates) = running_engine();
    let spikes = spikes_with_gaps(10, &[30; 9]);
    let stream = walk(320, &spikes);

    for sample in &stream[..160] {
        engine.ingest_sample(sample);
    }
    let mid_steps = engine.step_count();
    assert_eq!(mid_steps, 5);

    engine.start();
    assert_eq!(engine.step_count(), mid_steps);

    for sample in &stream[160..] {
        engine.ingest_sample(sample);
    }

    // A reset on the second start() would have lost the first half.
    assert_eq!(engine.step_count(), 10);
    assert_eq!(engine.recorded_intervals(), 9);
    assert_eq!(updates.borrow().len(), 2);
}

#[test]
fn implausibly_fast_peaks_record_no_intervals() {
    let (mut engine, updates) = running_engine();

    // Each step followed 100 ms later by a bounce peak; pairs 500 ms apart.
    let spikes = spikes_with_gaps(10, &[5, 25, 5, 25, 5, 25, 5]);
    for sample in walk(200, &spikes) {
        engine.ingest_sample(&sample);
    }

    // Bounces are rejected: they neither count as steps nor record
    // intervals, but each one re-anchors the spacing measurement.
    assert_eq!(engine.step_count(), 4);
    assert_eq!(engine.recorded_intervals(), 3);
    assert!(updates.borrow().is_empty());
    assert_eq!(engine.cadence_spm(), 0);
    assert_eq!(engine.symmetry(), 100);
}

#[test]
fn long_pause_restarts_interval_tracking_on_the_second_step() {
    let (mut engine, updates) = running_engine();

    // 3 steps, a 5 s standstill, then 3 more steps.
    let mut spikes = spikes_with_gaps(10, &[30, 30]);
    let resume = spikes.last().unwrap() + 250;
    spikes.extend(spikes_with_gaps(resume, &[30, 30]));
    for sample in walk(400, &spikes) {
        engine.ingest_sample(&sample);
    }

    // 6 peaks: first step, 2 accepted, the post-pause peak rejected as a
    // 5000 ms interval, then 2 accepted again.
    assert_eq!(engine.step_count(), 5);
    assert_eq!(engine.recorded_intervals(), 4);

    let updates = updates.borrow();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].step_intervals_ms, vec![600, 600, 600, 600]);
    assert_eq!(updates[0].symmetry, 100);
    // The pause still counts toward elapsed time, dragging cadence down.
    assert_eq!(updates[0].cadence_spm, 31);
}

#[test]
fn metrics_fire_only_on_every_fourth_interval() {
    let (mut engine, updates) = running_engine();

    // 13 accepted intervals: updates at counts 4, 8 and 12 only.
    let spikes = spikes_with_gaps(10, &[30; 13]);
    for sample in walk(450, &spikes) {
        engine.ingest_sample(&sample);
    }

    assert_eq!(engine.recorded_intervals(), 13);
    let updates = updates.borrow();
    assert_eq!(updates.len(), 3);
    assert_eq!(updates[0].step_intervals_ms.len(), 4);
    assert_eq!(updates[1].step_intervals_ms.len(), 8);
    assert_eq!(updates[2].step_intervals_ms.len(), 12);
}

#[test]
fn interval_history_caps_while_the_count_keeps_growing() {
    let (mut engine, updates) = running_engine();

    let spikes = spikes_with_gaps(10, &[30; 25]);
    for sample in walk(800, &spikes) {
        engine.ingest_sample(&sample);
    }

    assert_eq!(engine.step_count(), 26);
    assert_eq!(engine.recorded_intervals(), 25);

    let updates = updates.borrow();
    assert_eq!(updates.len(), 6);
    // The sixth update fires at 24 accepted intervals with only the newest
    // 20 still buffered; cadence still reflects all 24.
    assert_eq!(updates[5].step_intervals_ms.len(), 20);
    assert_eq!(updates[5].cadence_spm, 98);
    assert_eq!(updates[5].symmetry, 100);
}

#[test]
fn pump_path_replays_a_clock_stamped_walk() {
    // Readings arrive unstamped; the deterministic provider clock assigns
    // 20 ms ticks, so sample i lands at (i + 1) * 20 ms.
    let mut sensor = HostMotionSensor::with_clock(DeterministicClock::default());
    sensor.activate().unwrap();

    let spikes = spikes_with_gaps(10, &[30; 9]);
    for i in 0..320 {
        let z = if spikes.contains(&i) {
            IMPACT_Z
        } else {
            BASELINE_Z
        };
        sensor.push_reading(RawMotionEvent {
            timestamp: None,
            x: 0.0,
            y: 0.0,
            z,
        });
    }

    let mut engine = GaitEngine::new(Box::new(sensor));
    let updates = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&updates);
    engine.set_metrics_listener(move |update| sink.borrow_mut().push(update.clone()));

    // start() finds the sensor already active and keeps its queue.
    engine.start();
    assert!(engine.is_running());
    assert_eq!(engine.pump(), 320);

    // The uniform 20 ms shift cancels out of every interval and out of the
    // elapsed time, so metrics match the directly-stamped walk.
    assert_eq!(engine.step_count(), 10);
    assert_eq!(engine.recorded_intervals(), 9);

    let updates = updates.borrow();
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].cadence_spm, 92);
    assert_eq!(updates[1].cadence_spm, 96);
    assert!(updates.iter().all(|update| update.symmetry == 100));
    assert!(updates[1].step_intervals_ms.iter().all(|&ms| ms == 600));
}

#[test]
fn sensor_fault_mid_session_degrades_without_stopping() {
    let mut sensor = HostMotionSensor::new();
    sensor.activate().unwrap();
    for sample in walk(160, &spikes_with_gaps(10, &[30; 4])) {
        sensor.push_reading(RawMotionEvent {
            timestamp: Some(sample.timestamp),
            x: sample.acceleration.x,
            y: sample.acceleration.y,
            z: sample.acceleration.z,
        });
    }
    sensor.push_fault("accelerometer dropout");

    let mut engine = GaitEngine::new(Box::new(sensor));
    engine.start();
    assert!(engine.is_running());
    assert_eq!(engine.pump(), 160);

    // The fault is surfaced without tearing the session down, and the
    // buffered samples are still consumed.
    assert!(engine.is_running());
    assert_eq!(engine.step_count(), 5);
    assert_eq!(engine.recorded_intervals(), 4);
    assert_eq!(
        engine.snapshot().error.as_deref(),
        Some("motion sensor fault: accelerometer dropout")
    );
}

#[test]
fn concurrent_sessions_stay_isolated() {
    let (mut walker, walker_updates) = running_engine();
    let (mut idler, idler_updates) = running_engine();

    let spikes = spikes_with_gaps(10, &[30; 9]);
    let stream = walk(320, &spikes);
    let still = walk(320, &[]);

    for (moving, resting) in stream.iter().zip(still.iter()) {
        walker.ingest_sample(moving);
        idler.ingest_sample(resting);
    }

    assert_eq!(walker.step_count(), 10);
    assert_eq!(walker_updates.borrow().len(), 2);
    assert_eq!(idler.step_count(), 0);
    assert!(idler_updates.borrow().is_empty());
    assert_eq!(idler.symmetry(), 100);
    assert_eq!(idler.cadence_spm(), 0);
}
