use std::time::Duration;

use log::{debug, info, warn};
use nalgebra::Vector3;
use stride_core::contracts::{MetricsUpdate, SessionPhase, SessionSnapshot};
use stride_core::metrics::{GaitMetrics, MIN_INTERVALS};
use stride_core::signal::{LowPassFilter, MagnitudeWindow, DEFAULT_ALPHA, DEFAULT_WINDOW_CAPACITY};
use stride_core::step::{
    IntervalTracker, StepConfig, StepDetector, StepOutcome, DEFAULT_INTERVAL_CAPACITY,
};
use stride_providers::{AccelSample, AccessDecision, Availability, MotionSensor};
use thiserror::Error;

/// Pipeline constants grouped into a configuration structure.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Capacity of the rolling magnitude window.
    pub window_capacity: usize,
    /// Sampling rate requested from the sensor in Hz. Informational; the
    /// pipeline consumes whatever rate the host actually delivers.
    pub sample_rate_hz: u32,
    /// Gates the whole pipeline; when false, delivered samples are ignored.
    pub enabled: bool,
    /// Smoothing coefficient of the low-pass stage, in (0, 1].
    pub filter_alpha: f64,
    /// Peak and spacing gates of the step detector.
    pub step: StepConfig,
    /// Capacity of the inter-step interval history.
    pub interval_capacity: usize,
    /// Recompute metrics after every this many accepted intervals.
    pub metrics_every: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            window_capacity: DEFAULT_WINDOW_CAPACITY,
            sample_rate_hz: 60,
            enabled: true,
            filter_alpha: DEFAULT_ALPHA,
            step: StepConfig::default(),
            interval_capacity: DEFAULT_INTERVAL_CAPACITY,
            metrics_every: 4,
        }
    }
}

/// Session faults surfaced through the [`GaitEngine::error`] getter; they are
/// never thrown across the embedding boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no motion sensor available: {0}")]
    SensorUnavailable(String),
    #[error("motion sensor access denied: {0}")]
    PermissionDenied(String),
    #[error("motion sensor fault: {0}")]
    Sensor(String),
}

type MetricsListener = Box<dyn FnMut(&MetricsUpdate)>;

/// Orchestrates one gait-tracking session over an injected motion sensor.
///
/// The engine owns the full pipeline: low-pass conditioning, the rolling
/// magnitude window, three-point step detection, the bounded interval
/// history, and periodic metric recomputation. `start` and `stop` are
/// no-ops when the session is already in the requested phase, so an
/// embedding can wire them to UI events without guarding. Failures park the
/// session instead of propagating; callers poll `error` or read `snapshot`.
pub struct GaitEngine {
    config: SessionConfig,
    sensor: Box<dyn MotionSensor>,
    phase: SessionPhase,
    filter: LowPassFilter,
    window: MagnitudeWindow,
    detector: StepDetector,
    intervals: IntervalTracker,
    metrics: GaitMetrics,
    step_count: u64,
    session_origin: Option<Duration>,
    error: Option<SessionError>,
    listener: Option<MetricsListener>,
}

impl GaitEngine {
    /// Constructs an engine with default configuration over the given sensor.
    pub fn new(sensor: Box<dyn MotionSensor>) -> Self {
        Self::with_config(SessionConfig::default(), sensor)
    }

    /// Constructs an engine with a custom configuration.
    pub fn with_config(config: SessionConfig, sensor: Box<dyn MotionSensor>) -> Self {
        assert!(config.metrics_every > 0);
        assert!(config.interval_capacity >= MIN_INTERVALS);

        let filter = LowPassFilter::new(config.filter_alpha);
        let window = MagnitudeWindow::new(config.window_capacity);
        let detector = StepDetector::new(config.step.clone());
        let intervals = IntervalTracker::new(config.interval_capacity);

        Self {
            config,
            sensor,
            phase: SessionPhase::Idle,
            filter,
            window,
            detector,
            intervals,
            metrics: GaitMetrics::default(),
            step_count: 0,
            session_origin: None,
            error: None,
            listener: None,
        }
    }

    /// Registers the callback invoked on every metrics recomputation.
    pub fn set_metrics_listener(&mut self, listener: impl FnMut(&MetricsUpdate) + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Starts a tracking session: probes the sensor, requests access,
    /// activates delivery, and clears per-session pipeline state.
    ///
    /// Calling `start` while already running is a no-op that preserves all
    /// collected state. Acquisition failures leave the session idle with the
    /// failure readable through [`error`](Self::error).
    pub fn start(&mut self) {
        if self.phase == SessionPhase::Running {
            debug!("start() while running ignored");
            return;
        }

        match self.sensor.availability() {
            Availability::Available => {}
            Availability::Unavailable(reason) => {
                warn!("Cannot start session, sensor unavailable: {reason}");
                self.error = Some(SessionError::SensorUnavailable(reason));
                return;
            }
        }

        match self.sensor.request_access() {
            AccessDecision::Granted => {}
            AccessDecision::Denied(reason) => {
                warn!("Cannot start session, access denied: {reason}");
                self.error = Some(SessionError::PermissionDenied(reason));
                return;
            }
        }

        if let Err(fault) = self.sensor.activate() {
            warn!("Cannot start session, activation failed: {fault}");
            self.error = Some(SessionError::Sensor(fault.to_string()));
            return;
        }

        self.reset_session_state();
        self.phase = SessionPhase::Running;
        info!(
            "Tracking session started ({} Hz requested, {} source)",
            self.config.sample_rate_hz,
            self.sensor.name()
        );
    }

    /// Stops the session and deactivates the sensor. Collected metrics stay
    /// readable until the next `start`. Calling `stop` while idle is a no-op.
    pub fn stop(&mut self) {
        if self.phase == SessionPhase::Idle {
            debug!("stop() while idle ignored");
            return;
        }

        self.sensor.deactivate();
        self.phase = SessionPhase::Idle;
        info!(
            "Tracking session stopped: {} steps, {} intervals accepted",
            self.step_count,
            self.intervals.recorded()
        );
    }

    /// Drains pending sensor samples and faults through the pipeline and
    /// returns the number of samples processed. Does nothing while idle.
    pub fn pump(&mut self) -> usize {
        if self.phase != SessionPhase::Running {
            return 0;
        }

        while let Some(fault) = self.sensor.take_fault() {
            warn!("Sensor fault while running: {fault}");
            self.error = Some(SessionError::Sensor(fault.to_string()));
        }

        let mut processed = 0;
        while let Some(sample) = self.sensor.next_sample() {
            if self.process_sample(&sample) {
                processed += 1;
            }
        }
        processed
    }

    /// Delivers one sample directly, for embeddings that forward readings
    /// from their own sensor callback. Returns whether the sample entered
    /// the pipeline; samples are ignored while idle or disabled.
    pub fn ingest_sample(&mut self, sample: &AccelSample) -> bool {
        self.process_sample(sample)
    }

    /// Convenience for embeddings that deliver bare components.
    pub fn ingest_reading(&mut self, timestamp: Duration, x: f64, y: f64, z: f64) -> bool {
        self.ingest_sample(&AccelSample {
            timestamp,
            acceleration: Vector3::new(x, y, z),
        })
    }

    fn process_sample(&mut self, sample: &AccelSample) -> bool {
        if self.phase != SessionPhase::Running || !self.config.enabled {
            return false;
        }

        if self.filter.apply(sample.acceleration).is_none() {
            // Non-finite sample; the filter counted the drop.
            return false;
        }

        if self.session_origin.is_none() {
            self.session_origin = Some(sample.timestamp);
        }

        self.window.push(self.filter.magnitude());

        let Some((prev2, prev, curr)) = self.window.last_three() else {
            return true;
        };

        match self.detector.evaluate(prev2, prev, curr, sample.timestamp) {
            StepOutcome::None | StepOutcome::Rejected { .. } => {}
            StepOutcome::First { .. } => {
                self.step_count += 1;
            }
            StepOutcome::Accepted { at, interval } => {
                self.step_count += 1;
                self.intervals.record(interval);
                if self.intervals.recorded() % self.config.metrics_every == 0 {
                    self.recompute_metrics(at);
                }
            }
        }
        true
    }

    fn recompute_metrics(&mut self, at: Duration) {
        let snapshot = self.intervals.snapshot();
        if snapshot.len() < MIN_INTERVALS {
            return;
        }

        let origin = self.session_origin.unwrap_or(at);
        let elapsed = at.saturating_sub(origin);
        self.metrics = GaitMetrics::from_intervals(&snapshot, self.intervals.recorded(), elapsed);
        debug!(
            "Metrics recomputed at {:.2}s: cadence={} spm, symmetry={}",
            at.as_secs_f64(),
            self.metrics.cadence_spm,
            self.metrics.symmetry
        );

        if let Some(listener) = self.listener.as_mut() {
            let update = MetricsUpdate {
                symmetry: self.metrics.symmetry,
                cadence_spm: self.metrics.cadence_spm,
                step_intervals_ms: snapshot
                    .iter()
                    .map(|interval| interval.as_millis() as u64)
                    .collect(),
                timestamp_ms: at.as_millis() as u64,
            };
            listener(&update);
        }
    }

    fn reset_session_state(&mut self) {
        self.filter.reset();
        self.window.clear();
        self.detector.reset();
        self.intervals.clear();
        self.metrics = GaitMetrics::default();
        self.step_count = 0;
        self.session_origin = None;
        self.error = None;
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Whether the injected sensor reports itself usable on this host.
    pub fn is_available(&self) -> bool {
        self.sensor.availability().is_available()
    }

    /// Most recent session fault, if any.
    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    /// Steps detected this session, the first step included.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn cadence_spm(&self) -> u32 {
        self.metrics.cadence_spm
    }

    pub fn symmetry(&self) -> u8 {
        self.metrics.symmetry
    }

    pub fn metrics(&self) -> GaitMetrics {
        self.metrics
    }

    /// Total intervals accepted this session, buffer eviction included.
    pub fn recorded_intervals(&self) -> u64 {
        self.intervals.recorded()
    }

    /// Samples dropped for carrying non-finite components.
    pub fn dropped_samples(&self) -> u64 {
        self.filter.rejected_count()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Serializable mirror of the current session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            step_count: self.step_count,
            symmetry: self.metrics.symmetry,
            cadence_spm: self.metrics.cadence_spm,
            recorded_intervals: self.intervals.recorded(),
            dropped_samples: self.filter.rejected_count(),
            error: self.error.as_ref().map(|error| error.to_string()),
        }
    }
}
