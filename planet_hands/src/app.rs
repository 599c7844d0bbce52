//! Top-level application state machine.
//!
//! `AppState` owns the `Scene` and the `CameraState` and tracks the status
//! line. It folds `TrackingEvent`s into the camera targets and steps the
//! animation once per frame; `run` wires it to the window and the tracker.

use std::fmt;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;

use gesture_orbit::{CameraState, GestureInterpreter, OrbitConfig};

use crate::scene::{Scene, SceneConfig};
use crate::tracking::{spawn_tracker, SimHandSource, SimInput, TrackerConfig, TrackingEvent};
use crate::visualizer::{Visualizer, DEFAULT_H, DEFAULT_W};

/// Longest frame the animation will integrate in one step.
pub const MAX_FRAME_DELTA: f32 = 0.1;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig / AppError
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub scene:   SceneConfig,
    pub orbit:   OrbitConfig,
    pub tracker: TrackerConfig,
    pub width:   usize,
    pub height:  usize,
    /// Make the simulated capture refuse to start with this message.
    pub capture_error: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            scene:         SceneConfig::default(),
            orbit:         OrbitConfig::default(),
            tracker:       TrackerConfig::default(),
            width:         DEFAULT_W,
            height:        DEFAULT_H,
            capture_error: None,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.width < 64 || self.height < 64 {
            return Err(AppError::Config(format!(
                "window must be at least 64×64, got {}×{}", self.width, self.height
            )));
        }
        let o = &self.orbit;
        if !(o.min_radius > 0.0 && o.min_radius <= o.max_radius) {
            return Err(AppError::Config(format!(
                "orbit limits out of order: min {} max {}", o.min_radius, o.max_radius
            )));
        }
        if self.tracker.cadence.is_zero() {
            return Err(AppError::Config("tracker cadence must be positive".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("window: {0}")]
    Window(String),

    #[error("config: {0}")]
    Config(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Status
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Initializing,
    TrackingActive,
    CameraError(String),
}

impl Status {
    pub fn is_error(&self) -> bool {
        matches!(self, Status::CameraError(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Initializing     => f.write_str("Initializing…"),
            Status::TrackingActive   => f.write_str("Tracking Active"),
            Status::CameraError(msg) => write!(f, "Camera Error: {}", msg),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FrameClock
// ════════════════════════════════════════════════════════════════════════════

/// Monotonic frame timer.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        FrameClock { last: Instant::now() }
    }

    /// Seconds since the previous call, clamped to [`MAX_FRAME_DELTA`].
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = clamp_delta(now.duration_since(self.last));
        self.last = now;
        dt
    }
}

pub fn clamp_delta(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32().min(MAX_FRAME_DELTA)
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    scene:  Scene,
    camera: CameraState,
    status: Status,
}

impl AppState {
    pub fn new(cfg: &AppConfig) -> Self {
        let scene = Scene::build(&cfg.scene);
        info!(
            "[app] scene ready: {} planet + {} ring particles (seed {})",
            scene.planet.particles.len(), scene.rings.particles.len(), cfg.scene.seed,
        );
        AppState {
            scene,
            camera: CameraState::new(cfg.orbit),
            status: Status::Initializing,
        }
    }

    // ── process one TrackingEvent ────────────────────────────────────────

    pub fn handle_event(&mut self, event: TrackingEvent) {
        match event {
            TrackingEvent::Started => {
                info!("[app] tracking active");
                self.status = Status::TrackingActive;
            }
            TrackingEvent::CaptureFailed(msg) => {
                warn!("[app] camera error: {}", msg);
                self.status = Status::CameraError(msg);
            }
            TrackingEvent::Gesture(frame) => {
                self.camera.apply_gesture(&frame);
            }
            TrackingEvent::Stopped => {
                info!("[app] tracker stopped; targets hold");
            }
        }
    }

    // ── Per-frame tick ───────────────────────────────────────────────────

    /// Spin the scene and ease the camera toward its targets.
    pub fn tick(&mut self, delta: f32) {
        self.scene.tick(delta);
        self.camera.advance(delta);
    }

    // ── Accessors for the render loop ────────────────────────────────────

    pub fn scene(&self)  -> &Scene       { &self.scene }
    pub fn camera(&self) -> &CameraState { &self.camera }
    pub fn status(&self) -> &Status      { &self.status }
    pub fn eye(&self)    -> [f32; 3]     { self.camera.eye() }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Opens the window, starts the hand tracker (simulation by default,
/// hardware with `--features leap`) and drives the event/render loop until
/// the window closes. The tracker thread is stopped and joined on every
/// return path when its handle drops.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    cfg.validate()?;

    // ── Sim input channel ────────────────────────────────────────────────
    let (sim_tx, sim_rx) = mpsc::channel::<SimInput>();

    // ── Visualizer (owns the window and the sim input sender) ────────────
    let mut vis = Visualizer::new(cfg.width, cfg.height, sim_tx).map_err(AppError::Window)?;

    // ── App state ────────────────────────────────────────────────────────
    let mut app = AppState::new(&cfg);

    // ── Tracker ──────────────────────────────────────────────────────────
    let interp = GestureInterpreter::new(cfg.orbit);
    let tracker = start_tracker(&cfg, sim_rx, interp);

    // ── Main loop ────────────────────────────────────────────────────────
    let mut clock = FrameClock::start();
    let mut frames: u64 = 0;

    while vis.is_open() {
        if !vis.poll_input() { break; }

        for event in tracker.drain() {
            app.handle_event(event);
        }

        app.tick(clock.tick());

        let status = app.status().to_string();
        vis.render(app.scene(), app.eye(), &status, app.status().is_error());
        frames += 1;
    }

    debug!("[app] {} frames rendered", frames);
    info!("[app] window closed");
    Ok(())
}

#[cfg(not(feature = "leap"))]
fn start_tracker(
    cfg:    &AppConfig,
    sim_rx: mpsc::Receiver<SimInput>,
    interp: GestureInterpreter,
) -> crate::tracking::TrackerHandle {
    let source = match &cfg.capture_error {
        Some(msg) => SimHandSource::failing(sim_rx, msg.clone()),
        None      => SimHandSource::new(sim_rx),
    };
    spawn_tracker(source, cfg.tracker.clone(), interp)
}

#[cfg(feature = "leap")]
fn start_tracker(
    cfg:    &AppConfig,
    sim_rx: mpsc::Receiver<SimInput>,
    interp: GestureInterpreter,
) -> crate::tracking::TrackerHandle {
    use crate::tracking::LeapHandSource;

    if let Some(msg) = &cfg.capture_error {
        return spawn_tracker(SimHandSource::failing(sim_rx, msg.clone()), cfg.tracker.clone(), interp);
    }
    spawn_tracker(LeapHandSource, cfg.tracker.clone(), interp)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
