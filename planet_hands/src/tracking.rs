//! Hand tracking — sources of landmarks, and the thread that interprets them.
//!
//! The public interface is [`TrackingEvent`] delivered over a `mpsc`
//! channel held by a [`TrackerHandle`]. The render loop doesn't need to know
//! whether landmarks came from real hardware or the keyboard/mouse
//! simulator, and never blocks on either.
//!
//! Sources are split in two: a [`HandSource`] is a `Send` description of a
//! device that moves onto the tracker thread, and its [`HandSource::start`]
//! opens the live [`HandStream`] there. Device handles that can't cross
//! threads never have to.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use thiserror::Error;

use gesture_orbit::{
    Classification, GestureFrame, GestureInterpreter, HandLandmarks, HandPose, Landmark, SynthHand,
};

// ════════════════════════════════════════════════════════════════════════════
// TrackerConfig
// ════════════════════════════════════════════════════════════════════════════

/// Settings handed to the hand-tracking engine.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackerConfig {
    /// Hands reported per result; only the first is interpreted.
    pub max_hands: usize,
    pub model_complexity: u8,
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
    /// Period between tracking results for sources that pace themselves.
    pub cadence: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            max_hands:                1,
            model_complexity:         1,
            min_detection_confidence: 0.5,
            min_tracking_confidence:  0.5,
            cadence:                  Duration::from_millis(33),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Errors and events
// ════════════════════════════════════════════════════════════════════════════

/// Why a capture source could not start.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    #[error("no capture device: {0}")]
    NoDevice(String),

    #[error("{0}")]
    Failed(String),
}

/// What the tracker thread reports to the render loop.
#[derive(Clone, Debug, PartialEq)]
pub enum TrackingEvent {
    /// Capture is running; gesture frames will follow.
    Started,
    /// One interpreted hand.
    Gesture(GestureFrame),
    /// Capture failed to start; the message is user-facing.
    CaptureFailed(String),
    /// The source closed; no more events.
    Stopped,
}

/// Result of one [`HandStream::poll`].
#[derive(Clone, Debug, PartialEq)]
pub enum SourcePoll {
    /// A tracking result. May be empty when no hand is in view.
    Hands(Vec<HandLandmarks>),
    /// Nothing new within the timeout.
    Idle,
    /// The source is gone.
    Closed,
}

// ════════════════════════════════════════════════════════════════════════════
// HandSource / HandStream — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// A capture device that can be started on the tracker thread.
pub trait HandSource: Send + 'static {
    fn name(&self) -> &'static str;

    /// Start capture. Called once, on the tracker thread.
    fn start(self: Box<Self>, cfg: &TrackerConfig) -> Result<Box<dyn HandStream>, CaptureError>;
}

/// A running capture + tracking pipeline.
pub trait HandStream {
    /// Wait up to `timeout` for the next tracking result.
    fn poll(&mut self, timeout: Duration) -> SourcePoll;
}

// ════════════════════════════════════════════════════════════════════════════
// Tracker thread
// ════════════════════════════════════════════════════════════════════════════

/// Owner of the tracker thread. Dropping it stops and joins the thread, so
/// every exit path from the render loop tears tracking down.
pub struct TrackerHandle {
    rx:     Receiver<TrackingEvent>,
    stop:   Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl TrackerHandle {
    /// Drain pending events without blocking.
    pub fn drain(&self) -> Vec<TrackingEvent> {
        self.rx.try_iter().collect()
    }

    /// Block up to `timeout` for one event. Mostly useful in tests.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TrackingEvent> {
        self.rx.recv_timeout(timeout).ok()
    }

    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(t) = self.thread.take() {
            if t.join().is_err() {
                warn!("[tracker] thread panicked");
            }
        }
        debug!("[tracker] shut down");
    }
}

/// Spawn `source` on its own thread and return the handle holding the
/// receiving end.
pub fn spawn_tracker<S: HandSource>(
    source: S,
    cfg:    TrackerConfig,
    interp: GestureInterpreter,
) -> TrackerHandle {
    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let thread_stop = Arc::clone(&stop);

    let thread = thread::spawn(move || {
        tracker_loop(Box::new(source), &cfg, &interp, &tx, &thread_stop);
    });

    TrackerHandle { rx, stop, thread: Some(thread) }
}

fn tracker_loop(
    source: Box<dyn HandSource>,
    cfg:    &TrackerConfig,
    interp: &GestureInterpreter,
    tx:     &Sender<TrackingEvent>,
    stop:   &AtomicBool,
) {
    let name = source.name();
    info!(
        "[tracker] starting {} (max_hands={}, complexity={}, detect≥{}, track≥{})",
        name, cfg.max_hands, cfg.model_complexity,
        cfg.min_detection_confidence, cfg.min_tracking_confidence,
    );

    let mut stream = match source.start(cfg) {
        Ok(s)  => s,
        Err(e) => {
            warn!("[tracker] {} failed to start: {}", name, e);
            let _ = tx.send(TrackingEvent::CaptureFailed(e.to_string()));
            return;
        }
    };
    if tx.send(TrackingEvent::Started).is_err() { return; }

    let mut last_class: Option<Classification> = None;

    while !stop.load(Ordering::Relaxed) {
        match stream.poll(cfg.cadence) {
            SourcePoll::Hands(hands) => {
                let hands = &hands[..hands.len().min(cfg.max_hands)];
                // Zero hands: nothing to report, targets hold.
                let Some(frame) = interp.on_results(hands) else { continue };

                if last_class != Some(frame.classification) {
                    debug!("[tracker] pose {}", frame.classification.as_str());
                    last_class = Some(frame.classification);
                }
                if tx.send(TrackingEvent::Gesture(frame)).is_err() { return; }
            }
            SourcePoll::Idle   => {}
            SourcePoll::Closed => break,
        }
    }

    info!("[tracker] {} stopped", name);
    let _ = tx.send(TrackingEvent::Stopped);
}

// ════════════════════════════════════════════════════════════════════════════
// SimHandSource — keyboard/mouse simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position, normalized to the window (0,0 top-left).
    Pointer { x: f32, y: f32 },
    /// Change finger posture.
    Pose(HandPose),
    /// Hide or show the hand (hidden = empty tracking results).
    ToggleHand,
}

/// Hand source driven by [`SimInput`] events from the visualizer's window.
///
/// Pointer x rolls the hand (left edge −1.2 rad, right edge +1.2 rad);
/// pointer y moves it nearer (top, large hand) or farther (bottom, small
/// hand). Results are emitted every `cadence`, like a camera-bound tracker.
pub struct SimHandSource {
    rx:         Receiver<SimInput>,
    fail_with:  Option<String>,
}

impl SimHandSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimHandSource { rx, fail_with: None }
    }

    /// A source whose capture refuses to start with `message`.
    pub fn failing(rx: Receiver<SimInput>, message: impl Into<String>) -> Self {
        SimHandSource { rx, fail_with: Some(message.into()) }
    }
}

impl HandSource for SimHandSource {
    fn name(&self) -> &'static str { "simulated hand" }

    fn start(self: Box<Self>, cfg: &TrackerConfig) -> Result<Box<dyn HandStream>, CaptureError> {
        let SimHandSource { rx, fail_with } = *self;
        if let Some(msg) = fail_with {
            return Err(CaptureError::Failed(msg));
        }
        Ok(Box::new(SimHandStream {
            rx,
            hand:      SimHandStream::hand_at(0.5, 0.5, HandPose::Open),
            visible:   true,
            cadence:   cfg.cadence,
            next_emit: Instant::now(),
        }))
    }
}

struct SimHandStream {
    rx:        Receiver<SimInput>,
    hand:      SynthHand,
    visible:   bool,
    cadence:   Duration,
    next_emit: Instant,
}

impl SimHandStream {
    const MAX_ROLL:  f32 = 1.2;
    const NEAR_SIZE: f32 = 0.35;
    const FAR_SIZE:  f32 = 0.05;

    fn hand_at(x: f32, y: f32, pose: HandPose) -> SynthHand {
        let x = x.clamp(0.0, 1.0);
        let y = y.clamp(0.0, 1.0);
        SynthHand {
            wrist: Landmark::new(0.5, 0.75),
            roll:  (x - 0.5) * 2.0 * Self::MAX_ROLL,
            size:  Self::NEAR_SIZE + (Self::FAR_SIZE - Self::NEAR_SIZE) * y,
            pose,
        }
    }

    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y } => {
                self.hand = Self::hand_at(x, y, self.hand.pose);
            }
            SimInput::Pose(pose) => self.hand.pose = pose,
            SimInput::ToggleHand => {
                self.visible = !self.visible;
                info!("[sim] hand {}", if self.visible { "shown" } else { "hidden" });
            }
        }
    }
}

impl HandStream for SimHandStream {
    fn poll(&mut self, timeout: Duration) -> SourcePoll {
        let give_up = Instant::now() + timeout;

        loop {
            while let Ok(input) = self.rx.try_recv() {
                self.apply(input);
            }

            let now = Instant::now();
            if now >= self.next_emit {
                self.next_emit += self.cadence;
                // Don't try to catch up on missed results after a stall.
                if self.next_emit < now { self.next_emit = now + self.cadence; }

                let hands = if self.visible { vec![self.hand.landmarks()] } else { Vec::new() };
                return SourcePoll::Hands(hands);
            }
            if now >= give_up {
                return SourcePoll::Idle;
            }

            match self.rx.recv_timeout(self.next_emit.min(give_up) - now) {
                Ok(input)                           => self.apply(input),
                Err(RecvTimeoutError::Timeout)      => {}
                Err(RecvTimeoutError::Disconnected) => return SourcePoll::Closed,
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapHandSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Hand source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// The controller reports 3D joints in millimetres above the device. They
/// are projected as seen by a camera [`LEAP_VIEW_DIST_MM`] in front of the
/// user, so pulling the hand back shrinks it on "screen" exactly like a
/// webcam would, and laid out in the 21-landmark order.
#[cfg(feature = "leap")]
pub struct LeapHandSource;

/// Distance from the virtual camera to the Leap origin plane.
#[cfg(feature = "leap")]
pub const LEAP_VIEW_DIST_MM: f32 = 500.0;
/// Height above the device that maps to the middle of the frame.
#[cfg(feature = "leap")]
const LEAP_CENTER_Y_MM: f32 = 200.0;

#[cfg(feature = "leap")]
impl HandSource for LeapHandSource {
    fn name(&self) -> &'static str { "LeapMotion" }

    fn start(self: Box<Self>, _cfg: &TrackerConfig) -> Result<Box<dyn HandStream>, CaptureError> {
        use leaprs::{Connection, ConnectionConfig};

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| CaptureError::NoDevice(format!("LeapC connection: {:?}", e)))?;
        connection.open()
            .map_err(|e| CaptureError::Failed(format!("LeapMotion open: {:?}", e)))?;

        Ok(Box::new(LeapHandStream { connection }))
    }
}

#[cfg(feature = "leap")]
struct LeapHandStream {
    connection: leaprs::Connection,
}

#[cfg(feature = "leap")]
impl HandStream for LeapHandStream {
    fn poll(&mut self, timeout: Duration) -> SourcePoll {
        use leaprs::Event;

        let msg = match self.connection.poll(timeout.as_millis() as u32) {
            Ok(m)  => m,
            Err(_) => return SourcePoll::Idle,
        };

        match msg.event() {
            Event::Tracking(frame) => {
                let hands = frame.hands().filter_map(|h| leap_landmarks(&h)).collect();
                SourcePoll::Hands(hands)
            }
            _ => SourcePoll::Idle,
        }
    }
}

#[cfg(feature = "leap")]
fn leap_landmarks(hand: &leaprs::HandRef) -> Option<HandLandmarks> {
    use gesture_orbit::landmarks::*;

    let project = |x: f32, y: f32, z: f32| {
        let k = 1.0 / (LEAP_VIEW_DIST_MM + z).max(1.0);
        Landmark::new(0.5 + x * k, 0.5 - (y - LEAP_CENTER_Y_MM) * k)
    };

    let digits: Vec<_> = hand.digits().collect();
    if digits.len() < 5 { return None; }

    let mut pts = [Landmark::default(); LANDMARK_COUNT];

    let w = digits[2].metacarpal().prev_joint();
    pts[WRIST] = project(w.x, w.y, w.z);

    // Thumb: the Leap metacarpal is zero-length, so start at the proximal bone.
    let t = &digits[0];
    let joints = [
        t.proximal().prev_joint(),
        t.proximal().next_joint(),
        t.intermediate().next_joint(),
        t.distal().next_joint(),
    ];
    for (k, j) in joints.iter().enumerate() {
        pts[THUMB_CMC + k] = project(j.x, j.y, j.z);
    }

    for (d, base) in digits[1..5].iter().zip([INDEX_MCP, MIDDLE_MCP, RING_MCP, PINKY_MCP]) {
        let joints = [
            d.proximal().prev_joint(),
            d.proximal().next_joint(),
            d.intermediate().next_joint(),
            d.distal().next_joint(),
        ];
        for (k, j) in joints.iter().enumerate() {
            pts[base + k] = project(j.x, j.y, j.z);
        }
    }

    Some(HandLandmarks::new(pts))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    const WAIT: Duration = Duration::from_secs(2);

    fn fast_cfg() -> TrackerConfig {
        TrackerConfig { cadence: Duration::from_millis(5), ..TrackerConfig::default() }
    }

    fn next_gesture(handle: &TrackerHandle) -> GestureFrame {
        loop {
            match handle.recv_timeout(WAIT) {
                Some(TrackingEvent::Gesture(g)) => return g,
                Some(_) => continue,
                None    => panic!("no gesture within {:?}", WAIT),
            }
        }
    }

    #[test]
    fn default_config_matches_single_hand_tracker() {
        let cfg = TrackerConfig::default();
        assert_eq!(cfg.max_hands, 1);
        assert_eq!(cfg.model_complexity, 1);
        assert_eq!(cfg.min_detection_confidence, 0.5);
        assert_eq!(cfg.min_tracking_confidence, 0.5);
    }

    #[test]
    fn sim_source_reports_started_then_gestures() {
        let (_tx, rx) = mpsc::channel();
        let handle = spawn_tracker(SimHandSource::new(rx), fast_cfg(), GestureInterpreter::default());
        assert_eq!(handle.recv_timeout(WAIT), Some(TrackingEvent::Started));
        let g = next_gesture(&handle);
        assert_eq!(g.classification, Classification::Open);
    }

    #[test]
    fn pose_input_changes_classification() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_tracker(SimHandSource::new(rx), fast_cfg(), GestureInterpreter::default());
        tx.send(SimInput::Pose(HandPose::Fist)).unwrap();

        let mut saw_fist = false;
        for _ in 0..50 {
            if next_gesture(&handle).classification == Classification::Fist {
                saw_fist = true;
                break;
            }
        }
        assert!(saw_fist);
    }

    #[test]
    fn pointer_moves_roll_and_size() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_tracker(SimHandSource::new(rx), fast_cfg(), GestureInterpreter::default());
        tx.send(SimInput::Pointer { x: 1.0, y: 0.0 }).unwrap();

        for _ in 0..50 {
            let g = next_gesture(&handle);
            if (g.hand_angle - 1.2).abs() < 1e-3 {
                assert!((g.hand_size - 0.35).abs() < 1e-3);
                return;
            }
        }
        panic!("pointer input never reached the tracker");
    }

    #[test]
    fn failing_capture_reports_message_and_stops() {
        let (_tx, rx) = mpsc::channel();
        let handle = spawn_tracker(
            SimHandSource::failing(rx, "Permission denied"),
            fast_cfg(),
            GestureInterpreter::default(),
        );
        assert_eq!(
            handle.recv_timeout(WAIT),
            Some(TrackingEvent::CaptureFailed("Permission denied".into()))
        );
        assert_eq!(handle.recv_timeout(Duration::from_millis(50)), None);
    }

    #[test]
    fn hidden_hand_sends_nothing() {
        let (tx, rx) = mpsc::channel();
        tx.send(SimInput::ToggleHand).unwrap();
        let handle = spawn_tracker(SimHandSource::new(rx), fast_cfg(), GestureInterpreter::default());
        assert_eq!(handle.recv_timeout(WAIT), Some(TrackingEvent::Started));

        // The toggle is consumed before the first emission, so no gestures at all.
        thread::sleep(Duration::from_millis(60));
        assert!(handle.drain().iter().all(|e| !matches!(e, TrackingEvent::Gesture(_))));
    }

    #[test]
    fn closing_input_channel_stops_tracker() {
        let (tx, rx) = mpsc::channel::<SimInput>();
        let handle = spawn_tracker(SimHandSource::new(rx), fast_cfg(), GestureInterpreter::default());
        drop(tx);
        let mut stopped = false;
        for _ in 0..100 {
            if handle.recv_timeout(WAIT) == Some(TrackingEvent::Stopped) {
                stopped = true;
                break;
            }
        }
        assert!(stopped);
    }

    #[test]
    fn dropping_handle_joins_thread() {
        let (tx, rx) = mpsc::channel();
        let handle = spawn_tracker(SimHandSource::new(rx), fast_cfg(), GestureInterpreter::default());
        assert_eq!(handle.recv_timeout(WAIT), Some(TrackingEvent::Started));
        drop(handle);
        // The stream is gone along with the thread, so the input side sees
        // a closed channel.
        assert!(tx.send(SimInput::ToggleHand).is_err());
    }
}
