//! # gesture_orbit
//!
//! Turns one hand's worth of normalized landmarks into camera targets, and
//! eases an orbiting camera toward those targets each frame.
//!
//! ## Gesture → Camera mapping
//!
//! | Hand | Camera |
//! |---|---|
//! | Roll (wrist → middle knuckle direction) | Orbit angle, ×−2 |
//! | Apparent size (wrist → middle knuckle length) | Orbit radius, `4 / size` clamped to 8–100 |
//! | Open palm or fist | Radius target follows the hand |
//! | Half-curled (ambiguous) | Radius target frozen |
//! | No hand in frame | Nothing changes; camera keeps easing |
//!
//! ## Pipeline
//!
//! ```text
//!  HandLandmarks ──interpret──▶ GestureFrame ──apply_gesture──▶ CameraState.target_*
//!                                                                   │
//!                                   frame delta ──advance──▶ CameraState.current_* ──▶ eye()
//! ```
//!
//! [`CameraState`] keeps one writer per field: [`CameraState::apply_gesture`]
//! is the only path to the targets, [`CameraState::advance`] the only path
//! to the current values.

use std::f32::consts::FRAC_PI_2;

pub mod landmarks;
pub mod interpreter;
pub mod camera;
pub mod synth;

pub use landmarks::{HandLandmarks, Landmark, LandmarkError, LANDMARK_COUNT};
pub use interpreter::{Classification, GestureFrame, GestureInterpreter};
pub use camera::{spherical_to_cartesian, wrap_angle, CameraState};
pub use synth::{HandPose, SynthHand};

// ════════════════════════════════════════════════════════════════════════════
// OrbitConfig
// ════════════════════════════════════════════════════════════════════════════

/// Tuning shared by the interpreter and the smoother.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitConfig {
    /// Closest the camera may get to the origin.
    pub min_radius: f32,
    /// Farthest the camera may get from the origin.
    pub max_radius: f32,
    /// Radius target is `radius_scale / hand_size`.
    pub radius_scale: f32,
    /// Hand size is clamped into `hand_size_min ..= hand_size_max` before
    /// the division above.
    pub hand_size_min: f32,
    pub hand_size_max: f32,
    /// Orbit angle target is `theta_gain · hand_angle`.
    pub theta_gain: f32,
    /// Average fingertip reach above `open_ratio · hand_size` reads as open.
    pub open_ratio: f32,
    /// Average fingertip reach below `fist_ratio · hand_size` reads as a fist.
    pub fist_ratio: f32,
    /// Radius easing rate, per second.
    pub radius_rate: f32,
    /// Angle easing rate, per second.
    pub theta_rate: f32,
    /// Radius before any gesture arrives.
    pub initial_radius: f32,
    /// Fixed polar angle of the camera (π/2 = level with the equator).
    pub camera_phi: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        OrbitConfig {
            min_radius:     8.0,
            max_radius:     100.0,
            radius_scale:   4.0,
            hand_size_min:  0.05,
            hand_size_max:  0.8,
            theta_gain:     -2.0,
            open_ratio:     1.5,
            fist_ratio:     1.0,
            radius_rate:    2.0,
            theta_rate:     5.0,
            initial_radius: 30.0,
            camera_phi:     FRAC_PI_2,
        }
    }
}
