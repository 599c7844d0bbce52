//! Orbit camera state and the per-frame smoother.

use std::f32::consts::{PI, TAU};

use log::debug;

use crate::interpreter::GestureFrame;
use crate::OrbitConfig;

/// Wrap an angle difference into `(−π, π]`.
///
/// Equivalent to adding or subtracting 2π until the value lands in range,
/// without looping for large inputs.
pub fn wrap_angle(a: f32) -> f32 {
    PI - (PI - a).rem_euclid(TAU)
}

/// Spherical → Cartesian with Y up: `theta` is the azimuth measured from +Z
/// toward +X, `phi` the polar angle from +Y.
pub fn spherical_to_cartesian(r: f32, theta: f32, phi: f32) -> [f32; 3] {
    [
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
        r * phi.sin() * theta.cos(),
    ]
}

// ════════════════════════════════════════════════════════════════════════════
// CameraState
// ════════════════════════════════════════════════════════════════════════════

/// Orbit camera: where it is now, and where gestures want it.
///
/// Targets change only through [`apply_gesture`](Self::apply_gesture);
/// current values change only through [`advance`](Self::advance).
#[derive(Clone, Debug, PartialEq)]
pub struct CameraState {
    current_radius: f32,
    current_theta:  f32,
    target_radius:  f32,
    target_theta:   f32,
    cfg:            OrbitConfig,
}

impl CameraState {
    /// Camera at rest at `cfg.initial_radius` (clamped into the orbit
    /// limits), azimuth 0, with targets equal to the current values.
    pub fn new(cfg: OrbitConfig) -> Self {
        let r = cfg.initial_radius.clamp(cfg.min_radius, cfg.max_radius);
        CameraState {
            current_radius: r,
            current_theta:  0.0,
            target_radius:  r,
            target_theta:   0.0,
            cfg,
        }
    }

    pub fn current_radius(&self) -> f32 { self.current_radius }
    pub fn current_theta(&self)  -> f32 { self.current_theta }
    pub fn target_radius(&self)  -> f32 { self.target_radius }
    pub fn target_theta(&self)   -> f32 { self.target_theta }
    pub fn config(&self)         -> &OrbitConfig { &self.cfg }

    /// Fold one interpreted gesture into the targets.
    ///
    /// The orbit angle always follows the hand. The radius follows only a
    /// decisive pose; an ambiguous pose keeps the last radius target.
    /// Returns true if the radius target was updated.
    pub fn apply_gesture(&mut self, frame: &GestureFrame) -> bool {
        self.target_theta = frame.target_theta(&self.cfg);

        if frame.classification.is_decisive() {
            self.target_radius = frame.target_radius(&self.cfg);
            true
        } else {
            false
        }
    }

    /// Ease the current values toward the targets over `delta` seconds.
    ///
    /// First-order approach: each value closes `rate·delta` of its gap,
    /// capped at the whole gap so long frames land on the target instead of
    /// overshooting. The angle takes the short way round.
    pub fn advance(&mut self, delta: f32) {
        if !(delta.is_finite() && delta > 0.0) {
            return;
        }

        let kr = (self.cfg.radius_rate * delta).min(1.0);
        self.current_radius += (self.target_radius - self.current_radius) * kr;
        self.current_radius = self.current_radius.clamp(self.cfg.min_radius, self.cfg.max_radius);

        let kt = (self.cfg.theta_rate * delta).min(1.0);
        let diff = wrap_angle(self.target_theta - self.current_theta);
        self.current_theta += diff * kt;

        if delta >= 0.25 {
            debug!("long frame: delta={:.3}s r={:.2} theta={:.3}", delta, self.current_radius, self.current_theta);
        }
    }

    /// Camera position for the current radius and azimuth.
    pub fn eye(&self) -> [f32; 3] {
        spherical_to_cartesian(self.current_radius, self.current_theta, self.cfg.camera_phi)
    }
}

impl Default for CameraState {
    fn default() -> Self {
        CameraState::new(OrbitConfig::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
