//! Gesture interpretation — one hand's landmarks in, camera targets out.
//!
//! # Algorithm
//!
//! * **Roll**: direction from the wrist (0) to the middle knuckle (9),
//!   `atan2(dy, dx) + π/2`, so a hand with fingers pointing straight up
//!   reads as 0. The orbit target is `theta_gain · roll` (×−2 by default:
//!   clockwise roll orbits the camera the matching way, twice as fast).
//! * **Size**: wrist → middle knuckle length. The tracker gives no depth,
//!   so this stands in for hand-to-camera distance.
//! * **Openness**: mean wrist → fingertip distance over the four non-thumb
//!   tips, compared to the size. Strictly above `open_ratio·size` is open,
//!   strictly below `fist_ratio·size` is a fist, anything in between
//!   (boundaries included) is ambiguous.
//! * **Radius**: `radius_scale / size`, with size clamped away from zero
//!   first and the result clamped into the orbit limits.

use std::f32::consts::FRAC_PI_2;

use crate::landmarks::{HandLandmarks, FINGERTIPS};
use crate::OrbitConfig;

// ════════════════════════════════════════════════════════════════════════════
// Classification
// ════════════════════════════════════════════════════════════════════════════

/// Coarse hand pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Fingers spread well beyond the knuckles.
    Open,
    /// Fingertips curled in near the palm.
    Fist,
    /// Somewhere in between; the radius target is frozen.
    Ambiguous,
}

impl Classification {
    /// Open and Fist steer the radius; Ambiguous does not.
    pub fn is_decisive(self) -> bool {
        !matches!(self, Classification::Ambiguous)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Open      => "open",
            Classification::Fist      => "fist",
            Classification::Ambiguous => "ambiguous",
        }
    }
}

/// Classify from the average fingertip reach and the hand size.
pub fn classify(avg_tip_dist: f32, hand_size: f32, cfg: &OrbitConfig) -> Classification {
    if avg_tip_dist > cfg.open_ratio * hand_size {
        Classification::Open
    } else if avg_tip_dist < cfg.fist_ratio * hand_size {
        Classification::Fist
    } else {
        Classification::Ambiguous
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureFrame
// ════════════════════════════════════════════════════════════════════════════

/// Everything derived from one tracking result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureFrame {
    /// Hand roll in radians, 0 = fingers up.
    pub hand_angle: f32,
    /// Wrist → middle knuckle length, normalized screen units.
    pub hand_size: f32,
    pub classification: Classification,
}

impl GestureFrame {
    pub fn target_theta(&self, cfg: &OrbitConfig) -> f32 {
        cfg.theta_gain * self.hand_angle
    }

    /// Radius this frame asks for, before the ambiguity freeze is applied.
    pub fn target_radius(&self, cfg: &OrbitConfig) -> f32 {
        target_radius_for(self.hand_size, cfg)
    }
}

/// Roll of the segment wrist → knuckle, 0 when the knuckle is straight above.
pub fn hand_angle(dx: f32, dy: f32) -> f32 {
    dy.atan2(dx) + FRAC_PI_2
}

/// Map a hand size to an orbit radius.
pub fn target_radius_for(hand_size: f32, cfg: &OrbitConfig) -> f32 {
    let size = hand_size.clamp(cfg.hand_size_min, cfg.hand_size_max);
    (cfg.radius_scale / size).clamp(cfg.min_radius, cfg.max_radius)
}

// ════════════════════════════════════════════════════════════════════════════
// GestureInterpreter
// ════════════════════════════════════════════════════════════════════════════

/// Stateless interpreter; holds only its tuning.
#[derive(Clone, Copy, Debug, Default)]
pub struct GestureInterpreter {
    cfg: OrbitConfig,
}

impl GestureInterpreter {
    pub fn new(cfg: OrbitConfig) -> Self {
        GestureInterpreter { cfg }
    }

    pub fn config(&self) -> &OrbitConfig { &self.cfg }

    /// Interpret one hand.
    pub fn interpret(&self, hand: &HandLandmarks) -> GestureFrame {
        let wrist = hand.wrist();
        let mid   = hand.middle_mcp();

        let hand_size  = wrist.distance(mid);
        let hand_angle = hand_angle(mid.x - wrist.x, mid.y - wrist.y);

        let avg_tip_dist = FINGERTIPS.iter()
            .map(|&i| wrist.distance(hand[i]))
            .sum::<f32>() / FINGERTIPS.len() as f32;

        GestureFrame {
            hand_angle,
            hand_size,
            classification: classify(avg_tip_dist, hand_size, &self.cfg),
        }
    }

    /// Interpret a full tracking result. Only the first hand counts; an
    /// empty result yields `None` and must leave the camera targets alone.
    pub fn on_results(&self, hands: &[HandLandmarks]) -> Option<GestureFrame> {
        hands.first().map(|h| self.interpret(h))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Landmark, LANDMARK_COUNT, MIDDLE_MCP, WRIST};
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    /// Hand with wrist at `w`, middle knuckle at `m` and all four tips at
    /// distance `reach` straight above the wrist.
    fn hand(w: (f32, f32), m: (f32, f32), reach: f32) -> HandLandmarks {
        let mut pts = [Landmark::new(w.0, w.1); LANDMARK_COUNT];
        pts[WRIST]      = Landmark::new(w.0, w.1);
        pts[MIDDLE_MCP] = Landmark::new(m.0, m.1);
        for &i in &FINGERTIPS {
            pts[i] = Landmark::new(w.0, w.1 - reach);
        }
        HandLandmarks::new(pts)
    }

    #[test]
    fn upright_hand_reads_zero() {
        let g = GestureInterpreter::default().interpret(&hand((0.5, 0.6), (0.5, 0.4), 0.4));
        assert_relative_eq!(g.hand_angle, 0.0, epsilon = 1e-6);
        assert_relative_eq!(g.target_theta(&OrbitConfig::default()), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn hand_tilted_right_orbits_negative() {
        // Knuckle to the right of the wrist: roll of +π/2.
        let g = GestureInterpreter::default().interpret(&hand((0.5, 0.5), (0.7, 0.5), 0.4));
        assert_relative_eq!(g.hand_angle, PI / 2.0, epsilon = 1e-6);
        assert_relative_eq!(g.target_theta(&OrbitConfig::default()), -PI, epsilon = 1e-5);
    }

    #[test]
    fn size_is_wrist_to_knuckle() {
        let g = GestureInterpreter::default().interpret(&hand((0.5, 0.6), (0.5, 0.4), 0.4));
        assert_relative_eq!(g.hand_size, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn classification_thresholds() {
        let cfg = OrbitConfig::default();
        assert_eq!(classify(0.31, 0.2, &cfg), Classification::Open);
        assert_eq!(classify(0.19, 0.2, &cfg), Classification::Fist);
        assert_eq!(classify(0.25, 0.2, &cfg), Classification::Ambiguous);
        // Both boundaries are ambiguous.
        assert_eq!(classify(1.5, 1.0, &cfg), Classification::Ambiguous);
        assert_eq!(classify(1.0, 1.0, &cfg), Classification::Ambiguous);
    }

    #[test]
    fn radius_mapping_and_clamps() {
        let cfg = OrbitConfig::default();
        assert_relative_eq!(target_radius_for(0.1, &cfg), 40.0, epsilon = 1e-4);
        assert_relative_eq!(target_radius_for(0.8, &cfg), 8.0);
        assert_relative_eq!(target_radius_for(2.0, &cfg), 8.0);
        assert_relative_eq!(target_radius_for(0.0, &cfg), 80.0, epsilon = 1e-4);
        assert_relative_eq!(target_radius_for(0.01, &cfg), 80.0, epsilon = 1e-4);
    }

    #[test]
    fn radius_hits_max_when_scale_allows() {
        let cfg = OrbitConfig { radius_scale: 10.0, ..OrbitConfig::default() };
        assert_relative_eq!(target_radius_for(0.05, &cfg), 100.0);
    }

    #[test]
    fn empty_result_is_none_and_first_hand_wins() {
        let interp = GestureInterpreter::default();
        assert!(interp.on_results(&[]).is_none());

        let open = hand((0.5, 0.6), (0.5, 0.5), 0.4);
        let fist = hand((0.5, 0.6), (0.5, 0.5), 0.05);
        let g = interp.on_results(&[open, fist]).unwrap();
        assert_eq!(g.classification, Classification::Open);
    }

    #[test]
    fn only_decisive_poses_steer_radius() {
        assert!(Classification::Open.is_decisive());
        assert!(Classification::Fist.is_decisive());
        assert!(!Classification::Ambiguous.is_decisive());
    }
}
