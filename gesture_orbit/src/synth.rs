//! Synthetic hands.
//!
//! Builds a plausible 21-point hand from a handful of parameters (wrist
//! position, roll, apparent size, pose). Used by the simulated hand source
//! and by the trajectory tool; handy in tests too.

use crate::landmarks::*;

/// Finger posture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandPose {
    /// Fingers straight out.
    Open,
    /// Fingers half bent.
    Relaxed,
    /// Fingers curled back over the palm.
    Fist,
}

impl HandPose {
    /// How far along each finger the tip reaches, as a fraction of its
    /// length. Negative values curl the tip back toward the wrist.
    fn reach(self) -> f32 {
        match self {
            HandPose::Open    => 1.0,
            HandPose::Relaxed => 0.35,
            HandPose::Fist    => -0.4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandPose::Open    => "open",
            HandPose::Relaxed => "relaxed",
            HandPose::Fist    => "fist",
        }
    }
}

// Hand-local layout in units of hand size: (along, across) of each finger's
// knuckle, plus finger length. `along` runs wrist → middle knuckle.
const FINGERS: [(usize, f32, f32, f32); 4] = [
    (INDEX_MCP,  0.95,  0.30, 1.0),
    (MIDDLE_MCP, 1.00,  0.00, 1.1),
    (RING_MCP,   0.93, -0.28, 1.0),
    (PINKY_MCP,  0.82, -0.52, 0.8),
];

/// Parameters of a synthetic hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SynthHand {
    pub wrist: Landmark,
    /// Roll in radians, 0 = fingers up, positive = clockwise on screen.
    pub roll:  f32,
    /// Wrist → middle knuckle distance.
    pub size:  f32,
    pub pose:  HandPose,
}

impl SynthHand {
    pub fn landmarks(&self) -> HandLandmarks {
        let (s, c) = self.roll.sin_cos();
        // Screen y grows downward, so "up" is −y.
        let up    = (s, -c);
        let right = (c, s);

        let at = |along: f32, across: f32| {
            Landmark::new(
                self.wrist.x + self.size * (along * up.0 + across * right.0),
                self.wrist.y + self.size * (along * up.1 + across * right.1),
            )
        };

        let mut pts = [self.wrist; LANDMARK_COUNT];
        let reach = self.pose.reach();

        for &(mcp, along, across, len) in &FINGERS {
            let tip = along + len * reach;
            pts[mcp]     = at(along, across);
            pts[mcp + 1] = at(along + (tip - along) / 3.0, across);
            pts[mcp + 2] = at(along + 2.0 * (tip - along) / 3.0, across);
            pts[mcp + 3] = at(tip, across);
        }

        // Thumb swings out when open and tucks in otherwise.
        let spread = 0.35 + 0.55 * reach.max(0.0);
        pts[THUMB_CMC] = at(0.20, 0.30);
        pts[THUMB_MCP] = at(0.40, 0.30 + spread * 0.5);
        pts[THUMB_IP]  = at(0.55, 0.30 + spread * 0.8);
        pts[THUMB_TIP] = at(0.70, 0.30 + spread);

        HandLandmarks::new(pts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::{Classification, GestureInterpreter};
    use approx::assert_relative_eq;

    fn hand(roll: f32, size: f32, pose: HandPose) -> SynthHand {
        SynthHand { wrist: Landmark::new(0.5, 0.7), roll, size, pose }
    }

    #[test]
    fn poses_classify_as_intended() {
        let interp = GestureInterpreter::default();
        for &roll in &[-1.2_f32, -0.3, 0.0, 0.4, 1.5] {
            for &size in &[0.06_f32, 0.15, 0.3] {
                let c = |p| interp.interpret(&hand(roll, size, p).landmarks()).classification;
                assert_eq!(c(HandPose::Open),    Classification::Open);
                assert_eq!(c(HandPose::Relaxed), Classification::Ambiguous);
                assert_eq!(c(HandPose::Fist),    Classification::Fist);
            }
        }
    }

    #[test]
    fn roll_and_size_round_trip_through_interpreter() {
        let g = GestureInterpreter::default().interpret(&hand(0.6, 0.2, HandPose::Open).landmarks());
        assert_relative_eq!(g.hand_angle, 0.6, epsilon = 1e-5);
        assert_relative_eq!(g.hand_size, 0.2, epsilon = 1e-5);
    }
}
