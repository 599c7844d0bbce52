//! Normalized 2D hand landmarks.
//!
//! Coordinates are image-relative: `x` grows to the right, `y` grows
//! downward, both in `[0, 1]` for points inside the frame.

use std::ops::Index;

use thiserror::Error;

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_PIP:  usize = 6;
pub const INDEX_DIP:  usize = 7;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_PIP:   usize = 14;
pub const RING_DIP:   usize = 15;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_PIP:  usize = 18;
pub const PINKY_DIP:  usize = 19;
pub const PINKY_TIP:  usize = 20;

/// The four non-thumb fingertips used by the openness test.
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LandmarkError {
    #[error("expected 21 hand landmarks, got {0}")]
    WrongCount(usize),
}

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Landmark { x, y }
    }

    pub fn distance(self, other: Landmark) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f32, f32)> for Landmark {
    fn from((x, y): (f32, f32)) -> Self {
        Landmark { x, y }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HandLandmarks
// ════════════════════════════════════════════════════════════════════════════

/// Exactly [`LANDMARK_COUNT`] landmarks for one detected hand.
#[derive(Clone, Debug, PartialEq)]
pub struct HandLandmarks {
    points: [Landmark; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        HandLandmarks { points }
    }

    /// Build from a tracker's output slice, which must hold exactly 21 points.
    pub fn from_slice(points: &[Landmark]) -> Result<Self, LandmarkError> {
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongCount(points.len()))?;
        Ok(HandLandmarks { points })
    }

    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] { &self.points }

    pub fn wrist(&self) -> Landmark { self.points[WRIST] }

    pub fn middle_mcp(&self) -> Landmark { self.points[MIDDLE_MCP] }
}

impl Index<usize> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, i: usize) -> &Landmark {
        &self.points[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_rejects_short_input() {
        let pts = vec![Landmark::default(); 20];
        assert_eq!(HandLandmarks::from_slice(&pts), Err(LandmarkError::WrongCount(20)));
    }

    #[test]
    fn from_slice_accepts_exactly_21() {
        let mut pts = vec![Landmark::default(); LANDMARK_COUNT];
        pts[MIDDLE_MCP] = Landmark::new(0.3, 0.2);
        let hand = HandLandmarks::from_slice(&pts).unwrap();
        assert_eq!(hand.middle_mcp(), Landmark::new(0.3, 0.2));
        assert_eq!(hand[MIDDLE_MCP], hand.middle_mcp());
    }

    #[test]
    fn distance_is_euclidean() {
        let a = Landmark::new(0.0, 0.0);
        let b = Landmark::from((0.3, 0.4));
        assert!((a.distance(b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn error_message_names_count() {
        assert_eq!(
            LandmarkError::WrongCount(3).to_string(),
            "expected 21 hand landmarks, got 3"
        );
    }
}
