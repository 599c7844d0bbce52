//! Per-particle shading contract shared by every point-cloud layer.
//!
//! Points are drawn as round sprites:
//!
//! * on-screen size is `size · scale / depth` (farther = smaller);
//! * a fragment at normalized distance `d` from the sprite centre (`0.5` is
//!   the sprite edge) is discarded past the edge, otherwise weighted by
//!   `(1 − 2d)^1.5`;
//! * weighted colors are summed (additive blending, no depth test).

/// Sprite edge in normalized sprite coordinates.
pub const SPRITE_EDGE: f32 = 0.5;

/// On-screen diameter in pixels of a particle of world `size` seen at
/// view-space distance `view_depth`. Points at or behind the eye get 0.
pub fn point_size_px(size: f32, view_depth: f32, scale: f32) -> f32 {
    if view_depth <= 0.0 {
        return 0.0;
    }
    size * scale / view_depth
}

/// Alpha for a fragment `d` away from the sprite centre, or `None` when the
/// fragment lies outside the round sprite.
pub fn falloff_alpha(d: f32) -> Option<f32> {
    if !(0.0..=SPRITE_EDGE).contains(&d) {
        return None;
    }
    Some((1.0 - 2.0 * d).powf(1.5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn centre_is_opaque_edge_is_clear() {
        assert_relative_eq!(falloff_alpha(0.0).unwrap(), 1.0);
        assert_relative_eq!(falloff_alpha(0.5).unwrap(), 0.0);
        assert_relative_eq!(falloff_alpha(0.25).unwrap(), 0.5_f32.powf(1.5), epsilon = 1e-6);
    }

    #[test]
    fn outside_sprite_is_discarded() {
        assert_eq!(falloff_alpha(0.5001), None);
        assert_eq!(falloff_alpha(-0.1), None);
    }

    #[test]
    fn size_halves_when_depth_doubles() {
        let near = point_size_px(0.2, 10.0, 300.0);
        let far  = point_size_px(0.2, 20.0, 300.0);
        assert_relative_eq!(near, 6.0, epsilon = 1e-5);
        assert_relative_eq!(far * 2.0, near, epsilon = 1e-5);
        assert_eq!(point_size_px(0.2, 0.0, 300.0), 0.0);
    }
}
