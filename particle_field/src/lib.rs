//! # particle_field
//!
//! Point-cloud synthesis for the particle planet: a sphere of 15 000 points
//! (mostly packed into a thin surface shell, the rest filling the interior)
//! and a two-band ring disk of 8 000 points.
//!
//! Output is a [`ParticleBuffer`] of three parallel flat arrays, laid out the
//! way a point-cloud renderer wants them:
//!
//! | array | floats / particle |
//! |---|---|
//! | `positions` | 3 (x, y, z) |
//! | `colors` | 3 (r, g, b in 0–1) |
//! | `sizes` | 1 |
//!
//! Generation is deterministic for a given random source, so a seeded
//! [`StdRng`](rand::rngs::StdRng) reproduces the same planet every run.
//!
//! ## Quick start
//!
//! ```rust
//! use particle_field::{generate_planet, generate_rings, PlanetConfig, RingConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let planet = generate_planet(&mut rng, &PlanetConfig::default());
//! let rings  = generate_rings(&mut rng, &RingConfig::default());
//!
//! assert_eq!(planet.len(), 15_000);
//! assert_eq!(rings.len(), 8_000);
//! ```

use std::f32::consts::TAU;

use rand::Rng;

pub mod shading;

pub use shading::{falloff_alpha, point_size_px};

/// Linear RGB, each channel in 0–1.
pub type Rgb = [f32; 3];

pub const WHITE: Rgb = [1.0, 1.0, 1.0];

// ════════════════════════════════════════════════════════════════════════════
// ParticleBuffer
// ════════════════════════════════════════════════════════════════════════════

/// One particle read back out of a [`ParticleBuffer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: [f32; 3],
    pub color:    Rgb,
    pub size:     f32,
}

/// Parallel position / color / size arrays for N particles.
///
/// Built once and never mutated afterwards; animation rotates the whole
/// cloud, not individual points.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleBuffer {
    pub positions: Vec<f32>,
    pub colors:    Vec<f32>,
    pub sizes:     Vec<f32>,
}

impl ParticleBuffer {
    pub fn with_capacity(n: usize) -> Self {
        ParticleBuffer {
            positions: Vec::with_capacity(n * 3),
            colors:    Vec::with_capacity(n * 3),
            sizes:     Vec::with_capacity(n),
        }
    }

    fn push(&mut self, position: [f32; 3], color: Rgb, size: f32) {
        self.positions.extend_from_slice(&position);
        self.colors.extend_from_slice(&color);
        self.sizes.push(size);
    }

    pub fn len(&self) -> usize { self.sizes.len() }

    pub fn is_empty(&self) -> bool { self.sizes.is_empty() }

    /// Particle `i`, or `None` past the end.
    pub fn get(&self, i: usize) -> Option<Particle> {
        let size = *self.sizes.get(i)?;
        let p = &self.positions[i * 3..i * 3 + 3];
        let c = &self.colors[i * 3..i * 3 + 3];
        Some(Particle {
            position: [p[0], p[1], p[2]],
            color:    [c[0], c[1], c[2]],
            size,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Planet
// ════════════════════════════════════════════════════════════════════════════

/// Parameters for the spherical planet cloud.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanetConfig {
    pub count:  usize,
    /// Outer radius `R`.
    pub radius: f32,
    /// Probability that a particle lands in the surface shell rather than
    /// the uniformly-filled interior.
    pub shell_probability: f32,
    /// Shell spans `R·(1 − shell_depth) .. R`.
    pub shell_depth: f32,
    /// Color at the centre (`r / R = 0`).
    pub inside_color:  Rgb,
    /// Color at the surface (`r / R = 1`).
    pub surface_color: Rgb,
    pub size_min: f32,
    pub size_max: f32,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        PlanetConfig {
            count:             15_000,
            radius:            5.0,
            shell_probability: 0.7,
            shell_depth:       0.05,
            inside_color:      [1.0, 0.42, 0.12],
            surface_color:     [0.32, 0.72, 1.0],
            size_min:          0.1,
            size_max:          0.3,
        }
    }
}

/// Radial distance of one planet particle.
///
/// `w` is a uniform in `[0, 1)`. Shell particles sit in
/// `R·(1 − depth + depth·w)`; interior particles use `R·cbrt(w)` so they are
/// uniform by volume.
pub fn planet_radius(cfg: &PlanetConfig, shell: bool, w: f32) -> f32 {
    if shell {
        cfg.radius * (1.0 - cfg.shell_depth + cfg.shell_depth * w)
    } else {
        cfg.radius * w.cbrt()
    }
}

/// Point at distance `r` in the direction picked by uniforms `u`, `v`.
///
/// `theta = 2π·u`, `phi = acos(2v − 1)` gives directions uniform over the
/// unit sphere.
pub fn sphere_point(u: f32, v: f32, r: f32) -> [f32; 3] {
    let theta = TAU * u;
    let phi   = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    [
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    ]
}

/// Generate the planet cloud.
pub fn generate_planet<R: Rng + ?Sized>(rng: &mut R, cfg: &PlanetConfig) -> ParticleBuffer {
    let mut buf = ParticleBuffer::with_capacity(cfg.count);

    for _ in 0..cfg.count {
        let u: f32 = rng.gen();
        let v: f32 = rng.gen();
        let shell  = rng.gen::<f32>() < cfg.shell_probability;
        let r      = planet_radius(cfg, shell, rng.gen());

        let color = lerp_rgb(cfg.inside_color, cfg.surface_color, r / cfg.radius);
        let size  = rng.gen_range(cfg.size_min..=cfg.size_max);

        buf.push(sphere_point(u, v, r), color, size);
    }

    buf
}

// ════════════════════════════════════════════════════════════════════════════
// Rings
// ════════════════════════════════════════════════════════════════════════════

/// Parameters for the flat two-band ring disk (lying in the XZ plane).
#[derive(Clone, Debug, PartialEq)]
pub struct RingConfig {
    pub count: usize,
    /// Half-open radial interval `[start, end)` of the inner band.
    pub inner_band: (f32, f32),
    /// Half-open radial interval `[start, end)` of the outer band.
    pub outer_band: (f32, f32),
    /// Y offsets are uniform in `[−half_thickness, half_thickness]`.
    pub half_thickness: f32,
    pub color:    Rgb,
    pub size_min: f32,
    pub size_max: f32,
}

impl Default for RingConfig {
    fn default() -> Self {
        RingConfig {
            count:          8_000,
            inner_band:     (7.0, 10.0),
            outer_band:     (11.0, 14.0),
            half_thickness: 0.25,
            color:          WHITE,
            size_min:       0.05,
            size_max:       0.2,
        }
    }
}

/// Generate the ring cloud. Each particle picks the inner or outer band with
/// equal probability.
pub fn generate_rings<R: Rng + ?Sized>(rng: &mut R, cfg: &RingConfig) -> ParticleBuffer {
    let mut buf = ParticleBuffer::with_capacity(cfg.count);

    for _ in 0..cfg.count {
        let (lo, hi) = if rng.gen_bool(0.5) { cfg.inner_band } else { cfg.outer_band };
        let r     = rng.gen_range(lo..hi);
        let angle = rng.gen_range(0.0..TAU);
        let y     = rng.gen_range(-cfg.half_thickness..=cfg.half_thickness);
        let size  = rng.gen_range(cfg.size_min..=cfg.size_max);

        buf.push([r * angle.cos(), y, r * angle.sin()], cfg.color, size);
    }

    buf
}

// ────────────────────────────────────────────────────────────────────────────
// Color helpers
// ────────────────────────────────────────────────────────────────────────────

/// Component-wise linear interpolation; `t` is clamped to 0–1.
pub fn lerp_rgb(a: Rgb, b: Rgb, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn norm(p: [f32; 3]) -> f32 {
        (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt()
    }

    #[test]
    fn planet_has_requested_count() {
        let mut rng = StdRng::seed_from_u64(1);
        let buf = generate_planet(&mut rng, &PlanetConfig::default());
        assert_eq!(buf.len(), 15_000);
        assert_eq!(buf.positions.len(), 45_000);
        assert_eq!(buf.colors.len(), 45_000);
    }

    #[test]
    fn planet_points_stay_inside_bound() {
        let mut rng = StdRng::seed_from_u64(2);
        let buf = generate_planet(&mut rng, &PlanetConfig::default());
        for p in buf.iter() {
            let r = norm(p.position);
            assert!(r <= 5.05 + 1e-4, "radius {r} out of bound");
            assert!((0.1..=0.3).contains(&p.size));
        }
    }

    #[test]
    fn shell_radius_edges() {
        let cfg = PlanetConfig::default();
        assert_relative_eq!(planet_radius(&cfg, true, 0.0), 4.75, epsilon = 1e-6);
        assert_relative_eq!(planet_radius(&cfg, true, 1.0), 5.0,  epsilon = 1e-6);
        assert_relative_eq!(planet_radius(&cfg, false, 0.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(planet_radius(&cfg, false, 0.125), 2.5, epsilon = 1e-5);
    }

    #[test]
    fn sphere_point_keeps_length() {
        for &(u, v) in &[(0.0, 0.0), (0.25, 0.5), (0.9, 0.999), (0.5, 0.0)] {
            assert_relative_eq!(norm(sphere_point(u, v, 3.0)), 3.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn planet_color_tracks_radius() {
        let mut rng = StdRng::seed_from_u64(3);
        let cfg = PlanetConfig::default();
        let buf = generate_planet(&mut rng, &cfg);
        for p in buf.iter().take(500) {
            let t = norm(p.position) / cfg.radius;
            let want = lerp_rgb(cfg.inside_color, cfg.surface_color, t);
            for c in 0..3 {
                assert_relative_eq!(p.color[c], want[c], epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn rings_fall_in_bands() {
        let mut rng = StdRng::seed_from_u64(4);
        let buf = generate_rings(&mut rng, &RingConfig::default());
        assert_eq!(buf.len(), 8_000);
        let (mut inner, mut outer) = (0, 0);
        for p in buf.iter() {
            let [x, y, z] = p.position;
            let r = (x * x + z * z).sqrt();
            if (7.0 - 1e-4..10.0 + 1e-4).contains(&r) {
                inner += 1;
            } else if (11.0 - 1e-4..14.0 + 1e-4).contains(&r) {
                outer += 1;
            } else {
                panic!("ring radius {r} outside both bands");
            }
            assert!(y.abs() <= 0.25);
            assert_eq!(p.color, WHITE);
            assert!((0.05..=0.2).contains(&p.size));
        }
        // Equal-probability bands; 8 000 draws won't stray far from half.
        assert!(inner > 3_500 && outer > 3_500);
    }

    #[test]
    fn same_seed_same_cloud() {
        let a = generate_planet(&mut StdRng::seed_from_u64(9), &PlanetConfig::default());
        let b = generate_planet(&mut StdRng::seed_from_u64(9), &PlanetConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn get_past_end_is_none() {
        let buf = generate_rings(&mut StdRng::seed_from_u64(5), &RingConfig { count: 3, ..RingConfig::default() });
        assert!(buf.get(2).is_some());
        assert!(buf.get(3).is_none());
    }
}
