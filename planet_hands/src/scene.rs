//! The planet scene: two point-cloud layers, each spinning about Y.

use glam::{Mat4, Vec3};
use rand::{rngs::StdRng, SeedableRng};

use particle_field::{generate_planet, generate_rings, ParticleBuffer, PlanetConfig, RingConfig};

/// Scene contents and animation rates.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub seed:   u64,
    pub planet: PlanetConfig,
    pub rings:  RingConfig,
    /// Planet spin, rad/s.
    pub planet_spin: f32,
    /// Ring spin, rad/s (negative = against the planet).
    pub ring_spin:   f32,
    /// Fixed tilt of the ring plane about X, radians.
    pub ring_tilt:   f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        SceneConfig {
            seed:        42,
            planet:      PlanetConfig::default(),
            rings:       RingConfig::default(),
            planet_spin: 0.05,
            ring_spin:   -0.02,
            ring_tilt:   0.3,
        }
    }
}

/// One point cloud plus its whole-object transform.
#[derive(Debug)]
pub struct PointLayer {
    pub particles: ParticleBuffer,
    /// Accumulated rotation about Y.
    pub spin:      f32,
    pub spin_rate: f32,
    pub tilt:      f32,
}

impl PointLayer {
    pub fn new(particles: ParticleBuffer, spin_rate: f32, tilt: f32) -> Self {
        PointLayer { particles, spin: 0.0, spin_rate, tilt }
    }

    pub fn tick(&mut self, delta: f32) {
        self.spin += self.spin_rate * delta;
    }

    /// Model matrix: spin about Y, then tilt about X.
    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_x(self.tilt) * Mat4::from_rotation_y(self.spin)
    }

    /// World-space positions (model matrix applied).
    pub fn world_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        let m = self.model();
        self.particles.positions
            .chunks_exact(3)
            .map(move |p| m.transform_point3(Vec3::new(p[0], p[1], p[2])))
    }
}

#[derive(Debug)]
pub struct Scene {
    pub planet: PointLayer,
    pub rings:  PointLayer,
}

impl Scene {
    /// Generate both clouds from `cfg.seed`. Planet first, then rings, from
    /// one generator, so a seed always yields the same pair.
    pub fn build(cfg: &SceneConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let planet  = generate_planet(&mut rng, &cfg.planet);
        let rings   = generate_rings(&mut rng, &cfg.rings);

        Scene {
            planet: PointLayer::new(planet, cfg.planet_spin, 0.0),
            rings:  PointLayer::new(rings, cfg.ring_spin, cfg.ring_tilt),
        }
    }

    /// Advance the automatic rotation.
    pub fn tick(&mut self, delta: f32) {
        self.planet.tick(delta);
        self.rings.tick(delta);
    }

    pub fn layers(&self) -> [&PointLayer; 2] {
        [&self.planet, &self.rings]
    }

    pub fn particle_count(&self) -> usize {
        self.planet.particles.len() + self.rings.particles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn small() -> SceneConfig {
        SceneConfig {
            planet: PlanetConfig { count: 200, ..PlanetConfig::default() },
            rings:  RingConfig   { count: 100, ..RingConfig::default()   },
            ..SceneConfig::default()
        }
    }

    #[test]
    fn build_uses_configured_counts() {
        let scene = Scene::build(&small());
        assert_eq!(scene.planet.particles.len(), 200);
        assert_eq!(scene.rings.particles.len(), 100);
        assert_eq!(scene.particle_count(), 300);
    }

    #[test]
    fn default_scene_is_full_size() {
        let scene = Scene::build(&SceneConfig::default());
        assert_eq!(scene.planet.particles.len(), 15_000);
        assert_eq!(scene.rings.particles.len(), 8_000);
    }

    #[test]
    fn layers_spin_at_their_own_rates() {
        let mut scene = Scene::build(&small());
        for _ in 0..10 { scene.tick(0.1); }
        assert_relative_eq!(scene.planet.spin, 0.05, epsilon = 1e-6);
        assert_relative_eq!(scene.rings.spin, -0.02, epsilon = 1e-6);
    }

    #[test]
    fn spin_preserves_distance_from_origin() {
        let mut scene = Scene::build(&small());
        let before: Vec<f32> = scene.rings.world_positions().map(|p| p.length()).collect();
        scene.tick(3.0);
        let after: Vec<f32> = scene.rings.world_positions().map(|p| p.length()).collect();
        for (a, b) in before.iter().zip(&after) {
            assert_relative_eq!(*a, *b, epsilon = 1e-4);
        }
    }

    #[test]
    fn same_seed_same_scene() {
        let a = Scene::build(&small());
        let b = Scene::build(&small());
        assert_eq!(a.planet.particles, b.planet.particles);
        assert_eq!(a.rings.particles, b.rings.particles);
    }
}
