//! Short-lived hit particles.
//!
//! Each hit spawns one burst. Particles fall under a constant per-tick
//! gravity and the whole burst is removed when its lifetime task fires.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;

use crate::config::ParticleConfig;
use crate::random::SeededRandom;

/// Identifier of a particle burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BurstId(pub u64);

/// One particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Burst the particle belongs to.
    pub burst: BurstId,
    /// Current position.
    pub position: Vec2,
    /// Current velocity per tick.
    pub velocity: Vec2,
    /// Drawn radius.
    pub radius: f32,
}

/// All live particles.
#[derive(Debug, Clone, Default)]
pub struct Particles {
    items: Vec<Particle>,
    next_burst: u64,
}

impl Particles {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns `config.count` particles at `at`, fanned over the left half
    /// plane (non-positive x velocity) with random speeds.
    pub fn spawn_burst(
        &mut self,
        at: Vec2,
        config: &ParticleConfig,
        rng: &mut SeededRandom,
    ) -> BurstId {
        let burst = BurstId(self.next_burst);
        self.next_burst += 1;
        for _ in 0..config.count {
            let angle = FRAC_PI_2 + rng.next_unit() * PI;
            let velocity = Vec2::new(
                rng.next_unit() * config.max_speed * angle.cos(),
                rng.next_unit() * config.max_speed * angle.sin(),
            );
            self.items.push(Particle {
                burst,
                position: at,
                velocity,
                radius: config.radius,
            });
        }
        burst
    }

    /// Applies gravity then moves every particle.
    pub fn update(&mut self, gravity: f32, timescale: f32) {
        for particle in &mut self.items {
            particle.velocity.y += gravity;
            particle.position += particle.velocity * timescale;
        }
    }

    /// Removes every particle of `burst` and returns how many went away.
    pub fn expire(&mut self, burst: BurstId) -> usize {
        let before = self.items.len();
        self.items.retain(|p| p.burst != burst);
        before - self.items.len()
    }

    /// Iterates over live particles.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.items.iter()
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether no particle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn config() -> ParticleConfig {
        ParticleConfig::default()
    }

    #[rstest]
    fn burst_spawns_configured_count(config: ParticleConfig) {
        let mut particles = Particles::new();
        let mut rng = SeededRandom::new(1);
        particles.spawn_burst(Vec2::new(5.0, 5.0), &config, &mut rng);
        assert_eq!(particles.len(), config.count);
        for p in particles.iter() {
            assert!(p.velocity.length() <= config.max_speed * std::f32::consts::SQRT_2);
            assert_eq!(p.position, Vec2::new(5.0, 5.0));
        }
    }

    #[rstest]
    fn bursts_fan_out_to_the_left(config: ParticleConfig) {
        let mut particles = Particles::new();
        let mut rng = SeededRandom::new(7);
        for _ in 0..20 {
            particles.spawn_burst(Vec2::ZERO, &config, &mut rng);
        }
        assert!(particles.iter().all(|p| p.velocity.x <= 1e-6));
        assert!(particles.iter().any(|p| p.velocity.y < 0.0));
        assert!(particles.iter().any(|p| p.velocity.y > 0.0));
    }

    #[rstest]
    fn expire_only_removes_its_burst(config: ParticleConfig) {
        let mut particles = Particles::new();
        let mut rng = SeededRandom::new(2);
        let first = particles.spawn_burst(Vec2::ZERO, &config, &mut rng);
        let second = particles.spawn_burst(Vec2::ONE, &config, &mut rng);
        assert_eq!(particles.expire(first), config.count);
        assert_eq!(particles.len(), config.count);
        assert!(particles.iter().all(|p| p.burst == second));
        assert_eq!(particles.expire(first), 0);
    }

    #[rstest]
    fn gravity_accumulates_and_motion_scales(config: ParticleConfig) {
        let mut particles = Particles::new();
        let mut rng = SeededRandom::new(3);
        particles.spawn_burst(Vec2::ZERO, &ParticleConfig { count: 1, ..config }, &mut rng);
        let start = particles.iter().next().copied().unwrap_or_else(|| panic!("one particle"));
        particles.update(1.0, 0.5);
        let after = particles.iter().next().copied().unwrap_or_else(|| panic!("one particle"));
        assert_relative_eq!(after.velocity.y, start.velocity.y + 1.0);
        assert_relative_eq!(after.position.y, (start.velocity.y + 1.0) * 0.5);
    }
}
