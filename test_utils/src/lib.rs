//! Utility helpers for tests.
//!
//! Fixtures build a small arena with one player and one enemy standing on
//! its floor. [`RecordingWorld`] wraps any physics world and keeps a log of
//! the forces and velocities the game core writes into it.

use glam::Vec2;
use runngun::config::GameConfig;
use runngun::entity::{EnemyBehaviour, Entity, EntityId};
use runngun::physics::{
    Aabb, BodyDesc, BodyId, BodyLabel, CollisionStart, CompoundDesc, CompoundHandle,
    ConstraintDesc, ConstraintId, Overlap, PhysicsWorld, Shape,
};
use runngun::{Env, LevelDescription};

/// Size of the entities spawned by [`arena`].
pub const ENTITY_SIZE: Vec2 = Vec2::new(20.0, 60.0);

/// Top-left corner of the fixture player.
pub const PLAYER_AT: Vec2 = Vec2::new(400.0, 1088.0);

/// Top-left corner of the fixture enemy.
pub const ENEMY_AT: Vec2 = Vec2::new(700.0, 1088.0);

/// The built-in arena with a camera-focused player and an idle enemy.
pub struct Arena {
    /// World under test.
    pub env: Env,
    /// Armed player.
    pub player: EntityId,
    /// Unarmed idle enemy.
    pub enemy: EntityId,
}

/// Builds an [`Arena`] from `config`.
#[must_use]
pub fn arena_with(config: GameConfig) -> Arena {
    let mut env = Env::arcade(config);
    env.load_level(&LevelDescription::arena());
    let player = env.spawn_player("Ada", PLAYER_AT, ENTITY_SIZE, true);
    let enemy = env.spawn_enemy("Target", ENEMY_AT, ENTITY_SIZE, EnemyBehaviour::Idle);
    Arena { env, player, enemy }
}

/// Builds an [`Arena`] with the default configuration.
///
/// # Examples
/// ```
/// let arena = test_utils::arena();
/// assert_eq!(arena.env.entities().len(), 2);
/// ```
#[must_use]
pub fn arena() -> Arena {
    arena_with(GameConfig::default())
}

/// Runs `ticks` ticks.
pub fn settle(env: &mut Env, ticks: usize) {
    for _ in 0..ticks {
        env.tick();
    }
}

/// Looks up an entity that must exist.
///
/// # Panics
/// Panics when `id` is not in the world.
#[must_use]
pub fn entity(env: &Env, id: EntityId) -> &Entity {
    env.entity(id)
        .unwrap_or_else(|| panic!("entity {id:?} should exist"))
}

/// Ammunition left in the entity's weapon, zero when unarmed or missing.
#[must_use]
pub fn ammo(env: &Env, id: EntityId) -> u32 {
    env.entity(id)
        .and_then(|e| e.weapon.as_ref())
        .map_or(0, runngun::Weapon::ammo)
}

/// A write recorded by [`RecordingWorld`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldWrite {
    /// `apply_force(body, _, force)`.
    Force(BodyId, Vec2),
    /// `set_velocity(body, velocity)`.
    Velocity(BodyId, Vec2),
}

/// Physics world spy delegating to an inner world.
#[derive(Debug, Clone, Default)]
pub struct RecordingWorld<W> {
    /// Wrapped world.
    pub inner: W,
    writes: Vec<WorldWrite>,
}

impl<W: PhysicsWorld> RecordingWorld<W> {
    /// Wraps `inner`.
    pub const fn new(inner: W) -> Self {
        Self {
            inner,
            writes: Vec::new(),
        }
    }

    /// Every recorded write, oldest first.
    #[must_use]
    pub fn writes(&self) -> &[WorldWrite] {
        &self.writes
    }

    /// Forces applied so far, oldest first.
    #[must_use]
    pub fn forces(&self) -> Vec<Vec2> {
        self.writes
            .iter()
            .filter_map(|w| match w {
                WorldWrite::Force(_, force) => Some(*force),
                WorldWrite::Velocity(..) => None,
            })
            .collect()
    }

    /// Forgets the recorded writes.
    pub fn clear(&mut self) {
        self.writes.clear();
    }
}

impl<W: PhysicsWorld> PhysicsWorld for RecordingWorld<W> {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        self.inner.add_body(desc)
    }
    fn add_compound(&mut self, desc: CompoundDesc) -> CompoundHandle {
        self.inner.add_compound(desc)
    }
    fn remove_body(&mut self, body: BodyId) -> bool {
        self.inner.remove_body(body)
    }
    fn add_constraint(&mut self, desc: ConstraintDesc) -> ConstraintId {
        self.inner.add_constraint(desc)
    }
    fn remove_constraint(&mut self, constraint: ConstraintId) -> bool {
        self.inner.remove_constraint(constraint)
    }
    fn contains(&self, body: BodyId) -> bool {
        self.inner.contains(body)
    }
    fn position(&self, body: BodyId) -> Option<Vec2> {
        self.inner.position(body)
    }
    fn velocity(&self, body: BodyId) -> Option<Vec2> {
        self.inner.velocity(body)
    }
    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        self.writes.push(WorldWrite::Velocity(body, velocity));
        self.inner.set_velocity(body, velocity);
    }
    fn apply_force(&mut self, body: BodyId, at: Vec2, force: Vec2) {
        self.writes.push(WorldWrite::Force(body, force));
        self.inner.apply_force(body, at, force);
    }
    fn translate(&mut self, body: BodyId, delta: Vec2) {
        self.inner.translate(body, delta);
    }
    fn rotate(&mut self, body: BodyId, delta: f32, pivot: Vec2) {
        self.inner.rotate(body, delta, pivot);
    }
    fn angle(&self, body: BodyId) -> Option<f32> {
        self.inner.angle(body)
    }
    fn set_angle(&mut self, body: BodyId, angle: f32) {
        self.inner.set_angle(body, angle);
    }
    fn set_infinite_inertia(&mut self, body: BodyId) {
        self.inner.set_infinite_inertia(body);
    }
    fn set_air_friction(&mut self, body: BodyId, air_friction: f32) {
        self.inner.set_air_friction(body, air_friction);
    }
    fn air_friction(&self, body: BodyId) -> Option<f32> {
        self.inner.air_friction(body)
    }
    fn vertices(&self, body: BodyId) -> Vec<Vec2> {
        self.inner.vertices(body)
    }
    fn shape(&self, body: BodyId) -> Option<Shape> {
        self.inner.shape(body)
    }
    fn label(&self, body: BodyId) -> Option<BodyLabel> {
        self.inner.label(body)
    }
    fn bounds(&self, body: BodyId) -> Option<Aabb> {
        self.inner.bounds(body)
    }
    fn parts(&self, body: BodyId) -> Vec<BodyId> {
        self.inner.parts(body)
    }
    fn query_overlap(&self, a: BodyId, b: BodyId) -> Option<Overlap> {
        self.inner.query_overlap(a, b)
    }
    fn step(&mut self, delta_ms: f32) {
        self.inner.step(delta_ms);
    }
    fn drain_collision_starts(&mut self) -> Vec<CollisionStart> {
        self.inner.drain_collision_starts()
    }
    fn body_count(&self) -> usize {
        self.inner.body_count()
    }
}
