//! Entities: shared data plus per-archetype behaviour.
//!
//! Players and enemies share one [`Entity`] struct. What differs between
//! them lives in [`Archetype`]: players carry camera focus and are driven by
//! input, enemies carry an [`EnemyBehaviour`]. Movement, aiming and contact
//! handling are implemented in the submodules as further `impl Entity`
//! blocks.

pub mod aim;
pub mod body;
pub mod contact;
pub mod locomotion;

use glam::Vec2;
use log::info;

use crate::combat::Weapon;
use crate::config::EntityTuning;

pub use body::EntityBody;
pub use contact::{classify, ContactReport};
pub use locomotion::LocomotionState;

/// Identifier of an entity inside an [`Env`](crate::env::Env).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Horizontal side, used both for facing and for movement requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Towards negative x.
    Left,
    /// Towards positive x.
    Right,
}

impl Side {
    /// `-1.0` for left, `1.0` for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The other side.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// What an enemy does on its own every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnemyBehaviour {
    /// Stands still.
    #[default]
    Idle,
    /// Keeps aiming at the nearest other living entity.
    Watch,
}

/// Capabilities that distinguish entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    /// Input-driven entity.
    Player {
        /// Whether the camera follows this player.
        camera_focus: bool,
    },
    /// Self-driven entity.
    Enemy(EnemyBehaviour),
}

impl Archetype {
    /// Whether this is a player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Player { .. })
    }
}

/// A living (or dead) actor owning a composite body.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Identifier.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Body centre, refreshed every update.
    pub position: Vec2,
    /// Body velocity, refreshed every update.
    pub velocity: Vec2,
    /// Body width.
    pub width: f32,
    /// Body height.
    pub height: f32,
    health: f32,
    max_health: f32,
    alive: bool,
    /// Side the entity currently faces.
    pub facing: Side,
    /// Aim angle in radians.
    pub aim_angle: f32,
    /// Whether no ground was found under the sensor this tick.
    pub on_air: bool,
    /// Whether the legs are pulled up.
    pub is_crouch: bool,
    /// Whether a move was requested this tick.
    pub is_moving: bool,
    /// Physics handles owned by the entity.
    pub body: EntityBody,
    /// Jump counter and wall-slide state.
    pub locomotion: LocomotionState,
    /// Movement tuning.
    pub tuning: EntityTuning,
    /// Equipped weapon, if any.
    pub weapon: Option<Weapon>,
    /// Kind-specific behaviour.
    pub archetype: Archetype,
}

impl Entity {
    /// Wraps an already constructed body into a full-health entity.
    #[must_use]
    pub fn new(
        id: EntityId,
        name: impl Into<String>,
        centre: Vec2,
        size: Vec2,
        body: EntityBody,
        tuning: EntityTuning,
        archetype: Archetype,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            position: centre,
            velocity: Vec2::ZERO,
            width: size.x,
            height: size.y,
            health: tuning.max_health,
            max_health: tuning.max_health,
            alive: tuning.max_health > 0.0,
            facing: Side::Right,
            aim_angle: 0.0,
            on_air: false,
            is_crouch: false,
            is_moving: false,
            body,
            locomotion: LocomotionState::default(),
            tuning,
            weapon: None,
            archetype,
        }
    }

    /// Equips a weapon.
    #[must_use]
    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = Some(weapon);
        self
    }

    /// Current health in `[0, max_health]`.
    #[must_use]
    pub const fn health(&self) -> f32 {
        self.health
    }

    /// Result of the last death check.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Subtracts `amount` from health, never going below zero.
    ///
    /// # Examples
    /// ```
    /// # use runngun::entity::{Archetype, Entity, EntityBody, EntityId};
    /// # use runngun::config::{CollisionConfig, EntityTuning};
    /// # use runngun::physics::arcade::ArcadeWorld;
    /// # use glam::Vec2;
    /// # let mut world = ArcadeWorld::default();
    /// # let tuning = EntityTuning::default();
    /// # let size = Vec2::new(20.0, 60.0);
    /// # let collision = CollisionConfig::default();
    /// # let body = EntityBody::build(&mut world, Vec2::ZERO, size, &tuning, &collision);
    /// let player = Archetype::Player { camera_focus: false };
    /// let mut entity = Entity::new(EntityId(1), "Ada", Vec2::ZERO, size, body, tuning, player);
    /// entity.take_damage(120.0);
    /// assert_eq!(entity.health(), 0.0);
    /// ```
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).clamp(0.0, self.max_health);
    }

    /// Recomputes `alive` from health and the world floor.
    ///
    /// Returns `true` when the entity died during this check.
    pub fn check_death(&mut self, world_floor: f32) -> bool {
        let was_alive = self.alive;
        self.alive = self.health > 0.0 && self.position.y <= world_floor;
        if was_alive && !self.alive {
            info!("{} died", self.name);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CollisionConfig;
    use crate::physics::arcade::ArcadeWorld;
    use rstest::{fixture, rstest};

    #[fixture]
    fn entity() -> Entity {
        let mut world = ArcadeWorld::default();
        let tuning = EntityTuning::default();
        let size = Vec2::new(20.0, 60.0);
        let body = EntityBody::build(
            &mut world,
            Vec2::new(100.0, 100.0),
            size,
            &tuning,
            &CollisionConfig::default(),
        );
        Entity::new(
            EntityId(1),
            "Target",
            Vec2::new(100.0, 100.0),
            size,
            body,
            tuning,
            Archetype::Enemy(EnemyBehaviour::Idle),
        )
    }

    #[rstest]
    fn overkill_clamps_health_and_kills(mut entity: Entity) {
        entity.take_damage(120.0);
        assert_eq!(entity.health(), 0.0);
        assert!(entity.is_alive(), "alive only changes on the death check");
        assert!(entity.check_death(1000.0));
        assert!(!entity.is_alive());
        assert!(!entity.check_death(1000.0), "death is reported once");
    }

    #[rstest]
    fn falling_below_the_floor_kills(mut entity: Entity) {
        entity.position.y = 1001.0;
        assert!(entity.check_death(1000.0));
        assert_eq!(entity.health(), 100.0);
    }

    #[rstest]
    fn negative_damage_does_not_heal(mut entity: Entity) {
        entity.take_damage(30.0);
        entity.take_damage(-50.0);
        assert_eq!(entity.health(), 70.0);
    }

    #[rstest]
    #[case(Side::Left, -1.0)]
    #[case(Side::Right, 1.0)]
    fn side_signs(#[case] side: Side, #[case] sign: f32) {
        assert_eq!(side.sign(), sign);
        assert_eq!(side.flipped().flipped(), side);
        assert_eq!(side.flipped().sign(), -sign);
    }
}
