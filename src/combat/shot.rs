//! Projectile lifecycle.

use glam::Vec2;

use crate::config::{WeaponSpec, WorldConfig};
use crate::constants::{SHOT_ID_PREFIX, SHOT_THICKNESS};
use crate::entity::EntityId;
use crate::physics::{
    BodyDesc, BodyId, BodyLabel, BodyOptions, CollisionFilter, PhysicsWorld, Shape,
};
use crate::vector_math::direction;

/// Identifier of a shot, allocated from a prefixed monotonic counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShotId(pub u64);

/// Hands out shot identifiers.
#[derive(Debug, Clone, Default)]
pub struct ShotIds {
    issued: u64,
}

impl ShotIds {
    /// Next identifier; never repeats.
    pub fn next_id(&mut self) -> ShotId {
        let id = ShotId(SHOT_ID_PREFIX + self.issued);
        self.issued += 1;
        id
    }
}

/// Rectangle outside which shots are culled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotBounds {
    /// Smallest x allowed.
    pub min_x: f32,
    /// Largest x allowed.
    pub max_x: f32,
    /// Smallest y allowed.
    pub min_y: f32,
    /// Largest y allowed.
    pub max_y: f32,
}

impl ShotBounds {
    /// Map rectangle with the configured margin on the left.
    #[must_use]
    pub fn from_world(world: &WorldConfig) -> Self {
        Self {
            min_x: -world.shot_bounds_margin,
            max_x: world.map_width,
            min_y: 0.0,
            max_y: world.map_height,
        }
    }

    /// Whether `point` lies inside the bounds, edges included.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_y..=self.max_y).contains(&point.y)
    }
}

/// Where and by whom a shot is fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotOrder {
    /// Identifier for the new shot.
    pub id: ShotId,
    /// Firing entity.
    pub owner: EntityId,
    /// Muzzle position.
    pub origin: Vec2,
    /// Direction in radians, spread included.
    pub angle: f32,
}

/// A projectile in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    /// Identifier.
    pub id: ShotId,
    /// Entity that fired the shot.
    pub owner: EntityId,
    /// Physics body.
    pub body: BodyId,
    /// Muzzle position at spawn.
    pub origin: Vec2,
    /// Current position.
    pub position: Vec2,
    /// Travel direction in radians.
    pub direction: f32,
    /// Damage dealt on hit.
    pub damage: f32,
    /// Distance per tick at timescale 1.
    pub speed: f32,
    /// Distance after which the shot fizzles.
    pub range: Option<f32>,
}

impl Shot {
    /// Spawns a shot body at the muzzle heading along the order's angle.
    pub fn spawn(
        world: &mut dyn PhysicsWorld,
        order: ShotOrder,
        spec: &WeaponSpec,
        units_per_tile: f32,
        filter: CollisionFilter,
    ) -> Self {
        let ShotOrder {
            id,
            owner,
            origin,
            angle,
        } = order;
        let mut options = BodyOptions::labelled(BodyLabel::Shot);
        options.friction = 0.0;
        options.angle = angle;
        options.filter = filter;
        options.infinite_inertia = true;
        let body = world.add_body(BodyDesc {
            position: origin,
            shape: Shape::Rect {
                width: spec.ammo_size * units_per_tile / 3.0,
                height: SHOT_THICKNESS,
            },
            options,
        });
        Self {
            id,
            owner,
            body,
            origin,
            position: origin,
            direction: angle,
            damage: spec.damage,
            speed: spec.speed,
            range: spec.range,
        }
    }

    /// Moves the shot one tick along its direction.
    pub fn advance(&mut self, world: &mut dyn PhysicsWorld, timescale: f32) {
        let delta = direction(self.direction) * self.speed * timescale;
        world.translate(self.body, delta);
        self.position = world.position(self.body).unwrap_or(self.position + delta);
    }

    /// Whether the shot left the bounds, stopped, or outran its range.
    #[must_use]
    pub fn is_spent(&self, bounds: &ShotBounds) -> bool {
        let out_of_range = self
            .range
            .is_some_and(|range| self.origin.distance(self.position) > range);
        self.speed == 0.0 || !bounds.contains(self.position) || out_of_range
    }

    /// Removes the shot body from the world.
    pub fn despawn(&self, world: &mut dyn PhysicsWorld) {
        world.remove_body(self.body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::arcade::ArcadeWorld;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const BOUNDS: ShotBounds = ShotBounds {
        min_x: -500.0,
        max_x: 1000.0,
        min_y: 0.0,
        max_y: 600.0,
    };

    #[fixture]
    fn world() -> ArcadeWorld {
        ArcadeWorld::default()
    }

    fn fire(world: &mut ArcadeWorld, spec: &WeaponSpec, at: Vec2, angle: f32) -> Shot {
        let order = ShotOrder {
            id: ShotId(1000),
            owner: EntityId(1),
            origin: at,
            angle,
        };
        Shot::spawn(world, order, spec, 32.0, CollisionFilter::default())
    }

    #[test]
    fn ids_are_prefixed_and_monotonic() {
        let mut ids = ShotIds::default();
        assert_eq!(ids.next_id(), ShotId(1000));
        assert_eq!(ids.next_id(), ShotId(1001));
    }

    #[rstest]
    fn advance_scales_with_timescale(mut world: ArcadeWorld) {
        let spec = WeaponSpec::assault_rifle();
        let mut shot = fire(&mut world, &spec, Vec2::new(100.0, 100.0), 0.0);
        shot.advance(&mut world, 0.5);
        assert_relative_eq!(shot.position.x, 100.0 + spec.speed * 0.5);
        assert_relative_eq!(shot.position.y, 100.0);
    }

    #[rstest]
    #[case::inside(Vec2::new(10.0, 10.0), false)]
    #[case::past_right_edge(Vec2::new(1000.5, 10.0), true)]
    #[case::inside_left_margin(Vec2::new(-499.0, 10.0), false)]
    #[case::above_map(Vec2::new(10.0, -1.0), true)]
    #[case::below_map(Vec2::new(10.0, 601.0), true)]
    fn bounds_cull_shots(mut world: ArcadeWorld, #[case] at: Vec2, #[case] spent: bool) {
        let shot = fire(&mut world, &WeaponSpec::assault_rifle(), at, 0.0);
        assert_eq!(shot.is_spent(&BOUNDS), spent);
    }

    #[rstest]
    fn zero_speed_is_spent(mut world: ArcadeWorld) {
        let mut spec = WeaponSpec::assault_rifle();
        spec.speed = 0.0;
        let shot = fire(&mut world, &spec, Vec2::new(10.0, 10.0), 0.0);
        assert!(shot.is_spent(&BOUNDS));
    }

    #[rstest]
    fn range_limits_travel(mut world: ArcadeWorld) {
        let spec = WeaponSpec::smg();
        let mut shot = fire(&mut world, &spec, Vec2::new(-400.0, 300.0), 0.0);
        let mut ticks = 0;
        while !shot.is_spent(&BOUNDS) {
            shot.advance(&mut world, 1.0);
            ticks += 1;
        }
        assert_eq!(ticks, 19, "900 units at 50 per tick");
        shot.despawn(&mut world);
        assert!(!world.contains(shot.body));
    }
}
