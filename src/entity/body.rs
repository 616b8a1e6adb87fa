//! Composite body construction.
//!
//! ```text
//! ________
//! | head | 1/3
//! | torso| 1/3
//! | legs | 1/3
//! ‾‾sensor‾
//! ```
//!
//! Head, torso, legs and the ground sensor are parts of one compound. The arm
//! is a separate body pinned to the compound by a single constraint whose
//! anchor sits on the facing side.

use glam::Vec2;

use crate::config::{CollisionConfig, EntityTuning};
use crate::constants::{ARM_HEIGHT, ARM_OFFSET_X, SENSOR_HEIGHT};
use crate::physics::{
    BodyDesc, BodyId, BodyLabel, BodyOptions, CompoundDesc, ConstraintDesc, ConstraintId,
    PartDesc, PhysicsWorld, Shape,
};

use super::Side;

/// Physics handles owned by one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityBody {
    /// Compound root.
    pub root: BodyId,
    /// Circular head part.
    pub head: BodyId,
    /// Torso part.
    pub torso: BodyId,
    /// Legs part.
    pub legs: BodyId,
    /// Non-colliding strip under the feet.
    pub sensor: BodyId,
    /// Separately simulated arm.
    pub arm: BodyId,
    /// Constraint pinning the arm to the torso.
    pub arm_constraint: ConstraintId,
    /// Every body id belonging to the entity, fixed at construction.
    pub id_array: Vec<BodyId>,
    /// How far the legs move up when crouching.
    pub crouch_offset: f32,
    width: f32,
    arm_length: f32,
}

impl EntityBody {
    /// Builds the compound and arm centred on `centre` and adds them to
    /// `world`. The arm starts on the right-hand side.
    pub fn build(
        world: &mut dyn PhysicsWorld,
        centre: Vec2,
        size: Vec2,
        tuning: &EntityTuning,
        collision: &CollisionConfig,
    ) -> Self {
        let (width, height) = (size.x, size.y);
        let third = height / 3.0;
        let part = |offset: Vec2, shape: Shape, label: BodyLabel, is_sensor: bool| PartDesc {
            offset,
            shape,
            label,
            is_sensor,
        };
        let parts = vec![
            part(
                Vec2::new(0.0, -third),
                Shape::Circle {
                    radius: width / 2.0,
                },
                BodyLabel::PlayerCircle,
                false,
            ),
            part(
                Vec2::ZERO,
                Shape::Rect {
                    width,
                    height: third,
                },
                BodyLabel::PlayerRect,
                false,
            ),
            part(
                Vec2::new(0.0, third),
                Shape::Rect {
                    width,
                    height: third,
                },
                BodyLabel::PlayerRect,
                false,
            ),
            part(
                Vec2::new(0.0, height / 2.0),
                Shape::Rect {
                    width,
                    height: SENSOR_HEIGHT,
                },
                BodyLabel::PlayerRect,
                true,
            ),
        ];

        let mut options = BodyOptions::labelled(BodyLabel::ComposedBody);
        options.friction = tuning.friction;
        options.friction_static = tuning.static_friction;
        options.air_friction = tuning.air_friction;
        options.restitution = tuning.restitution;
        options.mass = Some(tuning.mass);
        options.filter = collision.body;
        options.infinite_inertia = true;

        let handle = world.add_compound(CompoundDesc {
            position: centre,
            parts,
            options,
        });
        let [head, torso, legs, sensor] = match handle.parts.as_slice() {
            [head, torso, legs, sensor] => [*head, *torso, *legs, *sensor],
            _ => [handle.root; 4],
        };

        let arm_length = width * 2.0 / 3.0;
        let mut arm_options = BodyOptions::labelled(BodyLabel::PlayerRect);
        arm_options.filter = collision.arm;
        arm_options.infinite_inertia = true;
        let arm = world.add_body(BodyDesc {
            position: centre + Vec2::new(width - ARM_OFFSET_X, 0.0),
            shape: Shape::Rect {
                width: arm_length,
                height: ARM_HEIGHT,
            },
            options: arm_options,
        });
        let arm_constraint = world.add_constraint(Self::arm_joint(
            handle.root,
            arm,
            width,
            arm_length,
            Side::Right,
        ));

        let mut id_array = vec![handle.root];
        id_array.extend(handle.parts.iter().copied());
        id_array.push(arm);

        Self {
            root: handle.root,
            head,
            torso,
            legs,
            sensor,
            arm,
            arm_constraint,
            id_array,
            crouch_offset: (height * 1.5 / 6.0 * 100.0).round() / 100.0,
            width,
            arm_length,
        }
    }

    fn arm_joint(
        root: BodyId,
        arm: BodyId,
        width: f32,
        arm_length: f32,
        facing: Side,
    ) -> ConstraintDesc {
        ConstraintDesc {
            body_a: root,
            point_a: Vec2::new(facing.sign() * (width / 2.0 - ARM_OFFSET_X), 0.0),
            body_b: arm,
            point_b: Vec2::new(-arm_length / 2.0, 0.0),
            stiffness: 1.0,
            length: 0.0,
        }
    }

    /// World position of the shoulder for the given facing.
    #[must_use]
    pub fn arm_anchor(&self, world: &dyn PhysicsWorld, facing: Side) -> Option<Vec2> {
        world
            .position(self.root)
            .map(|p| p + Vec2::new(facing.sign() * (self.width / 2.0 - ARM_OFFSET_X), 0.0))
    }

    /// Muzzle position: the lower far corner of the arm.
    #[must_use]
    pub fn arm_tip(&self, world: &dyn PhysicsWorld) -> Option<Vec2> {
        world.vertices(self.arm).get(2).copied()
    }

    /// Replaces the arm constraint with one anchored on `facing`.
    pub fn rebuild_arm_constraint(&mut self, world: &mut dyn PhysicsWorld, facing: Side) {
        world.remove_constraint(self.arm_constraint);
        self.arm_constraint = world.add_constraint(Self::arm_joint(
            self.root,
            self.arm,
            self.width,
            self.arm_length,
            facing,
        ));
    }

    /// Whether `body` belongs to this entity.
    #[must_use]
    pub fn owns(&self, body: BodyId) -> bool {
        self.id_array.contains(&body)
    }

    /// Removes the compound and the arm from `world`.
    pub fn despawn(&self, world: &mut dyn PhysicsWorld) {
        world.remove_body(self.arm);
        world.remove_body(self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::arcade::ArcadeWorld;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const SIZE: Vec2 = Vec2::new(24.0, 60.0);

    #[fixture]
    fn built() -> (ArcadeWorld, EntityBody) {
        let mut world = ArcadeWorld::default();
        let body = EntityBody::build(
            &mut world,
            Vec2::new(100.0, 200.0),
            SIZE,
            &EntityTuning::default(),
            &CollisionConfig::default(),
        );
        (world, body)
    }

    #[rstest]
    fn id_array_covers_every_part(built: (ArcadeWorld, EntityBody)) {
        let (world, body) = built;
        assert_eq!(body.id_array.len(), 6);
        for id in [body.root, body.head, body.torso, body.legs, body.sensor, body.arm] {
            assert!(body.owns(id), "{id:?} missing");
            assert!(world.contains(id));
        }
    }

    #[rstest]
    fn parts_are_stacked(built: (ArcadeWorld, EntityBody)) {
        let (world, body) = built;
        let y = |id| world.position(id).map_or(f32::NAN, |p| p.y);
        assert!(y(body.head) < y(body.torso));
        assert!(y(body.torso) < y(body.legs));
        assert!(y(body.legs) < y(body.sensor));
        assert_relative_eq!(body.crouch_offset, 15.0);
    }

    #[rstest]
    fn arm_hangs_from_the_facing_side(built: (ArcadeWorld, EntityBody)) {
        let (mut world, mut body) = built;
        let anchor = body.arm_anchor(&world, Side::Right).unwrap_or(Vec2::NAN);
        assert_relative_eq!(anchor.x, 100.0 + 12.0 - ARM_OFFSET_X);
        let arm = world.position(body.arm).unwrap_or(Vec2::NAN);
        assert_relative_eq!(arm.x, anchor.x + SIZE.x / 3.0, epsilon = 1e-4);

        body.rebuild_arm_constraint(&mut world, Side::Left);
        let left = body.arm_anchor(&world, Side::Left).unwrap_or(Vec2::NAN);
        let arm = world.position(body.arm).unwrap_or(Vec2::NAN);
        assert_relative_eq!(arm.x, left.x + SIZE.x / 3.0, epsilon = 1e-4);
    }

    #[rstest]
    fn despawn_removes_everything(built: (ArcadeWorld, EntityBody)) {
        let (mut world, body) = built;
        body.despawn(&mut world);
        assert_eq!(world.body_count(), 0);
        assert!(body.id_array.iter().all(|id| !world.contains(*id)));
    }
}
