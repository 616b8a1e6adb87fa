//! Aim and orientation.

use glam::Vec2;

use crate::physics::PhysicsWorld;
use crate::vector_math::angle_to;

use super::Entity;

impl Entity {
    /// Aims at `target`: rotates the arm about its shoulder and flips the
    /// entity when the target is behind it.
    ///
    /// Returns whether a flip happened.
    pub fn look_at(&mut self, world: &mut dyn PhysicsWorld, target: Vec2) -> bool {
        self.aim_angle = angle_to(self.position, target);
        if let Some(anchor) = self.body.arm_anchor(world, self.facing) {
            let target_angle = angle_to(anchor, target);
            let current = world.angle(self.body.arm).unwrap_or(0.0);
            world.rotate(self.body.arm, target_angle - current, anchor);
        }
        if self.aim_angle.cos() * self.facing.sign() < 0.0 {
            self.flip_direction(world);
            return true;
        }
        false
    }

    /// Turns around, re-anchoring the arm on the new facing side.
    pub fn flip_direction(&mut self, world: &mut dyn PhysicsWorld) {
        self.facing = self.facing.flipped();
        world.set_angle(self.body.arm, 0.0);
        self.body.rebuild_arm_constraint(world, self.facing);
        world.set_angle(self.body.arm, self.aim_angle);
        world.set_infinite_inertia(self.body.root);
        world.set_infinite_inertia(self.body.arm);
    }

    /// Horizontal sprite scale matching the facing.
    #[must_use]
    pub const fn sprite_scale_x(&self) -> f32 {
        self.facing.sign()
    }
}
