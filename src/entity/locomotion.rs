//! Locomotion state machine: run, jump, double jump, wall slide, crouch.
//!
//! Forces are applied to the compound root. The body never tips over, so
//! grounded damping replaces surface friction.

use glam::Vec2;

use crate::physics::PhysicsWorld;

use super::{ContactReport, Entity, Side};

/// Which wall the entity slides on, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallSide {
    /// Wall on the left.
    Left,
    /// Wall on the right.
    Right,
    /// Just wall-jumped; movement is locked until the next update.
    Jump,
    /// No wall contact.
    #[default]
    NoCollision,
}

impl From<Side> for WallSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Self::Left,
            Side::Right => Self::Right,
        }
    }
}

/// Jump counter and wall-slide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocomotionState {
    /// Jumps performed since the last landing.
    pub jumps: u8,
    /// Sliding down a wall while pushing into it.
    pub wall_slide: bool,
    /// Side of the wall being slid on.
    pub wall_side: WallSide,
}

impl Entity {
    /// Pushes the entity towards `side`.
    ///
    /// Refused above the speed cap and right after a wall jump. Returns
    /// whether a force was applied.
    pub fn move_side(&mut self, world: &mut dyn PhysicsWorld, side: Side) -> bool {
        let speed = world.speed(self.body.root).unwrap_or(0.0);
        if speed > self.tuning.max_speed || self.locomotion.wall_side == WallSide::Jump {
            return false;
        }
        let force = if self.on_air {
            self.tuning.air_force
        } else {
            self.tuning.ground_force
        };
        world.apply_force(
            self.body.root,
            self.position,
            Vec2::new(side.sign() * force, 0.0),
        );
        self.is_moving = true;
        true
    }

    /// Jumps when grounded or when an air jump remains.
    ///
    /// The second jump is weaker. Jumping off a wall adds a push away from
    /// it and locks movement until the next update. Vertical velocity is
    /// cleared first so every jump reaches the same height.
    pub fn jump(&mut self, world: &mut dyn PhysicsWorld) -> bool {
        // Landing zeroes the counter, so a grounded entity always passes.
        // Checking the counter alone also caps repeated jumps within one tick.
        let jumps = self.locomotion.jumps;
        if jumps >= self.tuning.max_jumps {
            return false;
        }
        let force = if jumps == 1 {
            self.tuning.second_jump_coeff * self.tuning.jump_force
        } else {
            self.tuning.jump_force
        };
        let push = self.tuning.ground_force * self.tuning.wall_jump_push;
        let x = match (self.locomotion.wall_slide, self.locomotion.wall_side) {
            (true, WallSide::Left) => push,
            (true, WallSide::Right) => -push,
            _ => 0.0,
        };
        if x != 0.0 {
            self.locomotion.wall_side = WallSide::Jump;
        }
        let velocity = world.velocity(self.body.root).unwrap_or(Vec2::ZERO);
        world.set_velocity(self.body.root, Vec2::new(velocity.x, 0.0));
        world.apply_force(self.body.root, self.position, Vec2::new(x, -force));
        self.locomotion.jumps += 1;
        true
    }

    /// Pulls the legs up. No-op when already crouched.
    pub fn crouch(&mut self, world: &mut dyn PhysicsWorld) -> bool {
        if self.is_crouch {
            return false;
        }
        self.shift_legs(world, -self.body.crouch_offset);
        world.set_air_friction(
            self.body.root,
            self.tuning.air_friction / self.tuning.crouch_air_friction_divisor,
        );
        self.is_crouch = true;
        true
    }

    /// Restores the legs. No-op when standing.
    pub fn uncrouch(&mut self, world: &mut dyn PhysicsWorld) -> bool {
        if !self.is_crouch {
            return false;
        }
        self.shift_legs(world, self.body.crouch_offset);
        world.set_air_friction(self.body.root, self.tuning.air_friction);
        self.is_crouch = false;
        true
    }

    // The sensor hangs from the legs, so it follows them.
    fn shift_legs(&self, world: &mut dyn PhysicsWorld, dy: f32) {
        let delta = Vec2::new(0.0, dy);
        world.translate(self.body.legs, delta);
        world.translate(self.body.sensor, delta);
    }

    /// Folds this tick's contact report into the state machine.
    pub fn apply_contacts(&mut self, report: ContactReport) {
        self.on_air = !report.grounded;
        if report.grounded {
            self.locomotion.jumps = 0;
            self.locomotion.wall_side = WallSide::NoCollision;
        }
        if let Some(side) = report.wall {
            self.locomotion.wall_side = side.into();
        }
        self.locomotion.wall_slide = report.wall_contact() && self.is_moving;
        if self.locomotion.wall_slide {
            self.locomotion.jumps = 1;
        } else {
            self.locomotion.wall_side = WallSide::NoCollision;
        }
    }

    /// Grounded damping, then clears the per-tick move intent.
    pub fn damp(&mut self, world: &mut dyn PhysicsWorld) {
        let speed = world.speed(self.body.root).unwrap_or(0.0);
        if (!self.is_moving || speed > self.tuning.max_speed) && !self.on_air {
            if let Some(velocity) = world.velocity(self.body.root) {
                world.set_velocity(self.body.root, velocity * self.tuning.stopping_friction);
            }
        }
        self.is_moving = false;
    }
}
