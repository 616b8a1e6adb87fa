//! Gameplay tuning constants used across systems.
//!
//! Forces and velocities follow the physics collaborator's conventions:
//! velocities are world units per step and forces are integrated over the
//! squared step duration in milliseconds.

/// Speed above which `move` is refused and grounded damping always applies.
pub const MAX_SPEED: f32 = 12.0;
/// Multiplier applied to the jump force on the second jump.
pub const SECOND_JUMP_COEFF: f32 = 0.8;
/// Number of jumps available before landing again.
pub const MAX_JUMPS: u8 = 2;
/// Horizontal force applied per tick while running on the ground.
pub const GROUND_FORCE: f32 = 0.04;
/// Horizontal force applied per tick while steering in the air.
pub const AIR_FORCE: f32 = 0.01;
/// Upward force applied by a full-strength jump.
pub const JUMP_FORCE: f32 = 0.3;
/// Multiplier of [`GROUND_FORCE`] used for the wall-jump push.
pub const WALL_JUMP_PUSH: f32 = 4.0;
/// Mass of an entity's composite body.
pub const ENTITY_MASS: f32 = 5.0;
/// Velocity multiplier applied each grounded tick without movement intent.
pub const STOPPING_FRICTION: f32 = 0.70;
/// Surface friction of entity bodies.
pub const FRICTION: f32 = 0.01;
/// Static friction of entity bodies.
pub const STATIC_FRICTION: f32 = 0.25;
/// Air friction of entity bodies while standing.
pub const AIR_FRICTION: f32 = 0.01;
/// Divisor applied to [`AIR_FRICTION`] while crouched.
pub const CROUCH_AIR_FRICTION_DIVISOR: f32 = 3.0;
/// Restitution of entity bodies.
pub const ENTITY_RESTITUTION: f32 = 0.14;
/// Horizontal inset of the arm anchor from the torso edge.
pub const ARM_OFFSET_X: f32 = 5.0;
/// Thickness of the arm rectangle.
pub const ARM_HEIGHT: f32 = 10.0;
/// Thickness of the ground sensor strip under the feet.
pub const SENSOR_HEIGHT: f32 = 4.0;
/// Health every entity starts with, also the clamp ceiling.
pub const MAX_HEALTH: f32 = 100.0;
/// Divisor turning damage into recoil magnitude.
pub const RECOIL_DIVISOR: f32 = 175.0;
/// First shot identifier; identifiers grow monotonically from here.
pub const SHOT_ID_PREFIX: u64 = 1000;
/// Thickness of a shot body.
pub const SHOT_THICKNESS: f32 = 6.0;
/// Gravity applied to every dynamic non-shot body, per unit of mass.
pub const GRAVITY_SCALE: f32 = 0.001_95;
/// Default simulation framerate in ticks per second.
pub const FRAMERATE: f32 = 60.0;
/// Timescale applied while slow motion is active.
pub const SLOW_MOTION_FACTOR: f32 = 0.33;
/// Slow motion duration in game milliseconds.
pub const SLOW_MOTION_DURATION_MS: f32 = 600.0;
/// Particles spawned by a single hit.
pub const HIT_PARTICLE_COUNT: usize = 5;
/// Lifetime of a hit-particle burst in milliseconds.
pub const HIT_PARTICLE_LIFETIME_MS: f32 = 200.0;
/// Maximum initial particle speed.
pub const PARTICLE_MAX_SPEED: f32 = 5.0;
/// Downward acceleration added to particles each tick.
pub const PARTICLE_GRAVITY: f32 = 1.0;
/// Radius of a rendered particle.
pub const PARTICLE_RADIUS: f32 = 3.0;
/// How far left of the map a shot may travel before it is discarded.
pub const SHOT_BOUNDS_MARGIN: f32 = 500.0;
/// Fraction of the screen width covered by the horizontal safe zone.
pub const SAFE_ZONE_RATIO: f32 = 0.2;
