//! Typed game configuration.
//!
//! Every tunable the core reads lives in one of these structs. All of them
//! deserialise with `#[serde(default)]`, so a configuration file only needs
//! to name the values it overrides.
use std::f32::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{
    AIR_FORCE, AIR_FRICTION, CROUCH_AIR_FRICTION_DIVISOR, ENTITY_MASS, ENTITY_RESTITUTION,
    FRAMERATE, FRICTION, GRAVITY_SCALE, GROUND_FORCE, HIT_PARTICLE_COUNT,
    HIT_PARTICLE_LIFETIME_MS, JUMP_FORCE, MAX_HEALTH, MAX_JUMPS, MAX_SPEED, PARTICLE_GRAVITY,
    PARTICLE_MAX_SPEED, PARTICLE_RADIUS, SAFE_ZONE_RATIO, SECOND_JUMP_COEFF, SHOT_BOUNDS_MARGIN,
    SLOW_MOTION_DURATION_MS, SLOW_MOTION_FACTOR, STATIC_FRICTION, STOPPING_FRICTION,
    WALL_JUMP_PUSH,
};
use crate::error::ConfigError;
use crate::physics::CollisionFilter;

/// Map size and world-wide physics settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Map width in world units.
    pub map_width: f32,
    /// Map height in world units; entities below it are dead.
    pub map_height: f32,
    /// World units per level tile.
    pub units_per_tile: f32,
    /// How far left of the map a shot may travel before it is culled.
    pub shot_bounds_margin: f32,
    /// Downward force per unit of mass applied every physics step.
    pub gravity_scale: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            map_width: 3200.0,
            map_height: 1280.0,
            units_per_tile: 32.0,
            shot_bounds_margin: SHOT_BOUNDS_MARGIN,
            gravity_scale: GRAVITY_SCALE,
        }
    }
}

/// Movement tuning shared by every entity archetype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTuning {
    /// Speed above which `move` is refused and damping kicks in.
    pub max_speed: f32,
    /// Horizontal force while grounded.
    pub ground_force: f32,
    /// Horizontal force while airborne.
    pub air_force: f32,
    /// Upward force of the first jump.
    pub jump_force: f32,
    /// Multiplier applied to the second jump.
    pub second_jump_coeff: f32,
    /// Wall-jump push, as a multiple of `ground_force`.
    pub wall_jump_push: f32,
    /// Jumps allowed before landing again.
    pub max_jumps: u8,
    /// Body mass.
    pub mass: f32,
    /// Velocity multiplier applied when grounded and idle or over speed.
    pub stopping_friction: f32,
    /// Surface friction of the body.
    pub friction: f32,
    /// Static friction of the body.
    pub static_friction: f32,
    /// Air friction while standing.
    pub air_friction: f32,
    /// Air friction is divided by this while crouched.
    pub crouch_air_friction_divisor: f32,
    /// Bounciness of the body.
    pub restitution: f32,
    /// Starting and maximum health.
    pub max_health: f32,
}

impl Default for EntityTuning {
    fn default() -> Self {
        Self {
            max_speed: MAX_SPEED,
            ground_force: GROUND_FORCE,
            air_force: AIR_FORCE,
            jump_force: JUMP_FORCE,
            second_jump_coeff: SECOND_JUMP_COEFF,
            wall_jump_push: WALL_JUMP_PUSH,
            max_jumps: MAX_JUMPS,
            mass: ENTITY_MASS,
            stopping_friction: STOPPING_FRICTION,
            friction: FRICTION,
            static_friction: STATIC_FRICTION,
            air_friction: AIR_FRICTION,
            crouch_air_friction_divisor: CROUCH_AIR_FRICTION_DIVISOR,
            restitution: ENTITY_RESTITUTION,
            max_health: MAX_HEALTH,
        }
    }
}

/// Screen size and dead-zone settings of the camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Screen width in world units.
    pub screen_width: f32,
    /// Screen height in world units.
    pub screen_height: f32,
    /// Width of the horizontal safe zone as a fraction of the screen width.
    pub safe_zone_ratio: f32,
    /// Height of the vertical safe zone as a fraction of the screen height.
    pub vertical_safe_zone_ratio: f32,
    /// Whether the camera follows the focus horizontally.
    pub follow_x: bool,
    /// Whether the camera follows the focus vertically.
    pub follow_y: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            screen_width: 1280.0,
            screen_height: 720.0,
            safe_zone_ratio: SAFE_ZONE_RATIO,
            vertical_safe_zone_ratio: 2.0 / 3.0,
            follow_x: true,
            follow_y: false,
        }
    }
}

/// Collision filters per body kind, passed into body construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Entity torso, head, legs and sensor.
    pub body: CollisionFilter,
    /// Entity arm.
    pub arm: CollisionFilter,
    /// Projectiles.
    pub shot: CollisionFilter,
    /// Level geometry.
    pub wall: CollisionFilter,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        // Arms carry their own group and a category no other kind accepts, so
        // they never touch the body they hang from.
        let shared_mask = 0x01_0001;
        Self {
            body: CollisionFilter {
                category: 0x0010,
                mask: shared_mask,
                group: 1,
            },
            arm: CollisionFilter {
                category: 0x0011,
                mask: shared_mask,
                group: 2,
            },
            shot: CollisionFilter {
                category: 0x0010,
                mask: shared_mask,
                group: 1,
            },
            wall: CollisionFilter {
                category: 0x0010,
                mask: shared_mask,
                group: 1,
            },
        }
    }
}

/// Key codes bound to each player action.
///
/// Key codes follow the DOM `KeyboardEvent.code` naming, e.g. `KeyD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybinds {
    /// Run right.
    pub move_forward: String,
    /// Run left.
    pub move_backward: String,
    /// Jump or double jump.
    pub jump: String,
    /// Crouch while held.
    pub crouch: String,
    /// Reload the weapon.
    pub reload: String,
    /// Toggle slow motion.
    pub slow_motion: String,
    /// Aim at the nearest entity and fire once.
    pub auto_shoot: String,
}

impl Default for Keybinds {
    fn default() -> Self {
        Self {
            move_forward: "KeyD".to_owned(),
            move_backward: "KeyA".to_owned(),
            jump: "Space".to_owned(),
            crouch: "KeyS".to_owned(),
            reload: "KeyR".to_owned(),
            slow_motion: "KeyF".to_owned(),
            auto_shoot: "KeyE".to_owned(),
        }
    }
}

/// Static description of a weapon model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponSpec {
    /// Display name.
    pub name: String,
    /// Shots per second.
    pub fire_rate: f32,
    /// Total angular spread in radians.
    pub spread: f32,
    /// Projectiles per trigger pull, used for recoil.
    pub shots_per_trigger: f32,
    /// Projectile speed in world units per tick.
    pub speed: f32,
    /// Damage per hit.
    pub damage: f32,
    /// Magazine capacity.
    pub max_ammo: u32,
    /// Projectile length in tiles times three.
    pub ammo_size: f32,
    /// Reload duration in milliseconds.
    pub reload_time_ms: f32,
    /// Maximum travel distance; `None` means unlimited.
    pub range: Option<f32>,
}

impl WeaponSpec {
    /// Assault rifle preset.
    #[must_use]
    pub fn assault_rifle() -> Self {
        Self {
            name: "AR".to_owned(),
            fire_rate: 5.0,
            spread: PI / 20.0,
            shots_per_trigger: 1.0,
            speed: 30.0,
            damage: 20.0,
            max_ammo: 10,
            ammo_size: 2.0,
            reload_time_ms: 800.0,
            range: None,
        }
    }

    /// Submachine gun preset.
    #[must_use]
    pub fn smg() -> Self {
        Self {
            name: "SMG".to_owned(),
            fire_rate: 10.0,
            spread: PI / 10.0,
            shots_per_trigger: 1.0,
            speed: 50.0,
            damage: 15.0,
            max_ammo: 30,
            ammo_size: 1.0,
            reload_time_ms: 750.0,
            range: Some(900.0),
        }
    }

    /// Cooldown between two shots in milliseconds.
    #[must_use]
    pub fn cooldown_ms(&self) -> f32 {
        1000.0 / self.fire_rate
    }

    /// Force magnitude pushed back onto the shooter per shot.
    #[must_use]
    pub fn recoil(&self) -> f32 {
        self.damage * self.shots_per_trigger / crate::constants::RECOIL_DIVISOR
    }
}

impl Default for WeaponSpec {
    fn default() -> Self {
        Self::assault_rifle()
    }
}

/// Slow-motion effect settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlowMotionConfig {
    /// Timescale while the effect is active.
    pub factor: f32,
    /// Effect duration in game milliseconds.
    pub duration_ms: f32,
}

impl Default for SlowMotionConfig {
    fn default() -> Self {
        Self {
            factor: SLOW_MOTION_FACTOR,
            duration_ms: SLOW_MOTION_DURATION_MS,
        }
    }
}

/// Hit-particle burst settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Particles per burst.
    pub count: usize,
    /// Burst lifetime in milliseconds.
    pub lifetime_ms: f32,
    /// Upper bound of the initial particle speed.
    pub max_speed: f32,
    /// Downward speed gained per tick.
    pub gravity: f32,
    /// Drawn radius.
    pub radius: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: HIT_PARTICLE_COUNT,
            lifetime_ms: HIT_PARTICLE_LIFETIME_MS,
            max_speed: PARTICLE_MAX_SPEED,
            gravity: PARTICLE_GRAVITY,
            radius: PARTICLE_RADIUS,
        }
    }
}

/// Complete game configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Simulation ticks per second.
    pub framerate: f32,
    /// Map and world physics.
    pub world: WorldConfig,
    /// Entity movement tuning.
    pub entity: EntityTuning,
    /// Camera settings.
    pub camera: CameraConfig,
    /// Collision filters.
    pub collision: CollisionConfig,
    /// Key bindings.
    pub keybinds: Keybinds,
    /// Weapon handed to the player.
    pub player_weapon: WeaponSpec,
    /// Slow-motion effect.
    pub slow_motion: SlowMotionConfig,
    /// Hit particles.
    pub particles: ParticleConfig,
    /// Seed of the deterministic RNG.
    pub rng_seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            framerate: FRAMERATE,
            world: WorldConfig::default(),
            entity: EntityTuning::default(),
            camera: CameraConfig::default(),
            collision: CollisionConfig::default(),
            keybinds: Keybinds::default(),
            player_weapon: WeaponSpec::default(),
            slow_motion: SlowMotionConfig::default(),
            particles: ParticleConfig::default(),
            rng_seed: 0x5eed_f00d,
        }
    }
}

impl GameConfig {
    /// Parses a configuration from JSON text and validates it.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    ///
    /// # Examples
    /// ```
    /// use runngun::config::GameConfig;
    /// let cfg = GameConfig::from_json_str(r#"{ "framerate": 30 }"#).unwrap_or_default();
    /// assert_eq!(cfg.framerate, 30.0);
    /// assert_eq!(cfg.player_weapon.name, "AR");
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Read`] when the file cannot be read, otherwise
    /// the same errors as [`GameConfig::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Length of one tick in milliseconds at timescale 1.
    #[must_use]
    pub fn tick_ms(&self) -> f32 {
        1000.0 / self.framerate
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("framerate", self.framerate),
            ("world.units_per_tile", self.world.units_per_tile),
            ("entity.mass", self.entity.mass),
            ("player_weapon.fire_rate", self.player_weapon.fire_rate),
            ("slow_motion.factor", self.slow_motion.factor),
            ("camera.screen_width", self.camera.screen_width),
            ("camera.screen_height", self.camera.screen_height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a positive finite number, got {value}"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.entity.stopping_friction) {
            return Err(ConfigError::Invalid {
                field: "entity.stopping_friction",
                reason: format!(
                    "must lie in [0, 1], got {}",
                    self.entity.stopping_friction
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = GameConfig::from_json_str("{}").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_fields() {
        let cfg = GameConfig::from_json_str(
            r#"{ "camera": { "follow_y": true }, "player_weapon": { "name": "SMG", "max_ammo": 30 } }"#,
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert!(cfg.camera.follow_y);
        assert!(cfg.camera.follow_x);
        assert_eq!(cfg.player_weapon.max_ammo, 30);
        assert_eq!(cfg.player_weapon.reload_time_ms, 800.0);
    }

    #[rstest]
    #[case::zero_framerate(r#"{ "framerate": 0 }"#, "framerate")]
    #[case::negative_mass(r#"{ "entity": { "mass": -1 } }"#, "entity.mass")]
    #[case::friction_above_one(
        r#"{ "entity": { "stopping_friction": 1.5 } }"#,
        "entity.stopping_friction"
    )]
    fn rejects_out_of_range_values(#[case] text: &str, #[case] expected: &str) {
        match GameConfig::from_json_str(text) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
            other => panic!("expected invalid `{expected}`, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_json_str("{ framerate"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let path = Path::new("definitely/not/here.json");
        assert!(matches!(
            GameConfig::load(path),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn weapon_presets_derive_timings() {
        let ar = WeaponSpec::assault_rifle();
        assert!((ar.cooldown_ms() - 200.0).abs() < 1e-4);
        assert!((ar.recoil() - 20.0 / 175.0).abs() < 1e-6);
        assert_eq!(WeaponSpec::smg().range, Some(900.0));
    }
}
