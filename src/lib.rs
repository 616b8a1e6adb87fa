#![cfg_attr(docsrs, feature(doc_cfg))]
//! Core of a 2D side-scrolling run-and-gun shooter.
//!
//! The crate turns rigid-body simulation output into platformer movement,
//! aims and fires weapons, resolves hits and follows the action with a
//! dead-zone camera. The physics engine, the renderer and the input source
//! are collaborators behind [`physics::PhysicsWorld`],
//! [`render::RenderSink`] and [`input::InputEvent`]. [`Env`] ties everything
//! together and [`RunNGunPlugin`] hosts it inside a Bevy app.
pub mod camera;
pub mod combat;
pub mod config;
pub mod constants;
pub mod entity;
pub mod env;
pub mod error;
pub mod input;
pub mod level;
pub mod logging;
pub mod particles;
pub mod physics;
pub mod plugin;
pub mod random;
pub mod render;
pub mod schedule;
pub mod vector_math;

pub use camera::Camera;
pub use combat::{Shot, ShotId, TriggerOutcome, Weapon};
pub use config::GameConfig;
pub use entity::{Entity, EntityId, Side};
pub use env::Env;
pub use error::{ConfigError, LevelError};
pub use level::LevelDescription;
pub use logging::init as init_logging;
pub use plugin::{GameInput, GameSetupError, RunNGunPlugin};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use runngun::prelude::*;
    //! ```

    pub use crate::config::{GameConfig, WeaponSpec};
    pub use crate::entity::{EnemyBehaviour, EntityId, Side};
    pub use crate::input::InputEvent;
    pub use crate::level::LevelDescription;
    pub use crate::physics::arcade::ArcadeWorld;
    pub use crate::physics::PhysicsWorld;
    pub use crate::Env;
    pub use crate::RunNGunPlugin;
}
