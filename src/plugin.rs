//! Bevy plugin hosting the world.
//!
//! [`RunNGunPlugin`] loads the configuration and the level, inserts the
//! [`Env`] and a [`DrawList`] as resources and runs one tick followed by one
//! render pass every `Update`. An [`Env`] inserted beforehand is kept. Host
//! input reaches the world through the [`GameInput`] observer event. Setup
//! failures fall back to defaults and are reported as [`GameSetupError`]
//! events.

use std::path::PathBuf;

use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::error;
use thiserror::Error;

use crate::config::GameConfig;
use crate::env::Env;
use crate::input::InputEvent;
use crate::level::LevelDescription;
use crate::render::DrawList;

/// Input delivered by the host.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct GameInput(pub InputEvent);

/// Setup step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    /// Reading the game configuration.
    Config,
    /// Reading the level.
    Level,
}

/// Event raised when setup falls back to defaults.
#[derive(Event, Debug, Clone, Error)]
#[error("{stage:?}: {detail}")]
pub struct GameSetupError {
    /// Step that failed.
    pub stage: SetupStage,
    /// Description of the underlying error.
    pub detail: String,
}

impl GameSetupError {
    /// Builds an error event for `stage`.
    #[must_use]
    pub fn new(stage: SetupStage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            detail: detail.into(),
        }
    }
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_setup_error(event: On<GameSetupError>) {
    let GameSetupError { stage, detail } = event.event();
    error!("setup failed while loading {stage:?}, using defaults: {detail}");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn forward_input(event: On<GameInput>, mut env: ResMut<Env>) {
    env.handle_input(&event.event().0);
}

fn tick_env(mut env: ResMut<Env>) {
    env.tick();
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
fn render_env(env: Res<Env>, mut draw: ResMut<DrawList>) {
    env.render(&mut *draw);
}

/// Plugin installing the world and its per-frame systems.
#[derive(Debug, Clone, Default)]
pub struct RunNGunPlugin {
    /// JSON configuration; defaults when absent.
    pub config_path: Option<PathBuf>,
    /// JSON level; the built-in arena when absent.
    pub level_path: Option<PathBuf>,
}

impl RunNGunPlugin {
    fn load_env(&self, app: &mut App) -> Env {
        let config = match self.config_path.as_deref().map(GameConfig::load).transpose() {
            Ok(config) => config.unwrap_or_default(),
            Err(e) => {
                app.world_mut()
                    .trigger(GameSetupError::new(SetupStage::Config, e.to_string()));
                GameConfig::default()
            }
        };
        let level = match self
            .level_path
            .as_deref()
            .map(LevelDescription::load)
            .transpose()
        {
            Ok(level) => level.unwrap_or_default(),
            Err(e) => {
                app.world_mut()
                    .trigger(GameSetupError::new(SetupStage::Level, e.to_string()));
                LevelDescription::arena()
            }
        };
        let mut env = Env::arcade(config);
        env.load_level(&level);
        env
    }
}

impl Plugin for RunNGunPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_setup_error);
        app.add_observer(forward_input);

        // A host may insert a prepared world before adding the plugin.
        if !app.world().contains_resource::<Env>() {
            let env = self.load_env(app);
            app.insert_resource(env);
        }
        app.init_resource::<DrawList>();
        app.add_systems(Update, (tick_env, render_env).chain());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rstest::rstest;

    #[derive(Resource, Default)]
    struct CapturedErrors(Vec<SetupStage>);

    #[expect(
        clippy::needless_pass_by_value,
        reason = "Observer systems must take On<T> by value."
    )]
    fn record_error(event: On<GameSetupError>, mut errors: ResMut<CapturedErrors>) {
        errors.0.push(event.event().stage);
    }

    #[rstest]
    fn plugin_ticks_and_renders_every_update() {
        let mut app = App::new();
        app.add_plugins(RunNGunPlugin::default());
        app.update();
        app.update();
        let ticks = app.world().resource::<Env>().tick_count();
        assert_eq!(ticks, 2);
        let draw = app.world().resource::<DrawList>();
        assert_eq!(draw.frames(), 2);
        assert!(!draw.commands().is_empty());
    }

    #[rstest]
    fn input_events_reach_the_world() {
        let mut app = App::new();
        app.add_plugins(RunNGunPlugin::default());
        app.world_mut()
            .trigger(GameInput(InputEvent::MouseMove(Vec2::new(12.0, 34.0))));
        let cursor = app.world().resource::<Env>().cursor();
        assert_eq!(cursor, Some(Vec2::new(12.0, 34.0)));
    }

    #[rstest]
    fn prepared_world_is_kept() {
        let mut env = Env::arcade(GameConfig::default());
        env.spawn_player("Ada", Vec2::new(100.0, 100.0), Vec2::new(20.0, 60.0), true);
        let mut app = App::new();
        app.insert_resource(env);
        app.add_plugins(RunNGunPlugin::default());
        let env = app.world().resource::<Env>();
        assert_eq!(env.entities().len(), 1);
        assert!(env.objects().is_empty());
    }

    #[rstest]
    #[case::config(
        RunNGunPlugin { config_path: Some(PathBuf::from("missing/config.json")), level_path: None },
        SetupStage::Config
    )]
    #[case::level(
        RunNGunPlugin { config_path: None, level_path: Some(PathBuf::from("missing/level.json")) },
        SetupStage::Level
    )]
    fn missing_files_fall_back_and_report(
        #[case] plugin: RunNGunPlugin,
        #[case] stage: SetupStage,
    ) {
        let mut app = App::new();
        app.init_resource::<CapturedErrors>();
        app.add_observer(record_error);
        app.add_plugins(plugin);
        assert_eq!(app.world().resource::<CapturedErrors>().0, vec![stage]);
        let env = app.world().resource::<Env>();
        assert_eq!(env.objects().len(), LevelDescription::arena().objects.len());
    }
}
