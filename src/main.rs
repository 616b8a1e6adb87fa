//! Headless runner: loads a configuration and a level, spawns a player and
//! two enemies, then replays a fixed input script through the Bevy plugin.
use std::path::PathBuf;

use anyhow::{Context, Result};
use bevy::prelude::*;
use clap::Parser;
use glam::Vec2;
use log::info;
use runngun::config::Keybinds;
use runngun::entity::EnemyBehaviour;
use runngun::input::InputEvent;
use runngun::{init_logging, Env, GameConfig, GameInput, LevelDescription, RunNGunPlugin};

/// A run-and-gun shooter, played headless from a scripted session
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
    /// JSON game configuration
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// JSON level description; the built-in arena when omitted
    #[arg(short, long)]
    level: Option<PathBuf>,
    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u32,
}

fn script(keys: &Keybinds) -> Vec<(u32, InputEvent)> {
    let down = |code: &String| InputEvent::KeyDown(code.clone());
    let up = |code: &String| InputEvent::KeyUp(code.clone());
    vec![
        (0, InputEvent::MouseMove(Vec2::new(1200.0, 600.0))),
        (0, down(&keys.move_forward)),
        (45, down(&keys.jump)),
        (46, up(&keys.jump)),
        (60, down(&keys.jump)),
        (61, up(&keys.jump)),
        (120, up(&keys.move_forward)),
        (120, InputEvent::MouseDown),
        (180, InputEvent::MouseUp),
        (200, down(&keys.slow_motion)),
        (201, up(&keys.slow_motion)),
        (240, down(&keys.crouch)),
        (260, up(&keys.crouch)),
        (300, down(&keys.auto_shoot)),
        (301, up(&keys.auto_shoot)),
        (360, down(&keys.reload)),
        (361, up(&keys.reload)),
    ]
}

fn prepare(args: &Args) -> Result<Env> {
    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    let level = match &args.level {
        Some(path) => LevelDescription::load(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => LevelDescription::arena(),
    };
    let mut env = Env::arcade(config);
    env.load_level(&level);
    let size = Vec2::new(24.0, 72.0);
    env.spawn_player("Player", Vec2::new(200.0, 1000.0), size, true);
    env.spawn_enemy("Sentry", Vec2::new(900.0, 1000.0), size, EnemyBehaviour::Watch);
    env.spawn_enemy("Dummy", Vec2::new(1400.0, 1000.0), size, EnemyBehaviour::Idle);
    Ok(env)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let env = prepare(&args)?;
    let script = script(&env.config().keybinds);
    let mut app = App::new();
    app.insert_resource(env);
    app.add_plugins(RunNGunPlugin::default());

    for tick in 0..args.ticks {
        for (_, event) in script.iter().filter(|(at, _)| *at == tick) {
            app.world_mut().trigger(GameInput(event.clone()));
        }
        app.update();
    }

    let env = app.world().resource::<Env>();
    for entity in env.entities() {
        info!(
            "{}: health {:.0}, alive {}, at ({:.0}, {:.0})",
            entity.name,
            entity.health(),
            entity.is_alive(),
            entity.position.x,
            entity.position.y
        );
    }
    info!(
        "{} ticks, {} shots in flight, camera at {:.0}",
        env.tick_count(),
        env.shots().len(),
        env.camera().position.x
    );
    Ok(())
}
