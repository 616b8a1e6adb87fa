//! Shot lifetime: culling at the map edge, range limits and owner immunity.

use approx::assert_relative_eq;
use glam::Vec2;
use runngun::combat::{ShotId, ShotOrder};
use runngun::config::{GameConfig, WeaponSpec};
use runngun::entity::EntityId;
use runngun::{Env, Shot};
use test_utils::{arena, entity, settle};

fn loose_shot(env: &mut Env, origin: Vec2, angle: f32, spec: &WeaponSpec) -> Shot {
    let order = ShotOrder {
        id: ShotId(1),
        owner: EntityId(99),
        origin,
        angle,
    };
    let config = env.config().clone();
    Shot::spawn(
        env.world_mut(),
        order,
        spec,
        config.world.units_per_tile,
        config.collision.shot,
    )
}

#[test]
fn shots_leaving_the_map_are_destroyed_on_the_next_update() {
    let mut env = Env::arcade(GameConfig::default());
    let width = env.config().world.map_width;
    let shot = loose_shot(
        &mut env,
        Vec2::new(width - 5.0, 600.0),
        0.0,
        &WeaponSpec::assault_rifle(),
    );
    let body = shot.body;
    env.add_shot(shot);
    assert!(env.world().contains(body));

    env.tick();
    assert!(env.shots().is_empty());
    assert!(!env.world().contains(body));
}

#[test]
fn shots_inside_the_map_keep_flying() {
    let mut env = Env::arcade(GameConfig::default());
    let shot = loose_shot(
        &mut env,
        Vec2::new(100.0, 600.0),
        0.0,
        &WeaponSpec::assault_rifle(),
    );
    env.add_shot(shot);
    settle(&mut env, 3);
    let position = env.shots().first().map(|s| s.position);
    let x = position.map_or(0.0, |p| p.x);
    assert_relative_eq!(x, 190.0, epsilon = 1e-3);
}

#[test]
fn limited_range_shots_expire() {
    let mut env = Env::arcade(GameConfig::default());
    let spec = WeaponSpec::smg();
    let shot = loose_shot(&mut env, Vec2::new(100.0, 600.0), 0.0, &spec);
    env.add_shot(shot);
    // 900 units at 50 per tick, well inside the map.
    settle(&mut env, 17);
    assert_eq!(env.shots().len(), 1);
    settle(&mut env, 3);
    assert!(env.shots().is_empty());
}

#[test]
fn firing_never_damages_the_shooter() {
    let mut arena = arena();
    settle(&mut arena.env, 30);
    // Aim straight down through the shooter's own legs.
    let below = entity(&arena.env, arena.player).position + Vec2::new(0.0, 200.0);
    arena.env.look_at(arena.player, below);
    arena.env.single_shoot(arena.player);
    settle(&mut arena.env, 10);
    assert_relative_eq!(entity(&arena.env, arena.player).health(), 100.0);
    assert!(arena.env.shots().is_empty(), "the floor swallowed the shot");
}
