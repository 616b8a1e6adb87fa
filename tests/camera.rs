//! Dead-zone camera behaviour seen from the public API.

use approx::assert_relative_eq;
use glam::Vec2;
use runngun::camera::Camera;
use runngun::config::{CameraConfig, GameConfig};
use runngun::{Env, LevelDescription};
use test_utils::{entity, settle, ENTITY_SIZE};

#[test]
fn overshoot_moves_the_camera_by_exactly_that_much() {
    let config = CameraConfig::default();
    let mut camera = Camera::new(&config);
    let zone = camera.safe_zone();
    assert_relative_eq!(zone.x2 - config.screen_width / 2.0, config.screen_width / 10.0);

    camera.update(Some(Vec2::new(zone.x2 + 3.0, 300.0)));
    assert_relative_eq!(camera.position.x, 3.0);
    assert_relative_eq!(camera.position.x + zone.x2, zone.x2 + 3.0);
}

#[test]
fn focus_inside_the_window_keeps_the_camera_still() {
    let mut camera = Camera::new(&CameraConfig::default());
    let zone = camera.safe_zone();
    camera.update(Some(Vec2::new((zone.x1 + zone.x2) / 2.0, 0.0)));
    camera.update(None);
    assert_eq!(camera.position, Vec2::ZERO);
}

#[test]
fn camera_catches_up_with_a_distant_player() {
    let mut env = Env::arcade(GameConfig::default());
    env.load_level(&LevelDescription::arena());
    let player = env.spawn_player("Ada", Vec2::new(1500.0, 1088.0), ENTITY_SIZE, true);
    env.tick();
    let x = entity(&env, player).position.x;
    let camera = env.camera();
    assert!(camera.position.x > 0.0);
    assert_relative_eq!(camera.position.x + camera.safe_zone().x2, x, epsilon = 1e-3);

    settle(&mut env, 10);
    let x = entity(&env, player).position.x;
    let camera = env.camera();
    let zone = camera.safe_zone();
    assert!(camera.position.x + zone.x1 <= x && x <= camera.position.x + zone.x2 + 1e-3);
}
