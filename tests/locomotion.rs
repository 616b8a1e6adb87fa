//! Jumping and crouching through a recording physics world.

use approx::assert_relative_eq;
use glam::Vec2;
use runngun::config::{CollisionConfig, EntityTuning};
use runngun::entity::{Archetype, Entity, EntityBody, EntityId};
use runngun::physics::arcade::ArcadeWorld;
use test_utils::{RecordingWorld, ENTITY_SIZE};

fn grounded() -> (RecordingWorld<ArcadeWorld>, Entity) {
    let mut world = RecordingWorld::new(ArcadeWorld::default());
    let tuning = EntityTuning::default();
    let centre = Vec2::new(100.0, 100.0);
    let body = EntityBody::build(
        &mut world,
        centre,
        ENTITY_SIZE,
        &tuning,
        &CollisionConfig::default(),
    );
    let entity = Entity::new(
        EntityId(1),
        "Ada",
        centre,
        ENTITY_SIZE,
        body,
        tuning,
        Archetype::Player {
            camera_focus: false,
        },
    );
    (world, entity)
}

#[test]
fn second_jump_is_weaker_and_third_is_refused() {
    let (mut world, mut entity) = grounded();
    let tuning = entity.tuning.clone();

    assert!(entity.jump(&mut world));
    entity.on_air = true;
    assert!(entity.jump(&mut world));
    assert_eq!(entity.locomotion.jumps, 2);
    let before = world.writes().len();
    assert!(!entity.jump(&mut world));
    assert_eq!(world.writes().len(), before, "refused jump writes nothing");

    let forces = world.forces();
    assert_eq!(forces.len(), 2);
    let first = forces.first().copied().unwrap_or_default();
    let second = forces.get(1).copied().unwrap_or_default();
    assert_relative_eq!(first.y, -tuning.jump_force);
    assert_relative_eq!(second.y, -tuning.jump_force * tuning.second_jump_coeff);
    assert_relative_eq!(second.y / first.y, 0.8);
}

#[test]
fn crouching_twice_is_refused() {
    let (mut world, mut entity) = grounded();
    assert!(entity.crouch(&mut world));
    assert!(!entity.crouch(&mut world));
    assert!(entity.is_crouch);
    assert!(entity.uncrouch(&mut world));
    assert!(!entity.is_crouch);
}
