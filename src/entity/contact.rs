//! Collision classifier: ground and wall contact from overlap queries.
//!
//! The sensor is tested against every world object each tick. A
//! vertical-axis overlap proves ground; a horizontal-axis overlap is a wall
//! on the side where the object sits. Entities are airborne unless some
//! query proves otherwise.

use crate::physics::{BodyId, OverlapAxis, PhysicsWorld};

use super::Side;

/// Contact state derived for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContactReport {
    /// At least one object overlaps the sensor along the vertical axis.
    pub grounded: bool,
    /// Side of a wall touching the sensor while the entity falls.
    pub wall: Option<Side>,
}

impl ContactReport {
    /// Whether a wall contact was reported.
    #[must_use]
    pub const fn wall_contact(&self) -> bool {
        self.wall.is_some()
    }
}

/// Classifies the contacts of `sensor` against `objects`.
///
/// Objects whose body no longer exists are skipped. Wall contact is only
/// reported while `vertical_velocity` is positive, i.e. while falling.
pub fn classify(
    world: &dyn PhysicsWorld,
    sensor: BodyId,
    objects: &[BodyId],
    vertical_velocity: f32,
) -> ContactReport {
    let mut report = ContactReport::default();
    if !world.contains(sensor) {
        return report;
    }
    let sensor_x = world.position(sensor).map_or(0.0, |p| p.x);
    for &object in objects {
        if !world.contains(object) {
            continue;
        }
        let Some(overlap) = world.query_overlap(object, sensor) else {
            continue;
        };
        match overlap.axis {
            OverlapAxis::Vertical => report.grounded = true,
            OverlapAxis::Horizontal if vertical_velocity > 0.0 => {
                let object_x = world.position(object).map_or(sensor_x, |p| p.x);
                report.wall = Some(if object_x < sensor_x {
                    Side::Left
                } else {
                    Side::Right
                });
            }
            OverlapAxis::Horizontal => {}
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{MockPhysicsWorld, Overlap};
    use glam::Vec2;
    use mockall::predicate::eq;
    use rstest::rstest;

    const SENSOR: BodyId = BodyId(10);
    const FLOOR: BodyId = BodyId(1);
    const WALL: BodyId = BodyId(2);

    fn world_with(overlaps: Vec<(BodyId, Option<OverlapAxis>, f32)>) -> MockPhysicsWorld {
        let mut world = MockPhysicsWorld::new();
        world.expect_contains().return_const(true);
        world
            .expect_position()
            .with(eq(SENSOR))
            .return_const(Some(Vec2::new(100.0, 0.0)));
        for (object, axis, x) in overlaps {
            world
                .expect_position()
                .with(eq(object))
                .return_const(Some(Vec2::new(x, 0.0)));
            world
                .expect_query_overlap()
                .with(eq(object), eq(SENSOR))
                .return_const(axis.map(|axis| Overlap { axis, depth: 1.0 }));
        }
        world
    }

    #[rstest]
    fn airborne_without_any_overlap() {
        let world = world_with(vec![(FLOOR, None, 100.0)]);
        let report = classify(&world, SENSOR, &[FLOOR], 1.0);
        assert_eq!(report, ContactReport::default());
    }

    #[rstest]
    fn vertical_overlap_is_ground() {
        let world = world_with(vec![(FLOOR, Some(OverlapAxis::Vertical), 100.0)]);
        let report = classify(&world, SENSOR, &[FLOOR], 0.0);
        assert!(report.grounded);
        assert!(!report.wall_contact());
    }

    #[rstest]
    #[case::wall_on_left(40.0, Side::Left)]
    #[case::wall_on_right(160.0, Side::Right)]
    fn horizontal_overlap_while_falling_is_wall(#[case] wall_x: f32, #[case] side: Side) {
        let world = world_with(vec![(WALL, Some(OverlapAxis::Horizontal), wall_x)]);
        let report = classify(&world, SENSOR, &[WALL], 2.0);
        assert!(!report.grounded);
        assert_eq!(report.wall, Some(side));
    }

    #[rstest]
    fn rising_entities_do_not_grab_walls() {
        let world = world_with(vec![(WALL, Some(OverlapAxis::Horizontal), 40.0)]);
        let report = classify(&world, SENSOR, &[WALL], -3.0);
        assert!(!report.wall_contact());
    }

    #[rstest]
    fn ground_and_wall_can_coexist() {
        let world = world_with(vec![
            (FLOOR, Some(OverlapAxis::Vertical), 100.0),
            (WALL, Some(OverlapAxis::Horizontal), 160.0),
        ]);
        let report = classify(&world, SENSOR, &[FLOOR, WALL], 0.5);
        assert!(report.grounded);
        assert_eq!(report.wall, Some(Side::Right));
    }

    #[rstest]
    fn missing_objects_are_skipped() {
        let mut world = MockPhysicsWorld::new();
        world.expect_contains().with(eq(SENSOR)).return_const(true);
        world.expect_contains().with(eq(FLOOR)).return_const(false);
        world.expect_position().return_const(Some(Vec2::ZERO));
        world.expect_query_overlap().never();
        let report = classify(&world, SENSOR, &[FLOOR], 1.0);
        assert!(!report.grounded);
    }
}
