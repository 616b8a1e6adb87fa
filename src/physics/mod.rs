//! Physics collaborator boundary.
//!
//! The game core never resolves contacts itself. It builds bodies through
//! [`PhysicsWorld`], nudges them with forces and velocity writes, and reads
//! back positions, overlap queries and collision-start events. Any engine
//! able to honour this trait can host the game; [`arcade::ArcadeWorld`] is
//! the small deterministic engine shipped with the crate.

pub mod arcade;

use glam::Vec2;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

/// Identifier of a body or body part inside a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u64);

/// Identifier of a constraint inside a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstraintId(pub u64);

/// Semantic label used to dispatch collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyLabel {
    /// Static level geometry.
    Wall,
    /// A projectile.
    Shot,
    /// Rectangular entity part (torso, legs, sensor, arm).
    PlayerRect,
    /// Circular entity part (head).
    PlayerCircle,
    /// Root of an entity's composite body.
    ComposedBody,
}

impl BodyLabel {
    /// Whether the label belongs to an entity part that can be hit.
    #[must_use]
    pub const fn is_entity_part(self) -> bool {
        matches!(
            self,
            Self::PlayerRect | Self::PlayerCircle | Self::ComposedBody
        )
    }
}

/// Geometric shape of a leaf body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned (before rotation) rectangle.
    Rect {
        /// Extent along the local x axis.
        width: f32,
        /// Extent along the local y axis.
        height: f32,
    },
    /// Circle.
    Circle {
        /// Circle radius.
        radius: f32,
    },
}

/// Category/mask/group triple deciding which bodies may touch.
///
/// Two bodies sharing a non-zero group always collide when the group is
/// positive and never when it is negative. Otherwise each body's mask must
/// include the other's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionFilter {
    /// Category bit of the body.
    pub category: u32,
    /// Categories the body accepts contacts from.
    pub mask: u32,
    /// Group override, 0 for none.
    pub group: i32,
}

impl CollisionFilter {
    /// Returns whether bodies with these filters may interact.
    ///
    /// # Examples
    /// ```
    /// use runngun::physics::CollisionFilter;
    /// let a = CollisionFilter { category: 0b01, mask: 0b10, group: 0 };
    /// let b = CollisionFilter { category: 0b10, mask: 0b01, group: 0 };
    /// assert!(a.can_collide(&b));
    /// assert!(!a.can_collide(&a));
    /// ```
    #[must_use]
    pub const fn can_collide(&self, other: &Self) -> bool {
        if self.group == other.group && self.group != 0 {
            return self.group > 0;
        }
        (self.mask & other.category) != 0 && (other.mask & self.category) != 0
    }
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category: 1,
            mask: u32::MAX,
            group: 0,
        }
    }
}

/// Typed body options understood by the physics collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyOptions {
    /// Label used for collision dispatch.
    pub label: BodyLabel,
    /// Surface friction.
    pub friction: f32,
    /// Static friction.
    pub friction_static: f32,
    /// Velocity damping applied every step.
    pub air_friction: f32,
    /// Bounciness.
    pub restitution: f32,
    /// Body mass; engines pick a default when absent.
    pub mass: Option<f32>,
    /// Static bodies never move.
    pub is_static: bool,
    /// Sensors report overlaps without physical response.
    pub is_sensor: bool,
    /// Collision filter.
    pub filter: CollisionFilter,
    /// Pins rotational inertia to infinity so the body never spins.
    pub infinite_inertia: bool,
    /// Initial rotation in radians.
    pub angle: f32,
}

impl BodyOptions {
    /// Options for a body with the given label and engine defaults elsewhere.
    #[must_use]
    pub fn labelled(label: BodyLabel) -> Self {
        Self {
            label,
            friction: 0.1,
            friction_static: 0.5,
            air_friction: 0.01,
            restitution: 0.0,
            mass: None,
            is_static: false,
            is_sensor: false,
            filter: CollisionFilter::default(),
            infinite_inertia: false,
            angle: 0.0,
        }
    }
}

/// Description of a single leaf body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDesc {
    /// World position of the body centre.
    pub position: Vec2,
    /// Body geometry.
    pub shape: Shape,
    /// Physical options.
    pub options: BodyOptions,
}

/// One part of a compound body, positioned relative to the compound origin.
#[derive(Debug, Clone, PartialEq)]
pub struct PartDesc {
    /// Offset of the part centre from the compound origin.
    pub offset: Vec2,
    /// Part geometry.
    pub shape: Shape,
    /// Label reported for collisions on this part.
    pub label: BodyLabel,
    /// Whether the part is a sensor.
    pub is_sensor: bool,
}

/// Description of a compound body made of rigidly attached parts.
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundDesc {
    /// World position of the compound origin.
    pub position: Vec2,
    /// Rigidly attached parts.
    pub parts: Vec<PartDesc>,
    /// Options shared by the compound.
    pub options: BodyOptions,
}

/// Handles returned when a compound is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundHandle {
    /// The compound root.
    pub root: BodyId,
    /// Part identifiers, in the order they were described.
    pub parts: Vec<BodyId>,
}

/// Zero-length pin joining a point on `body_a` to a point on `body_b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintDesc {
    /// Anchor body.
    pub body_a: BodyId,
    /// Attachment point in `body_a` space.
    pub point_a: Vec2,
    /// Attached body.
    pub body_b: BodyId,
    /// Attachment point in `body_b` space, rotated with the body.
    pub point_b: Vec2,
    /// Stiffness in `[0, 1]`.
    pub stiffness: f32,
    /// Rest length.
    pub length: f32,
}

/// Axis along which a shape-overlap query found the minimum separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlapAxis {
    /// Separation is vertical: the shapes touch top to bottom.
    Vertical,
    /// Separation is horizontal: the shapes touch side to side.
    Horizontal,
}

/// Result of a positive shape-overlap query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlap {
    /// Axis of minimum penetration.
    pub axis: OverlapAxis,
    /// Penetration depth along `axis`.
    pub depth: f32,
}

/// Pair of leaf bodies that started touching during the last step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionStart {
    /// First body of the pair.
    pub body_a: BodyId,
    /// Label of the first body.
    pub label_a: BodyLabel,
    /// Second body of the pair.
    pub body_b: BodyId,
    /// Label of the second body.
    pub label_b: BodyLabel,
}

impl CollisionStart {
    /// Returns `(matching, other)` when one side carries `label`.
    #[must_use]
    pub fn split_by(
        &self,
        label: BodyLabel,
    ) -> Option<((BodyId, BodyLabel), (BodyId, BodyLabel))> {
        if self.label_a == label {
            Some(((self.body_a, self.label_a), (self.body_b, self.label_b)))
        } else if self.label_b == label {
            Some(((self.body_b, self.label_b), (self.body_a, self.label_a)))
        } else {
            None
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Aabb {
    /// Box centred on `centre` with the given size.
    #[must_use]
    pub fn from_centre(centre: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: centre - half,
            max: centre + half,
        }
    }

    /// Smallest box containing every point.
    #[must_use]
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let (min, max) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
        Some(Self { min, max })
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box centre.
    #[must_use]
    pub fn centre(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Penetration depth along each axis; non-positive means separated.
    #[must_use]
    pub fn penetration(&self, other: &Self) -> Vec2 {
        let lo = self.min.max(other.min);
        let hi = self.max.min(other.max);
        hi - lo
    }

    /// Separating-axis test between two boxes.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use runngun::physics::{Aabb, OverlapAxis};
    /// let floor = Aabb { min: Vec2::new(0.0, 10.0), max: Vec2::new(100.0, 20.0) };
    /// let feet = Aabb { min: Vec2::new(40.0, 8.0), max: Vec2::new(60.0, 12.0) };
    /// assert_eq!(feet.overlap(&floor).map(|o| o.axis), Some(OverlapAxis::Vertical));
    /// ```
    #[must_use]
    pub fn overlap(&self, other: &Self) -> Option<Overlap> {
        let pen = self.penetration(other);
        if pen.x <= 0.0 || pen.y <= 0.0 {
            return None;
        }
        Some(if pen.y <= pen.x {
            Overlap {
                axis: OverlapAxis::Vertical,
                depth: pen.y,
            }
        } else {
            Overlap {
                axis: OverlapAxis::Horizontal,
                depth: pen.x,
            }
        })
    }
}

/// Capabilities the game core consumes from a rigid-body engine.
///
/// Every accessor tolerates unknown identifiers: reads return `None` or an
/// empty collection and writes are ignored.
#[cfg_attr(test, automock)]
pub trait PhysicsWorld: Send + Sync {
    /// Adds a single leaf body.
    fn add_body(&mut self, desc: BodyDesc) -> BodyId;
    /// Adds a compound body and returns its root and part identifiers.
    fn add_compound(&mut self, desc: CompoundDesc) -> CompoundHandle;
    /// Removes a body, its parts and any constraint touching it.
    fn remove_body(&mut self, body: BodyId) -> bool;
    /// Adds a constraint.
    fn add_constraint(&mut self, desc: ConstraintDesc) -> ConstraintId;
    /// Removes a constraint.
    fn remove_constraint(&mut self, constraint: ConstraintId) -> bool;
    /// Whether the body (or part) exists.
    fn contains(&self, body: BodyId) -> bool;
    /// World position of a body or part centre.
    fn position(&self, body: BodyId) -> Option<Vec2>;
    /// Velocity of a body, in world units per step.
    fn velocity(&self, body: BodyId) -> Option<Vec2>;
    /// Overwrites a body's velocity.
    fn set_velocity(&mut self, body: BodyId, velocity: Vec2);
    /// Accumulates a force for the next step.
    fn apply_force(&mut self, body: BodyId, at: Vec2, force: Vec2);
    /// Moves a body, or a part relative to its compound.
    fn translate(&mut self, body: BodyId, delta: Vec2);
    /// Rotates a body by `delta` radians around `pivot`.
    fn rotate(&mut self, body: BodyId, delta: f32, pivot: Vec2);
    /// Current rotation of a body.
    fn angle(&self, body: BodyId) -> Option<f32>;
    /// Sets the rotation of a body about its centre.
    fn set_angle(&mut self, body: BodyId, angle: f32);
    /// Pins rotational inertia to infinity.
    fn set_infinite_inertia(&mut self, body: BodyId);
    /// Sets per-step velocity damping.
    fn set_air_friction(&mut self, body: BodyId, air_friction: f32);
    /// Current per-step velocity damping.
    fn air_friction(&self, body: BodyId) -> Option<f32>;
    /// World-space vertices of a leaf body, clockwise from top-left.
    fn vertices(&self, body: BodyId) -> Vec<Vec2>;
    /// Shape of a leaf body.
    fn shape(&self, body: BodyId) -> Option<Shape>;
    /// Label of a body or part.
    fn label(&self, body: BodyId) -> Option<BodyLabel>;
    /// Bounding box of a body (all parts for a compound).
    fn bounds(&self, body: BodyId) -> Option<Aabb>;
    /// Leaf parts of a compound, or the body itself for a leaf.
    fn parts(&self, body: BodyId) -> Vec<BodyId>;
    /// Low-level shape-overlap query between two bodies.
    fn query_overlap(&self, a: BodyId, b: BodyId) -> Option<Overlap>;
    /// Advances the simulation by `delta_ms` milliseconds.
    fn step(&mut self, delta_ms: f32);
    /// Takes the collision-start events produced by the last steps.
    fn drain_collision_starts(&mut self) -> Vec<CollisionStart>;
    /// Number of root bodies in the world.
    fn body_count(&self) -> usize;

    /// Speed of a body, in world units per step.
    fn speed(&self, body: BodyId) -> Option<f32> {
        self.velocity(body).map(Vec2::length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::same_positive_group(
        CollisionFilter { category: 1, mask: 0, group: 3 },
        CollisionFilter { category: 2, mask: 0, group: 3 },
        true
    )]
    #[case::same_negative_group(
        CollisionFilter { category: 1, mask: 3, group: -1 },
        CollisionFilter { category: 2, mask: 3, group: -1 },
        false
    )]
    #[case::one_sided_mask(
        CollisionFilter { category: 1, mask: 2, group: 0 },
        CollisionFilter { category: 2, mask: 4, group: 0 },
        false
    )]
    fn filter_rules(
        #[case] a: CollisionFilter,
        #[case] b: CollisionFilter,
        #[case] expected: bool,
    ) {
        assert_eq!(a.can_collide(&b), expected);
        assert_eq!(b.can_collide(&a), expected);
    }

    #[test]
    fn side_contact_is_horizontal() {
        let wall = Aabb::from_centre(Vec2::new(100.0, 0.0), Vec2::new(20.0, 200.0));
        let body = Aabb::from_centre(Vec2::new(85.0, 0.0), Vec2::new(12.0, 4.0));
        let overlap = body.overlap(&wall);
        assert_eq!(overlap.map(|o| o.axis), Some(OverlapAxis::Horizontal));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Aabb::from_centre(Vec2::ZERO, Vec2::splat(2.0));
        let b = Aabb::from_centre(Vec2::new(2.0, 0.0), Vec2::splat(2.0));
        assert!(a.overlap(&b).is_none());
    }

    #[test]
    fn split_by_finds_either_side() {
        let event = CollisionStart {
            body_a: BodyId(1),
            label_a: BodyLabel::Wall,
            body_b: BodyId(2),
            label_b: BodyLabel::Shot,
        };
        let (shot, other) = event.split_by(BodyLabel::Shot).unwrap_or_else(|| panic!("shot side"));
        assert_eq!(shot.0, BodyId(2));
        assert_eq!(other.1, BodyLabel::Wall);
        assert!(event.split_by(BodyLabel::PlayerCircle).is_none());
    }
}
