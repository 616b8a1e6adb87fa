//! Small deterministic physics engine implementing [`PhysicsWorld`].
//!
//! Bodies are treated as their bounding boxes. Dynamic compounds receive
//! gravity, integrate accumulated forces and are pushed out of static
//! geometry; pinned bodies follow their constraint anchor; shots move only
//! when translated. Collision-start events are produced by diffing the set
//! of overlapping leaf pairs between steps.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::{
    Aabb, BodyDesc, BodyId, BodyLabel, BodyOptions, CollisionFilter, CollisionStart,
    CompoundDesc, CompoundHandle, ConstraintDesc, ConstraintId, Overlap, PhysicsWorld, Shape,
};
use crate::vector_math::rotate_about;

/// Penetration left in place when resolving resting contacts, so sensors
/// keep reporting the surface they rest on.
pub const CONTACT_SLOP: f32 = 0.5;

const CIRCLE_SEGMENTS: u8 = 12;

#[derive(Debug, Clone)]
struct ArcadeBody {
    parent: Option<BodyId>,
    parts: Vec<BodyId>,
    position: Vec2,
    offset: Vec2,
    velocity: Vec2,
    force: Vec2,
    angle: f32,
    shape: Option<Shape>,
    label: BodyLabel,
    mass: f32,
    is_static: bool,
    is_sensor: bool,
    filter: CollisionFilter,
    air_friction: f32,
    infinite_inertia: bool,
}

impl ArcadeBody {
    fn from_options(options: &BodyOptions, position: Vec2, shape: Option<Shape>) -> Self {
        Self {
            parent: None,
            parts: Vec::new(),
            position,
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
            force: Vec2::ZERO,
            angle: options.angle,
            shape,
            label: options.label,
            mass: options.mass.unwrap_or(1.0).max(f32::EPSILON),
            is_static: options.is_static,
            is_sensor: options.is_sensor,
            filter: options.filter,
            air_friction: options.air_friction,
            infinite_inertia: options.infinite_inertia,
        }
    }
}

/// Deterministic axis-aligned physics world.
#[derive(Debug, Clone)]
pub struct ArcadeWorld {
    bodies: BTreeMap<BodyId, ArcadeBody>,
    constraints: BTreeMap<ConstraintId, ConstraintDesc>,
    touching: BTreeSet<(BodyId, BodyId)>,
    pending_starts: Vec<CollisionStart>,
    gravity_scale: f32,
    base_delta_ms: f32,
    next_body: u64,
    next_constraint: u64,
}

impl ArcadeWorld {
    /// Creates an empty world.
    ///
    /// `gravity_scale` is the downward force per unit of mass applied each
    /// step and `base_delta_ms` the step length at which velocities are
    /// expressed.
    #[must_use]
    pub fn new(gravity_scale: f32, base_delta_ms: f32) -> Self {
        Self {
            bodies: BTreeMap::new(),
            constraints: BTreeMap::new(),
            touching: BTreeSet::new(),
            pending_starts: Vec::new(),
            gravity_scale,
            base_delta_ms: base_delta_ms.max(f32::EPSILON),
            next_body: 1,
            next_constraint: 1,
        }
    }

    fn allocate_body(&mut self) -> BodyId {
        let id = BodyId(self.next_body);
        self.next_body += 1;
        id
    }

    fn root_of(&self, body: BodyId) -> BodyId {
        self.bodies
            .get(&body)
            .and_then(|b| b.parent)
            .unwrap_or(body)
    }

    fn world_position(&self, body: &ArcadeBody) -> Vec2 {
        body.parent
            .and_then(|p| self.bodies.get(&p))
            .map_or(body.position, |parent| parent.position + body.offset)
    }

    fn leaf_vertices(&self, body: &ArcadeBody) -> Vec<Vec2> {
        let centre = self.world_position(body);
        match body.shape {
            Some(Shape::Rect { width, height }) => {
                let half = Vec2::new(width, height) * 0.5;
                [
                    Vec2::new(-half.x, -half.y),
                    Vec2::new(half.x, -half.y),
                    Vec2::new(half.x, half.y),
                    Vec2::new(-half.x, half.y),
                ]
                .into_iter()
                .map(|corner| rotate_about(centre + corner, centre, body.angle))
                .collect()
            }
            Some(Shape::Circle { radius }) => (0..CIRCLE_SEGMENTS)
                .map(|i| {
                    let theta =
                        std::f32::consts::TAU * f32::from(i) / f32::from(CIRCLE_SEGMENTS);
                    centre + Vec2::from_angle(theta) * radius
                })
                .collect(),
            None => Vec::new(),
        }
    }

    fn leaf_bounds(&self, body: &ArcadeBody) -> Option<Aabb> {
        match body.shape {
            Some(Shape::Circle { radius }) => Some(Aabb::from_centre(
                self.world_position(body),
                Vec2::splat(radius * 2.0),
            )),
            Some(Shape::Rect { .. }) => Aabb::from_points(&self.leaf_vertices(body)),
            None => None,
        }
    }

    fn leaves_of(&self, body: BodyId) -> Vec<BodyId> {
        match self.bodies.get(&body) {
            Some(b) if b.parts.is_empty() => vec![body],
            Some(b) => b.parts.clone(),
            None => Vec::new(),
        }
    }

    fn union_bounds<I>(&self, leaves: I) -> Option<Aabb>
    where
        I: IntoIterator<Item = BodyId>,
    {
        leaves
            .into_iter()
            .filter_map(|id| self.bodies.get(&id).and_then(|b| self.leaf_bounds(b)))
            .reduce(|acc, b| acc.union(&b))
    }

    fn solid_bounds(&self, root: BodyId) -> Option<Aabb> {
        let leaves = self
            .leaves_of(root)
            .into_iter()
            .filter(|id| self.bodies.get(id).is_some_and(|b| !b.is_sensor));
        self.union_bounds(leaves)
    }

    fn pinned(&self) -> BTreeSet<BodyId> {
        self.constraints.values().map(|c| c.body_b).collect()
    }

    fn is_free_dynamic(body: &ArcadeBody, pinned: &BTreeSet<BodyId>, id: BodyId) -> bool {
        body.parent.is_none() && !body.is_static && !pinned.contains(&id)
    }

    fn integrate(&mut self, delta_ms: f32, pinned: &BTreeSet<BodyId>) {
        let time_scale = delta_ms / self.base_delta_ms;
        let gravity = self.gravity_scale;
        let base = self.base_delta_ms;
        for (id, body) in &mut self.bodies {
            if !Self::is_free_dynamic(body, pinned, *id) {
                body.force = Vec2::ZERO;
                continue;
            }
            if body.label != BodyLabel::Shot {
                body.force.y += body.mass * gravity;
                body.velocity *= (1.0 - body.air_friction * time_scale).max(0.0);
                body.velocity += body.force / body.mass * delta_ms * base;
                body.position += body.velocity * time_scale;
            }
            body.force = Vec2::ZERO;
        }
    }

    fn resolve_static_contacts(
        &mut self,
        pinned: &BTreeSet<BodyId>,
        previous: &BTreeMap<BodyId, Aabb>,
    ) {
        let statics: Vec<(Aabb, CollisionFilter)> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.is_static && b.parent.is_none())
            .filter_map(|(id, b)| self.solid_bounds(*id).map(|bounds| (bounds, b.filter)))
            .collect();
        let movers: Vec<BodyId> = self
            .bodies
            .iter()
            .filter(|(id, b)| {
                Self::is_free_dynamic(b, pinned, **id) && b.label != BodyLabel::Shot && !b.is_sensor
            })
            .map(|(id, _)| *id)
            .collect();

        for id in movers {
            for (wall, wall_filter) in &statics {
                let Some(filter) = self.bodies.get(&id).map(|b| b.filter) else {
                    continue;
                };
                if !filter.can_collide(wall_filter) {
                    continue;
                }
                let Some(bounds) = self.solid_bounds(id) else {
                    continue;
                };
                let pen = bounds.penetration(wall);
                if pen.x <= CONTACT_SLOP || pen.y <= CONTACT_SLOP {
                    continue;
                }
                let vertical = previous.get(&id).map_or(pen.y <= pen.x, |before| {
                    let was = before.penetration(wall);
                    if was.y <= CONTACT_SLOP {
                        true
                    } else if was.x <= CONTACT_SLOP {
                        false
                    } else {
                        pen.y <= pen.x
                    }
                });
                let away = bounds.centre() - wall.centre();
                if let Some(body) = self.bodies.get_mut(&id) {
                    if vertical {
                        let push = (pen.y - CONTACT_SLOP).copysign(away.y);
                        body.position.y += push;
                        if body.velocity.y * push < 0.0 {
                            body.velocity.y = 0.0;
                        }
                    } else {
                        let push = (pen.x - CONTACT_SLOP).copysign(away.x);
                        body.position.x += push;
                        if body.velocity.x * push < 0.0 {
                            body.velocity.x = 0.0;
                        }
                    }
                }
            }
        }
    }

    fn solve_constraints(&mut self) {
        let constraints: Vec<ConstraintDesc> = self.constraints.values().copied().collect();
        for c in constraints {
            let Some((anchor, velocity)) = self
                .bodies
                .get(&c.body_a)
                .map(|a| (a.position + c.point_a, a.velocity))
            else {
                continue;
            };
            if let Some(b) = self.bodies.get_mut(&c.body_b) {
                b.position = anchor - Vec2::from_angle(b.angle).rotate(c.point_b);
                b.velocity = velocity;
            }
        }
    }

    fn detect_collision_starts(&mut self) {
        let leaves: Vec<(BodyId, BodyId, BodyLabel, CollisionFilter, bool, Aabb)> = self
            .bodies
            .iter()
            .filter(|(_, b)| b.shape.is_some())
            .filter_map(|(id, b)| {
                let root = self.root_of(*id);
                let root_static = self.bodies.get(&root).is_some_and(|r| r.is_static);
                let filter = self.bodies.get(&root).map_or(b.filter, |r| {
                    if b.parent.is_some() {
                        r.filter
                    } else {
                        b.filter
                    }
                });
                self.leaf_bounds(b)
                    .map(|bounds| (*id, root, b.label, filter, root_static, bounds))
            })
            .collect();

        let mut now = BTreeSet::new();
        for (i, a) in leaves.iter().enumerate() {
            for b in leaves.iter().skip(i + 1) {
                if a.1 == b.1 || (a.4 && b.4) || !a.3.can_collide(&b.3) {
                    continue;
                }
                if a.5.overlap(&b.5).is_none() {
                    continue;
                }
                let key = (a.0, b.0);
                if !self.touching.contains(&key) {
                    self.pending_starts.push(CollisionStart {
                        body_a: a.0,
                        label_a: a.2,
                        body_b: b.0,
                        label_b: b.2,
                    });
                }
                now.insert(key);
            }
        }
        self.touching = now;
    }
}

impl Default for ArcadeWorld {
    fn default() -> Self {
        Self::new(
            crate::constants::GRAVITY_SCALE,
            1000.0 / crate::constants::FRAMERATE,
        )
    }
}

impl PhysicsWorld for ArcadeWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = self.allocate_body();
        let body = ArcadeBody::from_options(&desc.options, desc.position, Some(desc.shape));
        self.bodies.insert(id, body);
        id
    }

    fn add_compound(&mut self, desc: CompoundDesc) -> CompoundHandle {
        let root = self.allocate_body();
        let mut parts = Vec::with_capacity(desc.parts.len());
        for part in &desc.parts {
            let id = self.allocate_body();
            let mut options = desc.options.clone();
            options.label = part.label;
            options.is_sensor = part.is_sensor;
            let mut body = ArcadeBody::from_options(&options, desc.position, Some(part.shape));
            body.parent = Some(root);
            body.offset = part.offset;
            self.bodies.insert(id, body);
            parts.push(id);
        }
        let mut root_body = ArcadeBody::from_options(&desc.options, desc.position, None);
        root_body.parts.clone_from(&parts);
        self.bodies.insert(root, root_body);
        CompoundHandle { root, parts }
    }

    fn remove_body(&mut self, body: BodyId) -> bool {
        let root = self.root_of(body);
        let Some(removed) = self.bodies.remove(&root) else {
            return false;
        };
        let mut gone: BTreeSet<BodyId> = removed.parts.iter().copied().collect();
        gone.insert(root);
        for part in &removed.parts {
            self.bodies.remove(part);
        }
        self.constraints
            .retain(|_, c| !gone.contains(&c.body_a) && !gone.contains(&c.body_b));
        self.touching
            .retain(|(a, b)| !gone.contains(a) && !gone.contains(b));
        true
    }

    fn add_constraint(&mut self, desc: ConstraintDesc) -> ConstraintId {
        let id = ConstraintId(self.next_constraint);
        self.next_constraint += 1;
        self.constraints.insert(id, desc);
        self.solve_constraints();
        id
    }

    fn remove_constraint(&mut self, constraint: ConstraintId) -> bool {
        self.constraints.remove(&constraint).is_some()
    }

    fn contains(&self, body: BodyId) -> bool {
        self.bodies.contains_key(&body)
    }

    fn position(&self, body: BodyId) -> Option<Vec2> {
        self.bodies.get(&body).map(|b| self.world_position(b))
    }

    fn velocity(&self, body: BodyId) -> Option<Vec2> {
        let root = self.root_of(body);
        self.bodies.get(&root).map(|b| b.velocity)
    }

    fn set_velocity(&mut self, body: BodyId, velocity: Vec2) {
        let root = self.root_of(body);
        if let Some(b) = self.bodies.get_mut(&root) {
            b.velocity = velocity;
        }
    }

    fn apply_force(&mut self, body: BodyId, _at: Vec2, force: Vec2) {
        let root = self.root_of(body);
        if let Some(b) = self.bodies.get_mut(&root) {
            b.force += force;
        }
    }

    fn translate(&mut self, body: BodyId, delta: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            if b.parent.is_some() {
                b.offset += delta;
            } else {
                b.position += delta;
            }
        }
    }

    fn rotate(&mut self, body: BodyId, delta: f32, pivot: Vec2) {
        if let Some(b) = self.bodies.get_mut(&body) {
            if b.parent.is_none() {
                b.position = rotate_about(b.position, pivot, delta);
                b.angle += delta;
            }
        }
    }

    fn angle(&self, body: BodyId) -> Option<f32> {
        self.bodies.get(&body).map(|b| b.angle)
    }

    fn set_angle(&mut self, body: BodyId, angle: f32) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.angle = angle;
            self.solve_constraints();
        }
    }

    fn set_infinite_inertia(&mut self, body: BodyId) {
        if let Some(b) = self.bodies.get_mut(&body) {
            b.infinite_inertia = true;
        }
    }

    fn set_air_friction(&mut self, body: BodyId, air_friction: f32) {
        let root = self.root_of(body);
        if let Some(b) = self.bodies.get_mut(&root) {
            b.air_friction = air_friction;
        }
    }

    fn air_friction(&self, body: BodyId) -> Option<f32> {
        let root = self.root_of(body);
        self.bodies.get(&root).map(|b| b.air_friction)
    }

    fn vertices(&self, body: BodyId) -> Vec<Vec2> {
        self.bodies
            .get(&body)
            .map(|b| self.leaf_vertices(b))
            .unwrap_or_default()
    }

    fn shape(&self, body: BodyId) -> Option<Shape> {
        self.bodies.get(&body).and_then(|b| b.shape)
    }

    fn label(&self, body: BodyId) -> Option<BodyLabel> {
        self.bodies.get(&body).map(|b| b.label)
    }

    fn bounds(&self, body: BodyId) -> Option<Aabb> {
        self.union_bounds(self.leaves_of(body))
    }

    fn parts(&self, body: BodyId) -> Vec<BodyId> {
        self.leaves_of(body)
    }

    fn query_overlap(&self, a: BodyId, b: BodyId) -> Option<Overlap> {
        let first = self.bounds(a)?;
        let second = self.bounds(b)?;
        first.overlap(&second)
    }

    fn step(&mut self, delta_ms: f32) {
        let pinned = self.pinned();
        let previous: BTreeMap<BodyId, Aabb> = self
            .bodies
            .iter()
            .filter(|(id, b)| Self::is_free_dynamic(b, &pinned, **id))
            .filter_map(|(id, _)| self.solid_bounds(*id).map(|bounds| (*id, bounds)))
            .collect();
        self.integrate(delta_ms, &pinned);
        self.resolve_static_contacts(&pinned, &previous);
        self.solve_constraints();
        self.detect_collision_starts();
    }

    fn drain_collision_starts(&mut self) -> Vec<CollisionStart> {
        std::mem::take(&mut self.pending_starts)
    }

    fn body_count(&self) -> usize {
        self.bodies.values().filter(|b| b.parent.is_none()).count()
    }
}
