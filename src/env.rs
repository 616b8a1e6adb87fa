//! The game world and its per-tick driver.
//!
//! [`Env`] owns every entity, shot, particle and level object together with
//! the physics collaborator, the game clock and the camera. A tick runs in a
//! fixed order:
//!
//! 1. held movement keys push the players;
//! 2. due deferred tasks run (cooldowns, reloads, autofire, effects);
//! 3. the physics world steps by the scaled tick length;
//! 4. collision-start events are dispatched (shot against wall or entity);
//! 5. level objects whose body vanished are dropped;
//! 6. shots advance and spent shots are destroyed;
//! 7. particles move;
//! 8. living entities refresh, aim, classify contacts, damp and check death;
//! 9. the camera follows its focus.
//!
//! Rendering is a separate read-only pass, see [`Env::render`].

use bevy::prelude::Resource;
use glam::Vec2;
use hashbrown::HashMap;
use log::{debug, trace};

use crate::camera::Camera;
use crate::combat::{
    spread_offset, Shot, ShotBounds, ShotId, ShotIds, ShotOrder, TriggerOutcome, Weapon,
};
use crate::config::{GameConfig, WeaponSpec};
use crate::entity::{classify, Archetype, EnemyBehaviour, Entity, EntityBody, EntityId, Side};
use crate::input::{Command, InputEvent, InputState};
use crate::level::LevelDescription;
use crate::particles::Particles;
use crate::physics::arcade::ArcadeWorld;
use crate::physics::{BodyId, BodyLabel, CollisionStart, PhysicsWorld};
use crate::random::SeededRandom;
use crate::render::{debug_lines, draw_entity, draw_text_block, DrawCommand, RenderSink};
use crate::schedule::{Scheduler, Task};
use crate::vector_math::direction;

/// The simulated world.
#[derive(Resource)]
pub struct Env {
    config: GameConfig,
    world: Box<dyn PhysicsWorld>,
    scheduler: Scheduler,
    rng: SeededRandom,
    entities: Vec<Entity>,
    owners: HashMap<BodyId, EntityId>,
    shots: Vec<Shot>,
    shot_ids: ShotIds,
    objects: Vec<BodyId>,
    particles: Particles,
    camera: Camera,
    input: InputState,
    cursor: Option<Vec2>,
    timescale: f32,
    next_entity: u32,
    tick: u64,
    debug_overlay: bool,
}

impl Env {
    /// Creates an empty world around `world`.
    #[must_use]
    pub fn new(config: GameConfig, world: Box<dyn PhysicsWorld>) -> Self {
        Self {
            scheduler: Scheduler::new(),
            rng: SeededRandom::new(config.rng_seed),
            entities: Vec::new(),
            owners: HashMap::new(),
            shots: Vec::new(),
            shot_ids: ShotIds::default(),
            objects: Vec::new(),
            particles: Particles::new(),
            camera: Camera::new(&config.camera),
            input: InputState::new(&config.keybinds),
            cursor: None,
            timescale: 1.0,
            next_entity: 1,
            tick: 0,
            debug_overlay: false,
            world,
            config,
        }
    }

    /// Creates an empty world backed by an [`ArcadeWorld`] tuned from
    /// `config`.
    #[must_use]
    pub fn arcade(config: GameConfig) -> Self {
        let world = ArcadeWorld::new(config.world.gravity_scale, config.tick_ms());
        Self::new(config, Box::new(world))
    }

    /// Builds the level geometry and adopts its map size.
    pub fn load_level(&mut self, level: &LevelDescription) -> Vec<BodyId> {
        let size = level.map_size(&self.config);
        self.config.world.map_width = size.x;
        self.config.world.map_height = size.y;
        let bodies = level.build(self.world.as_mut(), &self.config);
        self.objects.extend(bodies.iter().copied());
        debug!(
            "loaded level {} ({} objects, {}x{})",
            level.name,
            bodies.len(),
            size.x,
            size.y
        );
        bodies
    }

    /// Registers an existing body as level geometry.
    pub fn add_object(&mut self, body: BodyId) {
        self.objects.push(body);
    }

    /// Spawns a player whose box has its top-left corner at `top_left`,
    /// armed with the configured player weapon.
    pub fn spawn_player(
        &mut self,
        name: &str,
        top_left: Vec2,
        size: Vec2,
        camera_focus: bool,
    ) -> EntityId {
        let weapon = Weapon::new(self.config.player_weapon.clone());
        let id = self.spawn(name, top_left, size, Archetype::Player { camera_focus });
        if let Some(entity) = self.entity_mut(id) {
            entity.weapon = Some(weapon);
        }
        id
    }

    /// Spawns an unarmed enemy.
    pub fn spawn_enemy(
        &mut self,
        name: &str,
        top_left: Vec2,
        size: Vec2,
        behaviour: EnemyBehaviour,
    ) -> EntityId {
        self.spawn(name, top_left, size, Archetype::Enemy(behaviour))
    }

    fn spawn(&mut self, name: &str, top_left: Vec2, size: Vec2, archetype: Archetype) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        let centre = top_left + size / 2.0;
        let tuning = self.config.entity.clone();
        let body = EntityBody::build(
            self.world.as_mut(),
            centre,
            size,
            &tuning,
            &self.config.collision,
        );
        self.add_entity(Entity::new(id, name, centre, size, body, tuning, archetype));
        id
    }

    /// Adds an entity whose body already lives in the physics world and
    /// indexes its parts. A focused player becomes the camera focus.
    pub fn add_entity(&mut self, entity: Entity) {
        for body in &entity.body.id_array {
            self.owners.insert(*body, entity.id);
        }
        if matches!(entity.archetype, Archetype::Player { camera_focus: true }) {
            self.camera.set_focus(entity.id);
        }
        self.entities.push(entity);
    }

    /// Removes an entity and destroys its body.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let Some(index) = self.entities.iter().position(|e| e.id == id) else {
            return false;
        };
        let entity = self.entities.remove(index);
        for body in &entity.body.id_array {
            self.owners.remove(body);
        }
        entity.body.despawn(self.world.as_mut());
        if self.camera.focus() == Some(id) {
            self.camera.clear_focus();
        }
        true
    }

    /// Gives `id` a weapon built from `spec`.
    pub fn equip(&mut self, id: EntityId, spec: WeaponSpec) -> bool {
        let Some(entity) = self.entity_mut(id) else {
            return false;
        };
        entity.weapon = Some(Weapon::new(spec));
        true
    }

    /// Entity by identifier.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Mutable entity by identifier.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Every entity, in insertion order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Entity owning `body`.
    #[must_use]
    pub fn owner_of(&self, body: BodyId) -> Option<EntityId> {
        self.owners.get(&body).copied()
    }

    /// Shots in flight.
    #[must_use]
    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    /// Tracks a shot whose body already lives in the physics world.
    pub fn add_shot(&mut self, shot: Shot) {
        self.shots.push(shot);
    }

    /// Forgets a shot and removes its body.
    pub fn remove_shot(&mut self, id: ShotId) -> bool {
        let Some(index) = self.shots.iter().position(|s| s.id == id) else {
            return false;
        };
        let shot = self.shots.remove(index);
        shot.despawn(self.world.as_mut());
        true
    }

    /// Resolves a shot touching an entity part.
    ///
    /// Returns `false` when the part belongs to the shooter or to nobody.
    /// Otherwise the owner takes the shot's damage, the shot is destroyed and
    /// a particle burst appears at the impact point.
    pub fn collision(&mut self, shot_body: BodyId, part: BodyId) -> bool {
        let target = self.owner_of(part);
        let Some(shot) = self.shots.iter().find(|s| s.body == shot_body) else {
            return target.is_some();
        };
        let Some(target) = target else {
            return false;
        };
        if shot.owner == target {
            return false;
        }
        let (shot_id, damage) = (shot.id, shot.damage);
        let impact = self.world.position(shot_body).unwrap_or(shot.position);
        if let Some(entity) = self.entities.iter_mut().find(|e| e.id == target) {
            entity.take_damage(damage);
            debug!("{} hit for {damage}, health {}", entity.name, entity.health());
        }
        self.remove_shot(shot_id);
        let burst = self
            .particles
            .spawn_burst(impact, &self.config.particles, &mut self.rng);
        self.scheduler
            .schedule(self.config.particles.lifetime_ms, Task::ExpireParticles(burst));
        true
    }

    fn act<R>(
        &mut self,
        id: EntityId,
        action: impl FnOnce(&mut Entity, &mut dyn PhysicsWorld) -> R,
    ) -> Option<R> {
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.id == id && e.is_alive())?;
        Some(action(entity, self.world.as_mut()))
    }

    /// Pushes a living entity towards `side`.
    pub fn move_entity(&mut self, id: EntityId, side: Side) -> bool {
        self.act(id, |e, w| e.move_side(w, side)).unwrap_or(false)
    }

    /// Makes a living entity jump.
    pub fn jump(&mut self, id: EntityId) -> bool {
        self.act(id, Entity::jump).unwrap_or(false)
    }

    /// Crouches a living entity.
    pub fn crouch(&mut self, id: EntityId) -> bool {
        self.act(id, Entity::crouch).unwrap_or(false)
    }

    /// Stands a living entity back up.
    pub fn uncrouch(&mut self, id: EntityId) -> bool {
        self.act(id, Entity::uncrouch).unwrap_or(false)
    }

    /// Aims a living entity at `target`; returns whether it turned around.
    pub fn look_at(&mut self, id: EntityId, target: Vec2) -> bool {
        self.act(id, |e, w| e.look_at(w, target)).unwrap_or(false)
    }

    /// Turns a living entity around.
    pub fn flip_direction(&mut self, id: EntityId) -> bool {
        self.act(id, Entity::flip_direction).is_some()
    }

    /// Pulls the trigger of `id`'s weapon and arms autofire.
    pub fn shoot(&mut self, id: EntityId) -> Option<ShotId> {
        self.fire(id, false)
    }

    /// Fires once without leaving autofire armed.
    pub fn single_shoot(&mut self, id: EntityId) -> Option<ShotId> {
        let shot = self.fire(id, false);
        self.stop_shoot(id);
        shot
    }

    /// Releases the trigger, ending the autofire chain.
    pub fn stop_shoot(&mut self, id: EntityId) -> bool {
        self.weapon_mut(id).map(Weapon::stop_shoot).is_some()
    }

    /// Starts reloading; refused while a reload is running.
    pub fn reload(&mut self, id: EntityId) -> bool {
        let Some(weapon) = self.weapon_mut(id) else {
            return false;
        };
        if !weapon.start_reload() {
            return false;
        }
        let delay = weapon.spec().reload_time_ms;
        self.scheduler.schedule(delay, Task::ReloadDone(id));
        true
    }

    fn weapon_mut(&mut self, id: EntityId) -> Option<&mut Weapon> {
        self.entity_mut(id).and_then(|e| e.weapon.as_mut())
    }

    fn fire(&mut self, id: EntityId, auto: bool) -> Option<ShotId> {
        let entity = self
            .entities
            .iter_mut()
            .find(|e| e.id == id && e.is_alive())?;
        let weapon = entity.weapon.as_mut()?;
        match weapon.trigger(auto) {
            TriggerOutcome::Blocked => None,
            TriggerOutcome::Reload => {
                let delay = weapon.spec().reload_time_ms;
                self.scheduler.schedule(delay, Task::ReloadDone(id));
                None
            }
            TriggerOutcome::Fired => {
                let spec = weapon.spec().clone();
                let autofire = weapon.autofire();
                let world = self.world.as_mut();
                let angle = entity.aim_angle;
                let origin = entity.body.arm_tip(world).unwrap_or(entity.position);
                world.apply_force(
                    entity.body.root,
                    entity.position,
                    -direction(angle) * spec.recoil(),
                );
                let order = ShotOrder {
                    id: self.shot_ids.next_id(),
                    owner: id,
                    origin,
                    angle: angle + spread_offset(&mut self.rng, spec.spread),
                };
                let shot = Shot::spawn(
                    world,
                    order,
                    &spec,
                    self.config.world.units_per_tile,
                    self.config.collision.shot,
                );
                let cooldown = spec.cooldown_ms();
                self.scheduler.schedule(cooldown, Task::WeaponReady(id));
                if autofire {
                    self.scheduler.schedule(cooldown, Task::AutoFire(id));
                }
                self.shots.push(shot);
                Some(order.id)
            }
        }
    }

    /// Slows time down for a while. Refused while an effect is running.
    pub fn slow_motion(&mut self) -> bool {
        if self.scheduler.any_pending(|task| *task == Task::RestoreTimescale) {
            return false;
        }
        let effect = &self.config.slow_motion;
        debug!("slow motion x{} for {} ms", effect.factor, effect.duration_ms);
        self.scheduler.schedule(effect.duration_ms, Task::RestoreTimescale);
        self.timescale = effect.factor;
        true
    }

    /// Aims `id` at the head of the nearest other living entity and fires
    /// once.
    pub fn auto_shoot(&mut self, id: EntityId) -> Option<ShotId> {
        let target = self.nearest_entity(id)?;
        let head = self
            .entity(target)
            .and_then(|t| self.world.position(t.body.head))?;
        self.look_at(id, head);
        self.single_shoot(id)
    }

    /// Nearest other living entity.
    #[must_use]
    pub fn nearest_entity(&self, id: EntityId) -> Option<EntityId> {
        let from = self.entity(id)?.position;
        nearest(
            self.entities
                .iter()
                .filter(|e| e.is_alive())
                .map(|e| (e.id, e.position)),
            id,
            from,
        )
        .map(|(other, _)| other)
    }

    /// Feeds a host input event to every living player.
    pub fn handle_input(&mut self, event: &InputEvent) {
        let Some(command) = self.input.handle(event) else {
            return;
        };
        match command {
            Command::Aim(screen) => {
                self.cursor = Some(self.camera.to_world(screen));
                return;
            }
            Command::SlowMotion => {
                self.slow_motion();
                return;
            }
            _ => {}
        }
        for id in self.player_ids() {
            match command {
                Command::Jump => {
                    self.jump(id);
                }
                Command::Crouch => {
                    self.crouch(id);
                }
                Command::Uncrouch => {
                    self.uncrouch(id);
                }
                Command::Reload => {
                    self.reload(id);
                }
                Command::AutoShoot => {
                    self.auto_shoot(id);
                }
                Command::Shoot => {
                    self.shoot(id);
                }
                Command::StopShoot => {
                    self.stop_shoot(id);
                }
                Command::Aim(_) | Command::SlowMotion => {}
            }
        }
    }

    fn player_ids(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.archetype.is_player() && e.is_alive())
            .map(|e| e.id)
            .collect()
    }

    /// Sets the global timescale; non-positive or non-finite values are
    /// ignored.
    pub fn set_timescale(&mut self, timescale: f32) {
        if timescale.is_finite() && timescale > 0.0 {
            self.timescale = timescale;
        }
    }

    /// Current timescale.
    #[must_use]
    pub const fn timescale(&self) -> f32 {
        self.timescale
    }

    /// Ticks simulated so far.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Cursor in world space, once the mouse has moved.
    #[must_use]
    pub const fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Camera.
    #[must_use]
    pub const fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Live particles.
    #[must_use]
    pub const fn particles(&self) -> &Particles {
        &self.particles
    }

    /// Level objects.
    #[must_use]
    pub fn objects(&self) -> &[BodyId] {
        &self.objects
    }

    /// Physics collaborator.
    #[must_use]
    pub fn world(&self) -> &dyn PhysicsWorld {
        self.world.as_ref()
    }

    /// Mutable physics collaborator.
    pub fn world_mut(&mut self) -> &mut dyn PhysicsWorld {
        self.world.as_mut()
    }

    /// Game clock.
    #[must_use]
    pub const fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Active configuration; map size reflects the loaded level.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Shows or hides the player debug text.
    pub fn set_debug_overlay(&mut self, enabled: bool) {
        self.debug_overlay = enabled;
    }

    /// Advances the world by one tick.
    pub fn tick(&mut self) {
        let timescale = self.timescale;
        let delta_ms = self.config.tick_ms() * timescale;

        for side in self.input.held_moves() {
            for id in self.player_ids() {
                self.move_entity(id, side);
            }
        }
        for task in self.scheduler.advance(delta_ms) {
            self.run_task(task);
        }

        self.world.step(delta_ms);
        for event in self.world.drain_collision_starts() {
            self.dispatch_collision(event);
        }

        let world = self.world.as_ref();
        self.objects.retain(|body| world.contains(*body));
        self.update_shots(timescale);
        self.particles
            .update(self.config.particles.gravity, timescale);
        self.update_entities();

        let focus = self
            .camera
            .focus()
            .and_then(|id| self.entity(id))
            .map(|e| e.position);
        self.camera.update(focus);
        self.tick += 1;
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::WeaponReady(id) => match self.weapon_mut(id) {
                Some(weapon) => weapon.cooldown_elapsed(),
                None => trace!("cooldown for missing weapon of {id:?} dropped"),
            },
            Task::ReloadDone(id) => match self.weapon_mut(id) {
                Some(weapon) => weapon.finish_reload(),
                None => trace!("reload for missing weapon of {id:?} dropped"),
            },
            Task::AutoFire(id) => {
                if self.entity(id).is_some() {
                    self.fire(id, true);
                } else {
                    trace!("autofire for missing {id:?} dropped");
                }
            }
            Task::RestoreTimescale => {
                debug!("slow motion over");
                self.timescale = 1.0;
            }
            Task::ExpireParticles(burst) => {
                self.particles.expire(burst);
            }
        }
    }

    fn dispatch_collision(&mut self, event: CollisionStart) {
        let Some(((shot_body, _), (other, label))) = event.split_by(BodyLabel::Shot) else {
            return;
        };
        match label {
            BodyLabel::Wall => {
                if let Some(id) = self.shots.iter().find(|s| s.body == shot_body).map(|s| s.id) {
                    trace!("shot {id:?} hit a wall");
                    self.remove_shot(id);
                }
            }
            BodyLabel::PlayerRect | BodyLabel::PlayerCircle => {
                self.collision(shot_body, other);
            }
            BodyLabel::Shot | BodyLabel::ComposedBody => {}
        }
    }

    fn update_shots(&mut self, timescale: f32) {
        let bounds = ShotBounds::from_world(&self.config.world);
        let world = self.world.as_mut();
        for shot in &mut self.shots {
            shot.advance(world, timescale);
        }
        let (spent, live): (Vec<Shot>, Vec<Shot>) = std::mem::take(&mut self.shots)
            .into_iter()
            .partition(|shot| shot.is_spent(&bounds));
        for shot in spent {
            trace!("shot {:?} left play at {}", shot.id, shot.position);
            shot.despawn(world);
        }
        self.shots = live;
    }

    fn update_entities(&mut self) {
        let cursor = self.cursor;
        let floor = self.config.world.map_height;
        let living: Vec<(EntityId, Vec2)> = self
            .entities
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| (e.id, e.position))
            .collect();
        let world = self.world.as_mut();
        for entity in &mut self.entities {
            if !entity.is_alive() {
                continue;
            }
            if let Some(position) = world.position(entity.body.root) {
                entity.position = position;
            }
            if let Some(velocity) = world.velocity(entity.body.root) {
                entity.velocity = velocity;
            }
            let target = match entity.archetype {
                Archetype::Player { .. } => cursor,
                Archetype::Enemy(EnemyBehaviour::Watch) => {
                    nearest(living.iter().copied(), entity.id, entity.position).map(|(_, p)| p)
                }
                Archetype::Enemy(EnemyBehaviour::Idle) => None,
            };
            if let Some(target) = target {
                entity.look_at(world, target);
            }
            let report = classify(world, entity.body.sensor, &self.objects, entity.velocity.y);
            entity.apply_contacts(report);
            entity.damp(world);
            entity.check_death(floor);
        }
    }

    /// Emits the frame: the camera guide in screen space, then level
    /// objects, shots, particles and entities in world space, then the
    /// optional debug text.
    pub fn render(&self, sink: &mut dyn RenderSink) {
        let world = self.world.as_ref();
        sink.begin_frame();
        sink.draw(DrawCommand::SetOffset(Vec2::ZERO));
        let zone = self.camera.safe_zone();
        let guide_y = self.camera.height - 25.0;
        sink.draw(DrawCommand::Line {
            from: Vec2::new(zone.x1, guide_y),
            to: Vec2::new(zone.x2, guide_y),
        });

        sink.draw(DrawCommand::SetOffset(-self.camera.position));
        for object in &self.objects {
            sink.draw(DrawCommand::Polygon(world.vertices(*object)));
        }
        for shot in &self.shots {
            sink.draw(DrawCommand::Polygon(world.vertices(shot.body)));
        }
        for particle in self.particles.iter() {
            sink.draw(DrawCommand::Circle {
                centre: particle.position,
                radius: particle.radius,
            });
        }
        for entity in &self.entities {
            draw_entity(entity, world, sink);
        }

        if self.debug_overlay {
            sink.draw(DrawCommand::SetOffset(Vec2::ZERO));
            for player in self.entities.iter().filter(|e| e.archetype.is_player()) {
                draw_text_block(debug_lines(player, world), sink);
            }
        }
        sink.end_frame();
    }
}

fn nearest(
    candidates: impl Iterator<Item = (EntityId, Vec2)>,
    exclude: EntityId,
    from: Vec2,
) -> Option<(EntityId, Vec2)> {
    candidates
        .filter(|(id, _)| *id != exclude)
        .min_by(|(_, a), (_, b)| from.distance(*a).total_cmp(&from.distance(*b)))
}
