//! Draw requests emitted by the world.
//!
//! The core never touches pixels. Every frame it describes what to draw as
//! a sequence of [`DrawCommand`]s handed to a [`RenderSink`]; a host
//! renderer (canvas, GPU, or a test recorder) turns them into an image.

use bevy::prelude::Resource;
use glam::Vec2;

use crate::entity::Entity;
use crate::physics::{PhysicsWorld, Shape};

/// Textures the core refers to by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sprite {
    /// Head texture, drawn inside the head circle.
    PlayerHead,
    /// Body texture, drawn over head and torso.
    PlayerBody,
}

/// A single draw request. Coordinates are world space once an offset is set.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Translation applied to every following command.
    SetOffset(Vec2),
    /// Straight line.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
    },
    /// Outlined axis-aligned rectangle.
    Rect {
        /// Top-left corner.
        min: Vec2,
        /// Bottom-right corner.
        max: Vec2,
    },
    /// Filled polygon.
    Polygon(Vec<Vec2>),
    /// Outlined circle.
    Circle {
        /// Centre.
        centre: Vec2,
        /// Radius.
        radius: f32,
    },
    /// Rectangular sprite.
    Sprite {
        /// Texture.
        sprite: Sprite,
        /// Top-left corner.
        min: Vec2,
        /// Width and height.
        size: Vec2,
        /// Mirror horizontally.
        mirror_x: bool,
    },
    /// Sprite clipped to a circle.
    CircleSprite {
        /// Texture.
        sprite: Sprite,
        /// Centre.
        centre: Vec2,
        /// Radius.
        radius: f32,
        /// Mirror horizontally.
        mirror_x: bool,
    },
    /// Line of text.
    Text {
        /// Text content.
        text: String,
        /// Baseline position.
        at: Vec2,
    },
}

/// Receives the draw requests of one frame.
pub trait RenderSink {
    /// Starts a frame.
    fn begin_frame(&mut self);
    /// Records one request.
    fn draw(&mut self, command: DrawCommand);
    /// Ends the frame.
    fn end_frame(&mut self) {}
}

/// Sink keeping the requests of the last frame, shared with the host as a
/// Bevy resource.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    frames: u64,
}

impl DrawList {
    /// Requests of the last frame.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Completed frames.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderSink for DrawList {
    fn begin_frame(&mut self) {
        self.commands.clear();
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn end_frame(&mut self) {
        self.frames += 1;
    }
}

/// Emits the bounding box, every part and the sprites of a living entity.
pub fn draw_entity(entity: &Entity, world: &dyn PhysicsWorld, sink: &mut dyn RenderSink) {
    if !entity.is_alive() {
        return;
    }
    if let Some(bounds) = world.bounds(entity.body.root) {
        sink.draw(DrawCommand::Rect {
            min: bounds.min,
            max: bounds.max,
        });
    }
    let mirror_x = entity.sprite_scale_x() < 0.0;
    let mut parts = world.parts(entity.body.root);
    parts.push(entity.body.arm);
    for part in parts {
        match world.shape(part) {
            Some(Shape::Circle { radius }) => {
                let Some(centre) = world.position(part) else {
                    continue;
                };
                sink.draw(DrawCommand::Circle { centre, radius });
                sink.draw(DrawCommand::CircleSprite {
                    sprite: Sprite::PlayerHead,
                    centre,
                    radius,
                    mirror_x,
                });
            }
            Some(Shape::Rect { .. }) => {
                sink.draw(DrawCommand::Polygon(world.vertices(part)));
            }
            None => {}
        }
    }
    if let Some(torso) = world.position(entity.body.torso) {
        sink.draw(DrawCommand::Sprite {
            sprite: Sprite::PlayerBody,
            min: torso - Vec2::new(entity.width, entity.height) / 2.0,
            size: Vec2::new(entity.width, entity.height * 2.0 / 3.0),
            mirror_x,
        });
    }
}

/// Debug lines describing an entity's movement state.
#[must_use]
pub fn debug_lines(entity: &Entity, world: &dyn PhysicsWorld) -> Vec<String> {
    let speed = world.speed(entity.body.root).unwrap_or_default();
    vec![
        format!("speed: {speed:.3}"),
        format!(
            "velocity: {{x: {:.0}, y: {:.0}}}",
            entity.velocity.x, entity.velocity.y
        ),
        format!(
            "position: {{x: {:.0}, y: {:.0}}}",
            entity.position.x, entity.position.y
        ),
        format!("angle: {:.2}°", entity.aim_angle.to_degrees()),
        format!("health: {:.0}", entity.health()),
        format!("onAir: {}", entity.on_air),
        format!("isCrouching: {}", entity.is_crouch),
        format!("isMoving: {}", entity.is_moving),
        format!("wallSlide: {}", entity.locomotion.wall_slide),
        format!("wallSlideSide: {:?}", entity.locomotion.wall_side),
        format!("jumps: {}", entity.locomotion.jumps),
        format!("direction: {:?}", entity.facing),
        format!("number of bodies: {}", world.body_count()),
    ]
}

/// Emits `lines` top-down in screen space.
pub fn draw_text_block(lines: Vec<String>, sink: &mut dyn RenderSink) {
    for (row, text) in (1_u16..).zip(lines) {
        sink.draw(DrawCommand::Text {
            text,
            at: Vec2::new(10.0, 15.0 * f32::from(row)),
        });
    }
}
