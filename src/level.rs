//! Level descriptions and the wall bodies built from them.
//!
//! A level is a JSON document measured in tiles:
//!
//! ```json
//! { "name": "yard", "dimensions": { "width": 100, "height": 40 },
//!   "objects": [ { "x": 0, "y": 36, "w": 100, "h": 4, "static": true } ] }
//! ```
//!
//! Objects are axis-aligned boxes whose top-left corner sits at `(x, y)`.
//! Every object becomes one `Wall` body scaled by the tile size.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::error::LevelError;
use crate::physics::{BodyDesc, BodyId, BodyLabel, BodyOptions, PhysicsWorld, Shape};

/// Level size in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
}

/// One box of level geometry, in tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelObject {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
    /// Static objects never move; the others fall under gravity.
    #[serde(rename = "static", default)]
    pub is_static: bool,
}

/// A parsed level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    /// Level name.
    pub name: String,
    /// Size in tiles.
    pub dimensions: Dimensions,
    /// World units per tile; falls back to the configured value.
    #[serde(default)]
    pub tile: Option<f32>,
    /// Geometry.
    #[serde(default)]
    pub objects: Vec<LevelObject>,
}

impl LevelDescription {
    /// Parses and validates a level from JSON text.
    ///
    /// # Errors
    /// [`LevelError::Parse`] for malformed JSON, otherwise the errors of
    /// [`LevelDescription::validate`].
    pub fn from_json_str(text: &str) -> Result<Self, LevelError> {
        let level: Self = serde_json::from_str(text)?;
        level.validate()?;
        Ok(level)
    }

    /// Reads a level file.
    ///
    /// # Errors
    /// [`LevelError::Read`] when the file cannot be read, otherwise the
    /// errors of [`LevelDescription::from_json_str`].
    pub fn load(path: &Path) -> Result<Self, LevelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Rejects empty levels and empty objects.
    ///
    /// # Errors
    /// [`LevelError::Dimensions`] or [`LevelError::EmptyObject`].
    pub fn validate(&self) -> Result<(), LevelError> {
        if self.dimensions.width == 0 || self.dimensions.height == 0 {
            return Err(LevelError::Dimensions {
                name: self.name.clone(),
                width: self.dimensions.width,
                height: self.dimensions.height,
            });
        }
        if let Some(index) = self
            .objects
            .iter()
            .position(|o| !(o.w > 0.0 && o.h > 0.0))
        {
            return Err(LevelError::EmptyObject {
                name: self.name.clone(),
                index,
            });
        }
        Ok(())
    }

    /// World units per tile for this level.
    #[must_use]
    pub fn units_per_tile(&self, config: &GameConfig) -> f32 {
        self.tile
            .filter(|t| *t > 0.0)
            .unwrap_or(config.world.units_per_tile)
    }

    /// Map size in world units.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "Tile counts are far below f32's exact integer range."
    )]
    pub fn map_size(&self, config: &GameConfig) -> Vec2 {
        Vec2::new(
            self.dimensions.width as f32,
            self.dimensions.height as f32,
        ) * self.units_per_tile(config)
    }

    /// Adds one `Wall` body per object and returns their identifiers in
    /// declaration order.
    pub fn build(&self, world: &mut dyn PhysicsWorld, config: &GameConfig) -> Vec<BodyId> {
        let unit = self.units_per_tile(config);
        self.objects
            .iter()
            .map(|object| {
                let mut options = BodyOptions::labelled(BodyLabel::Wall);
                options.friction = 0.0001;
                options.friction_static = 0.1;
                options.mass = Some(5.0);
                options.is_static = object.is_static;
                options.filter = config.collision.wall;
                options.infinite_inertia = true;
                world.add_body(BodyDesc {
                    position: Vec2::new(object.x + object.w / 2.0, object.y + object.h / 2.0)
                        * unit,
                    shape: Shape::Rect {
                        width: object.w * unit,
                        height: object.h * unit,
                    },
                    options,
                })
            })
            .collect()
    }

    /// Closed arena: floor, two side walls and a floating platform.
    #[must_use]
    pub fn arena() -> Self {
        let block = |x: f32, y: f32, w: f32, h: f32| LevelObject {
            x,
            y,
            w,
            h,
            is_static: true,
        };
        Self {
            name: "arena".to_owned(),
            dimensions: Dimensions {
                width: 100,
                height: 40,
            },
            tile: None,
            objects: vec![
                block(0.0, 36.0, 100.0, 4.0),
                block(0.0, 0.0, 1.0, 36.0),
                block(99.0, 0.0, 1.0, 36.0),
                block(30.0, 28.0, 10.0, 1.0),
            ],
        }
    }
}

impl Default for LevelDescription {
    fn default() -> Self {
        Self::arena()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::arcade::ArcadeWorld;
    use rstest::rstest;

    #[test]
    fn parses_static_flag_and_optional_fields() {
        let level = LevelDescription::from_json_str(
            r#"{ "name": "yard", "dimensions": { "width": 10, "height": 5 },
                 "objects": [ { "x": 0, "y": 4, "w": 10, "h": 1, "static": true },
                              { "x": 2, "y": 1, "w": 1, "h": 1 } ] }"#,
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(level.tile, None);
        assert!(level.objects.first().is_some_and(|o| o.is_static));
        assert!(level.objects.get(1).is_some_and(|o| !o.is_static));
    }

    #[rstest]
    #[case::zero_width(r#"{ "name": "n", "dimensions": { "width": 0, "height": 5 } }"#)]
    #[case::zero_height(r#"{ "name": "n", "dimensions": { "width": 5, "height": 0 } }"#)]
    fn rejects_empty_dimensions(#[case] text: &str) {
        assert!(matches!(
            LevelDescription::from_json_str(text),
            Err(LevelError::Dimensions { .. })
        ));
    }

    #[test]
    fn rejects_empty_objects() {
        let text = r#"{ "name": "n", "dimensions": { "width": 5, "height": 5 },
                        "objects": [ { "x": 0, "y": 0, "w": 1, "h": 1 }, { "x": 0, "y": 0, "w": 0, "h": 1 } ] }"#;
        match LevelDescription::from_json_str(text) {
            Err(LevelError::EmptyObject { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected empty object error, got {other:?}"),
        }
    }

    #[test]
    fn builds_scaled_walls() {
        let mut world = ArcadeWorld::default();
        let config = GameConfig::default();
        let level = LevelDescription::arena();
        let walls = level.build(&mut world, &config);
        assert_eq!(walls.len(), 4);
        let floor = walls.first().copied().unwrap_or_else(|| panic!("floor"));
        assert_eq!(world.label(floor), Some(BodyLabel::Wall));
        assert_eq!(world.position(floor), Some(Vec2::new(1600.0, 1216.0)));
        assert_eq!(level.map_size(&config), Vec2::new(3200.0, 1280.0));
    }

    #[test]
    fn level_tile_overrides_config() {
        let mut level = LevelDescription::arena();
        level.tile = Some(16.0);
        assert_eq!(level.map_size(&GameConfig::default()), Vec2::new(1600.0, 640.0));
    }
}
