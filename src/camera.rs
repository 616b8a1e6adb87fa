//! Dead-zone camera tracker.
//!
//! The camera only moves when the focus leaves the safe zone, and then by
//! exactly the overshoot, which leaves the focus on the zone edge.

use glam::Vec2;

use crate::config::CameraConfig;
use crate::entity::EntityId;

/// Dead-zone window in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeZone {
    /// Left edge.
    pub x1: f32,
    /// Right edge.
    pub x2: f32,
    /// Top edge.
    pub y1: f32,
    /// Bottom edge.
    pub y2: f32,
}

/// Camera state.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World position of the top-left screen corner.
    pub position: Vec2,
    /// Screen width.
    pub width: f32,
    /// Screen height.
    pub height: f32,
    /// Follow horizontally.
    pub follow_x: bool,
    /// Follow vertically.
    pub follow_y: bool,
    safe_zone: SafeZone,
    focus: Option<EntityId>,
}

impl Camera {
    /// Builds a camera at the origin with a window centred on the screen.
    #[must_use]
    pub fn new(config: &CameraConfig) -> Self {
        let half_w = config.screen_width * config.safe_zone_ratio / 2.0;
        let half_h = config.screen_height * config.vertical_safe_zone_ratio / 2.0;
        let centre = Vec2::new(config.screen_width, config.screen_height) / 2.0;
        Self {
            position: Vec2::ZERO,
            width: config.screen_width,
            height: config.screen_height,
            follow_x: config.follow_x,
            follow_y: config.follow_y,
            safe_zone: SafeZone {
                x1: centre.x - half_w,
                x2: centre.x + half_w,
                y1: centre.y - half_h,
                y2: centre.y + half_h,
            },
            focus: None,
        }
    }

    /// Follows `entity` from now on.
    pub fn set_focus(&mut self, entity: EntityId) {
        self.focus = Some(entity);
    }

    /// Stops following.
    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// Entity currently followed.
    #[must_use]
    pub const fn focus(&self) -> Option<EntityId> {
        self.focus
    }

    /// Dead-zone window.
    #[must_use]
    pub const fn safe_zone(&self) -> SafeZone {
        self.safe_zone
    }

    /// Pulls the window back over `focus` when it has left it.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec2;
    /// use runngun::camera::Camera;
    /// use runngun::config::CameraConfig;
    /// let mut camera = Camera::new(&CameraConfig::default());
    /// let edge = camera.safe_zone().x2;
    /// camera.update(Some(Vec2::new(edge + 3.0, 0.0)));
    /// assert_eq!(camera.position.x, 3.0);
    /// ```
    pub fn update(&mut self, focus: Option<Vec2>) {
        let Some(focus) = focus else {
            return;
        };
        if self.follow_x {
            self.position.x += overshoot(
                focus.x,
                self.position.x + self.safe_zone.x1,
                self.position.x + self.safe_zone.x2,
            );
        }
        if self.follow_y {
            self.position.y += overshoot(
                focus.y,
                self.position.y + self.safe_zone.y1,
                self.position.y + self.safe_zone.y2,
            );
        }
    }

    /// Converts a screen point into world space.
    #[must_use]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.position
    }
}

fn overshoot(value: f32, low: f32, high: f32) -> f32 {
    if value < low {
        value - low
    } else if value > high {
        value - high
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn camera() -> Camera {
        Camera::new(&CameraConfig {
            screen_width: 1000.0,
            screen_height: 600.0,
            follow_y: true,
            ..CameraConfig::default()
        })
    }

    #[rstest]
    fn window_is_a_fifth_of_the_screen(camera: Camera) {
        let zone = camera.safe_zone();
        assert_relative_eq!(zone.x1, 400.0);
        assert_relative_eq!(zone.x2, 600.0);
    }

    #[rstest]
    #[case::inside(550.0, 0.0)]
    #[case::right_overshoot(603.0, 3.0)]
    #[case::left_overshoot(390.0, -10.0)]
    #[case::exactly_on_edge(600.0, 0.0)]
    fn moves_by_exact_overshoot(mut camera: Camera, #[case] focus_x: f32, #[case] delta: f32) {
        camera.update(Some(Vec2::new(focus_x, 300.0)));
        assert_relative_eq!(camera.position.x, delta);
        if delta != 0.0 {
            let zone = camera.safe_zone();
            let edge = if delta > 0.0 { zone.x2 } else { zone.x1 };
            assert_relative_eq!(focus_x, camera.position.x + edge);
        }
    }

    #[rstest]
    fn vertical_follow_is_independent(mut camera: Camera) {
        camera.follow_x = false;
        let zone = camera.safe_zone();
        camera.update(Some(Vec2::new(5000.0, zone.y2 + 7.0)));
        assert_relative_eq!(camera.position.x, 0.0);
        assert_relative_eq!(camera.position.y, 7.0);
    }

    #[rstest]
    fn no_focus_means_no_motion(mut camera: Camera) {
        camera.update(None);
        assert_eq!(camera.position, Vec2::ZERO);
    }

    #[rstest]
    fn screen_to_world_adds_offset(mut camera: Camera) {
        camera.position = Vec2::new(30.0, -5.0);
        assert_eq!(camera.to_world(Vec2::new(1.0, 1.0)), Vec2::new(31.0, -4.0));
    }
}
