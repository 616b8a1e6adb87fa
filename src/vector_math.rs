//! Basic 2D vector helpers.
//! Angles follow screen coordinates: x grows right, y grows down.
use glam::Vec2;

/// Returns the angle of the vector pointing from `from` to `to`.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use runngun::vector_math::angle_to;
/// let angle = angle_to(Vec2::ZERO, Vec2::new(0.0, 2.0));
/// assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
/// ```
#[must_use]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Returns the unit vector pointing along `angle`.
#[must_use]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::from_angle(angle)
}

/// Rotates `point` around `pivot` by `angle` radians.
///
/// # Examples
/// ```
/// use glam::Vec2;
/// use runngun::vector_math::rotate_about;
/// let rotated = rotate_about(Vec2::new(2.0, 0.0), Vec2::new(1.0, 0.0), std::f32::consts::PI);
/// assert!((rotated - Vec2::ZERO).length() < 1e-5);
/// ```
#[must_use]
pub fn rotate_about(point: Vec2, pivot: Vec2, angle: f32) -> Vec2 {
    pivot + Vec2::from_angle(angle).rotate(point - pivot)
}

/// Returns the distance between two points, treating non-finite input as
/// infinitely far away.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    let d = a.distance(b);
    if d.is_finite() {
        d
    } else {
        f32::INFINITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[rstest]
    #[case::right(Vec2::new(1.0, 0.0), 0.0)]
    #[case::down(Vec2::new(0.0, 1.0), FRAC_PI_2)]
    #[case::up(Vec2::new(0.0, -1.0), -FRAC_PI_2)]
    #[case::left(Vec2::new(-1.0, 0.0), PI)]
    fn angle_to_matches_atan2(#[case] target: Vec2, #[case] expected: f32) {
        assert_relative_eq!(angle_to(Vec2::ZERO, target), expected, epsilon = 1e-6);
    }

    #[test]
    fn direction_is_unit_length() {
        for step in 0..16_u8 {
            let angle = f32::from(step) * PI / 8.0;
            assert_relative_eq!(direction(angle).length(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn rotate_about_keeps_distance_to_pivot() {
        let pivot = Vec2::new(3.0, -2.0);
        let point = Vec2::new(7.0, 1.0);
        let rotated = rotate_about(point, pivot, 1.234);
        assert_relative_eq!(
            rotated.distance(pivot),
            point.distance(pivot),
            epsilon = 1e-4
        );
    }

    #[test]
    fn distance_of_nan_is_infinite() {
        assert!(distance(Vec2::new(f32::NAN, 0.0), Vec2::ZERO).is_infinite());
    }
}
