//! Weapons and projectiles.
//!
//! [`Weapon`] is a pure fire-control state machine; [`Shot`] owns a
//! projectile body. Hit attribution and the timed transitions live in
//! [`Env`](crate::env::Env), which owns both.

pub mod shot;
pub mod weapon;

pub use shot::{Shot, ShotBounds, ShotId, ShotIds, ShotOrder};
pub use weapon::{TriggerOutcome, Weapon};

/// Uniform offset in `[-spread / 2, spread / 2)` drawn from `rng`.
///
/// # Examples
/// ```
/// use runngun::combat::spread_offset;
/// use runngun::random::SeededRandom;
/// let mut rng = SeededRandom::new(3);
/// let offset = spread_offset(&mut rng, 0.2);
/// assert!((-0.1..0.1).contains(&offset));
/// ```
pub fn spread_offset(rng: &mut crate::random::SeededRandom, spread: f32) -> f32 {
    let half = spread.abs() / 2.0;
    rng.next_range(-half, half)
}
