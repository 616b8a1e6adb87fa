//! Deterministic seeded random number generator.
//!
//! Uses xorshift32 so weapon spread and particle bursts replay identically
//! for a given seed.

/// Deterministic seeded random number generator using xorshift32.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Creates a new RNG with the given seed.
    /// Seed of 0 is treated as 1 to avoid a degenerate sequence.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a random float in `[0, 1)`.
    #[expect(
        clippy::cast_precision_loss,
        reason = "Only the top 24 bits are kept, which f32 represents exactly."
    )]
    pub fn next_unit(&mut self) -> f32 {
        (self.next_u32() >> 8) as f32 / (1_u32 << 24) as f32
    }

    /// Returns a random float in `[min, max)`.
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit() * (max - min)
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(0x5eed_f00d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = SeededRandom::new(42);
        let mut b = SeededRandom::new(42);
        for _ in 0..32 {
            assert_eq!(a.next_unit().to_bits(), b.next_unit().to_bits());
        }
    }

    #[test]
    fn unit_values_stay_in_range() {
        let mut rng = SeededRandom::new(7);
        for _ in 0..1000 {
            let v = rng.next_unit();
            assert!((0.0..1.0).contains(&v), "{v} out of range");
        }
    }

    #[test]
    fn zero_seed_is_not_degenerate() {
        let mut rng = SeededRandom::new(0);
        let first = rng.next_unit();
        let second = rng.next_unit();
        assert_ne!(first.to_bits(), second.to_bits());
    }
}
