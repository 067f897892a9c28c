//! Lightweight xorshift32 PRNG — no external crate needed
//!
//! The seed is part of the settings snapshot, so a refresh with the same
//! settings reproduces the exact same particle templates.

pub struct SimRng {
    state: u32,
}

impl SimRng {
    pub fn new(seed: u32) -> Self {
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

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u32() as f32) / (u32::MAX as f32)
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns `base` perturbed by a uniform offset in [-delta, delta)
    pub fn jitter(&mut self, base: f32, delta: f32) -> f32 {
        self.range(base - delta, base + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rng_range_bounds() {
        let mut rng = SimRng::new(42);
        for _ in 0..1000 {
            let v = rng.range(0.0, 10.0);
            assert!(v >= 0.0 && v < 10.0);
        }
    }

    #[test]
    fn rng_jitter_bounds() {
        let mut rng = SimRng::new(7);
        for _ in 0..1000 {
            let v = rng.jitter(24.0, 8.0);
            assert!(v >= 16.0 && v < 32.0);
        }
        // Zero delta always returns the base
        assert!((rng.jitter(5.0, 0.0) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn rng_deterministic_per_seed() {
        let mut a = SimRng::new(1234);
        let mut b = SimRng::new(1234);
        for _ in 0..100 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn rng_zero_seed_coerced() {
        // Seed 0 would lock xorshift at zero forever; it maps to 1 instead
        let mut a = SimRng::new(0);
        let mut b = SimRng::new(1);
        assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
    }
}
