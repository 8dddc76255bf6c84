//! Lightweight xorshift32 PRNG, seeded so every run can be replayed

/// Deterministic random source. Every stochastic choice in the engine draws
/// from one of these, so a seed fully determines a simulation.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Derive an independent stream, e.g. cosmetic vs structural draws
    pub fn fork(&mut self, salt: u32) -> Self {
        let seed = self.next_u32() ^ salt.wrapping_mul(0x9E37_79B9);
        Self::new(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f32(&mut self) -> f32 {
        // 24 random mantissa bits keep the result strictly below 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Returns an integer in [min, max). Returns `min` for an empty range.
    pub fn range_usize(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        min + (self.next_u32() as usize) % (max - min)
    }

    /// Symmetric jitter in [-half_width, half_width)
    pub fn jitter(&mut self, half_width: f32) -> f32 {
        self.range(-half_width, half_width)
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

}
