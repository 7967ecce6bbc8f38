//! Synthetic key workloads
//!
//! The generator owns an injected RNG so every run with the same seed
//! produces the same keys.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct KeyGenerator<R: Rng> {
    rng: R,
}

impl KeyGenerator<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> KeyGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Next key, shaped `"{n}#test"` with `n` in `[0, i32::MAX)`
    pub fn next_key(&mut self) -> String {
        let n: i32 = self.rng.gen_range(0..i32::MAX);
        format!("{}#test", n)
    }

    pub fn generate(&mut self, count: usize) -> Vec<String> {
        (0..count).map(|_| self.next_key()).collect()
    }
}
