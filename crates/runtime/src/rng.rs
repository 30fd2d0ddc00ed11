//! `rand`-backed RNG oracle for live encounters.

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use shards_core::RngOracle;

/// [`RngOracle`] over a seeded [`StdRng`].
///
/// The seed is kept so a fight can be replayed from logs.
#[derive(Clone, Debug)]
pub struct SeededRng {
    inner: StdRng,
    seed: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seeds from the thread RNG.
    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RngOracle for SeededRng {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn range(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    fn unit(&mut self) -> f64 {
        self.inner.gen_range(0.0..1.0)
    }
}
