//! Fisher–Yates shuffling over an injectable random source.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform integers for shuffling and random picks.
pub trait RandomSource: Send {
    /// A uniformly distributed value in `0..bound`. `bound` is never zero.
    fn below(&mut self, bound: usize) -> usize;
}

/// `rand`'s standard generator, seeded from the OS or a fixed seed.
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Fixed seed when given, OS entropy otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_os, Self::seeded)
    }
}

impl RandomSource for StdRandom {
    fn below(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// Shuffle `items` in place.
///
/// Walks `i` from the last index down to 1 and swaps it with a uniformly
/// chosen `j` in `0..=i`.
pub fn shuffle<T>(items: &mut [T], rng: &mut dyn RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.below(i + 1);
        items.swap(i, j);
    }
}
