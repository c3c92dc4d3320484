//! Random episode selection for shuffle mode
//!
//! Shuffle never reorders the queue. "Next" just jumps to a uniformly
//! random position, which may be the one already playing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Picks random queue positions
#[derive(Debug, Clone)]
pub struct ShufflePicker {
    rng: StdRng,
}

impl ShufflePicker {
    /// Create a picker seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible picker
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a picker from an optional seed
    pub fn new(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }

    /// Uniformly random index in `[0, len)`, or `None` for an empty queue
    pub fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rng.gen_range(0..len))
    }
}

impl Default for ShufflePicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}
