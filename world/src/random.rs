//! Random sources for fire spread and fire evasion.

use prairie_burn_core::{CellCoord, RandomSource};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 0x42f0_e1eb_d4a5_3c21;

/// Deterministic source backed by `ChaCha8Rng`.
///
/// Identical seeds produce identical fire trajectories on every platform.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a source seeded from `seed`.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::from_seed(DEFAULT_SEED)
    }
}

impl RandomSource for SeededRandom {
    fn shuffle(&mut self, cells: &mut [CellCoord]) {
        cells.shuffle(&mut self.rng);
    }

    fn choose_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "choose_index requires candidates");
        self.rng.gen_range(0..len)
    }
}

/// Source that keeps enumeration order and always picks the first candidate.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedOrder;

impl RandomSource for FixedOrder {
    fn shuffle(&mut self, _cells: &mut [CellCoord]) {}

    fn choose_index(&mut self, _len: usize) -> usize {
        0
    }
}
