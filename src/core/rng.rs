//! Deterministic random number generation.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical deals and AI choices
//! - **Context streams**: Independent sequences for the shuffle and the AI
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use shithead::core::GameRng;
//!
//! let rng = GameRng::new(42);
//! let mut shuffle = rng.for_context("deck");
//! let mut ai = rng.for_context("ai");
//!
//! // Different streams, each reproducible from the same seed.
//! assert_ne!(shuffle.gen_range_usize(0..1000), ai.gen_range_usize(0..1000));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::ops::{Range, RangeInclusive};

/// Deterministic RNG for dealing and opponent decisions.
///
/// Uses ChaCha8: fast, and far better than gameplay needs.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a random u64 in the given inclusive range.
    pub fn gen_range_u64(&mut self, range: RangeInclusive<u64>) -> u64 {
        self.inner.gen_range(range)
    }

    /// Generate a random boolean with given probability of true.
    ///
    /// Probabilities outside `[0, 1]` are clamped.
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.inner.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Shuffle a slice in place with Fisher–Yates.
    ///
    /// Walks from the last index down to 1, swapping each element with a
    /// uniformly chosen index in `[0, i]`.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.inner.gen_range(0..=i);
            slice.swap(i, j);
        }
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        if slice.is_empty() {
            None
        } else {
            let idx = self.gen_range_usize(0..slice.len());
            slice.get(idx)
        }
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
