//! Deterministic random number generation for battle units.
//!
//! Every unit owns its own stream so capture draws, random power-up channels
//! and random skills replay identically from the same seed.
//!
//! ```
//! use pet_battle::core::BattleRng;
//!
//! let mut a = BattleRng::new(42);
//! let mut b = BattleRng::new(42);
//! assert_eq!(a.percent(), b.percent());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Deterministic per-unit RNG.
///
/// Uses ChaCha8 so the stream position can be captured in O(1).
#[derive(Clone, Debug)]
pub struct BattleRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl BattleRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Derive an independent stream for one side of a battle.
    #[must_use]
    pub fn for_unit(seed: u64, unit: u32) -> Self {
        Self::new(seed ^ (u64::from(unit).wrapping_add(1)).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Draw a float in `[0, 100)`.
    ///
    /// This is the draw capture probabilities are compared against.
    pub fn percent(&mut self) -> f64 {
        self.inner.gen_range(0.0..100.0)
    }

    /// Draw an integer in the given range. Returns `range.start` for empty ranges.
    pub fn gen_range(&mut self, range: std::ops::Range<i32>) -> i32 {
        if range.is_empty() {
            return range.start;
        }
        self.inner.gen_range(range)
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }

    /// Choose an index with weighted probability.
    ///
    /// Weights do not need to sum to 1.0. Walks the list subtracting each
    /// weight from a draw in `[0, sum)` and stops at the first weight that
    /// covers the remainder. Returns `None` for empty or all-zero weights,
    /// and for any negative or non-finite weight or sum.
    pub fn choose_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return None;
        }
        let total: f64 = weights.iter().sum();
        if weights.is_empty() || !total.is_finite() || total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen_range(0.0..total);
        for (i, &weight) in weights.iter().enumerate() {
            if weight >= threshold {
                return Some(i);
            }
            threshold -= weight;
        }

        // Floating point edge case
        Some(weights.len() - 1)
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> BattleRngState {
        BattleRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &BattleRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl Serialize for BattleRng {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.state().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BattleRng {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BattleRngState::deserialize(deserializer).map(|state| Self::from_state(&state))
    }
}

/// Serializable RNG state for snapshots.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = BattleRng::new(42);
        let mut rng2 = BattleRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range(0..1000), rng2.gen_range(0..1000));
        }
    }

    #[test]
    fn test_unit_streams_differ() {
        let mut a = BattleRng::for_unit(7, 0);
        let mut b = BattleRng::for_unit(7, 1);

        let seq1: Vec<_> = (0..10).map(|_| a.gen_range(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| b.gen_range(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_percent_bounds() {
        let mut rng = BattleRng::new(3);
        for _ in 0..200 {
            let p = rng.percent();
            assert!((0.0..100.0).contains(&p));
        }
    }

    #[test]
    fn test_empty_range() {
        let mut rng = BattleRng::new(3);
        assert_eq!(rng.gen_range(5..5), 5);
    }

    #[test]
    fn test_choose_weighted() {
        let mut rng = BattleRng::new(42);

        let weights = vec![0.0, 100.0, 0.0];
        for _ in 0..10 {
            assert_eq!(rng.choose_weighted(&weights), Some(1));
        }

        assert_eq!(rng.choose_weighted(&[]), None);
        assert_eq!(rng.choose_weighted(&[0.0, 0.0]), None);
    }

    #[test]
    fn test_choose_weighted_rejects_unusable_weights() {
        let mut rng = BattleRng::new(42);

        assert_eq!(rng.choose_weighted(&[f64::INFINITY, 1.0]), None);
        assert_eq!(rng.choose_weighted(&[f64::NAN, 1.0]), None);
        assert_eq!(rng.choose_weighted(&[-1.0, 2.0]), None);
        assert_eq!(rng.choose_weighted(&[f64::MAX, f64::MAX]), None);
    }

    #[test]
    fn test_state_round_trip() {
        let mut rng = BattleRng::new(42);
        for _ in 0..50 {
            rng.percent();
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.gen_range(0..1000)).collect();

        let mut restored = BattleRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.gen_range(0..1000)).collect();

        assert_eq!(expected, actual);
    }
}
