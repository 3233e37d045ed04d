//! Seedable PRNG scoped to one search engine instance (Design Notes §9: no
//! process-global RNG — only [`crate::zobrist`]'s key table gets that
//! treatment, since it must stay stable across processes).
//!
//! Grounded on the teacher's use of `rand::rngs::StdRng` for its own
//! fixed-seed Zobrist table (`src/zobrist.rs`); reused here for the strength
//! limiter, which needs fresh randomness per engine instance rather than a
//! single global stream every game would otherwise share.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Thin wrapper so call sites don't reach for `rand` directly; keeps the
/// random source swappable (e.g. for deterministic tests) behind one type.
pub struct EngineRng(StdRng);

impl EngineRng {
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        EngineRng(StdRng::seed_from_u64(seed))
    }

    /// Seed from the current time, for a normal play session where move
    /// choice should vary run to run (used by the strength limiter).
    #[must_use]
    pub fn from_entropy() -> Self {
        EngineRng(StdRng::from_entropy())
    }

    #[must_use]
    pub fn gen_range(&mut self, upper_exclusive: usize) -> usize {
        if upper_exclusive == 0 {
            return 0;
        }
        self.0.gen_range(0..upper_exclusive)
    }

    #[must_use]
    pub fn gen_bool(&mut self, probability: f64) -> bool {
        self.0.gen_bool(probability.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_the_same_sequence() {
        let mut a = EngineRng::from_seed(42);
        let mut b = EngineRng::from_seed(42);
        let sequence_a: Vec<usize> = (0..10).map(|_| a.gen_range(100)).collect();
        let sequence_b: Vec<usize> = (0..10).map(|_| b.gen_range(100)).collect();
        assert_eq!(sequence_a, sequence_b);
    }

    #[test]
    fn gen_range_of_zero_never_panics() {
        let mut rng = EngineRng::from_seed(1);
        assert_eq!(rng.gen_range(0), 0);
    }
}
