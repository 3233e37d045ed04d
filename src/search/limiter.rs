//! Strength limiter (spec.md §2 "optional strength-limiter"; SPEC_FULL.md
//! Design Notes §9 "the strength-limiter's move-skipping decisions").
//!
//! Not grounded on the teacher, which has no such feature; built from the
//! spec's own wording plus the deterministic-RNG contract in
//! [`crate::rng`]. At full strength the limiter is a pass-through: it always
//! returns the top-ranked root move, so a UCI driver that never sets a
//! skill level pays no cost for this module's existence.

use crate::chess_move::Move;
use crate::rng::EngineRng;

/// Skill level on a 0 (weakest) to [`StrengthLimiter::MAX_SKILL`] (full
/// strength, no limiting) scale, the same range UCI's "Skill Level" option
/// conventionally uses.
pub struct StrengthLimiter {
    rng: EngineRng,
    skill_level: u8,
}

impl StrengthLimiter {
    pub const MAX_SKILL: u8 = 20;

    #[must_use]
    pub fn new(skill_level: u8, rng: EngineRng) -> Self {
        StrengthLimiter {
            rng,
            skill_level: skill_level.min(Self::MAX_SKILL),
        }
    }

    #[must_use]
    pub fn full_strength() -> Self {
        StrengthLimiter::new(Self::MAX_SKILL, EngineRng::from_seed(0))
    }

    #[must_use]
    pub fn is_limiting(&self) -> bool {
        self.skill_level < Self::MAX_SKILL
    }

    /// Probability of continuing to the next-weaker candidate instead of
    /// settling on the current one, applied independently of skill level;
    /// skill only controls how wide a pool of candidates is in play.
    const SKIP_PROBABILITY: f64 = 0.5;

    /// Choose a move from `ranked` (root moves already sorted best score
    /// first, as `search::iterative::search` produces). Widens the pool of
    /// candidates under consideration as `skill_level` drops — at
    /// [`StrengthLimiter::MAX_SKILL`] the pool is just the top move; at `0`
    /// every ranked move is in play — then walks down the pool, at each
    /// step randomly continuing to the next-weaker candidate.
    pub fn pick_move(&mut self, ranked: &[(Move, i32)]) -> Option<Move> {
        if ranked.is_empty() {
            return None;
        }
        if !self.is_limiting() {
            return Some(ranked[0].0);
        }
        let pool_width = Self::MAX_SKILL as usize + 1 - self.skill_level as usize;
        let candidates = pool_width.min(ranked.len());
        for &(mv, _) in &ranked[..candidates - 1] {
            if !self.rng.gen_bool(Self::SKIP_PROBABILITY) {
                return Some(mv);
            }
        }
        Some(ranked[candidates - 1].0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ColorlessPiece, Square};

    fn mv(from: usize, to: usize) -> Move {
        Move::new(
            Square::from_index(from),
            Square::from_index(to),
            None,
            Some(ColorlessPiece::Pawn),
            None,
        )
    }

    #[test]
    fn full_strength_always_picks_the_top_move() {
        let ranked = vec![(mv(8, 16), 50), (mv(9, 17), 10)];
        let mut limiter = StrengthLimiter::full_strength();
        assert_eq!(limiter.pick_move(&ranked), Some(ranked[0].0));
    }

    #[test]
    fn zero_skill_can_pick_a_lower_ranked_move() {
        let ranked = vec![(mv(8, 16), 50), (mv(9, 17), 10), (mv(10, 18), 0)];
        let mut limiter = StrengthLimiter::new(0, EngineRng::from_seed(7));
        let mut saw_non_top = false;
        for _ in 0..50 {
            if limiter.pick_move(&ranked) != Some(ranked[0].0) {
                saw_non_top = true;
                break;
            }
        }
        assert!(saw_non_top, "skill 0 should eventually skip the top move");
    }

    #[test]
    fn empty_ranking_yields_no_move() {
        let mut limiter = StrengthLimiter::new(5, EngineRng::from_seed(1));
        assert_eq!(limiter.pick_move(&[]), None);
    }

    #[test]
    fn determinism_with_a_fixed_seed() {
        let ranked = vec![(mv(8, 16), 50), (mv(9, 17), 10), (mv(10, 18), 0)];
        let mut a = StrengthLimiter::new(10, EngineRng::from_seed(99));
        let mut b = StrengthLimiter::new(10, EngineRng::from_seed(99));
        let picks_a: Vec<_> = (0..20).map(|_| a.pick_move(&ranked)).collect();
        let picks_b: Vec<_> = (0..20).map(|_| b.pick_move(&ranked)).collect();
        assert_eq!(picks_a, picks_b);
    }
}
