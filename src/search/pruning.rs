//! Node-level pruning decisions (spec.md §4.5 steps 3, 6, 7: mate-distance
//! pruning, futility pruning, null-move pruning).
//!
//! Grounded on the teacher's `search/pruning.rs`
//! (`is_zugzwang_position`/`mate_distance_pruning`/`should_futility_prune`/
//! `should_late_move_prune`/`null_move_pruning`), adapted to take the
//! adaptive reduction formula spec.md names explicitly rather than the
//! teacher's `4 + depth/6 + eval_beta_bonus` shape, and to work against
//! [`crate::board::Board`] instead of the teacher's raw `Board`/`negamax`
//! pair.

use crate::constants::MATE_SCORE;
use crate::position::Position;
use crate::types::Color;

/// Only king and pawns for the side to move: null-move pruning is unsound
/// here, since "pass" and "best move" can coincide in a real zugzwang.
#[must_use]
pub fn is_zugzwang_position(pos: &Position, side: Color) -> bool {
    !pos.has_non_pawn_material(side)
}

/// Tighten `[alpha, beta]` so a faster mate at a shallower ply is never
/// passed up for a slower one (spec.md §4.5 step 3).
#[must_use]
pub fn mate_distance_pruning(alpha: i32, beta: i32, ply: u32) -> (i32, i32) {
    let alpha = alpha.max(-(MATE_SCORE - ply as i32));
    let beta = beta.min(MATE_SCORE - ply as i32);
    (alpha, beta)
}

const FUTILITY_MOVE_MARGIN: i32 = 100;

/// Per-move futility prune (spec.md §4.5 step 9): a quiet, unexceptional
/// move whose static score plus its positional delta still can't reach
/// alpha within `to_horizon` plies is skipped rather than searched.
#[must_use]
pub fn should_futility_prune(
    to_horizon: u32,
    static_score: i32,
    location_delta: i32,
    alpha: i32,
    is_quiet: bool,
) -> bool {
    if !is_quiet || to_horizon > 2 {
        return false;
    }
    static_score + location_delta + FUTILITY_MOVE_MARGIN * to_horizon as i32 + FUTILITY_MOVE_MARGIN < alpha
}

/// Skip a late quiet move at shallow remaining horizon (late move pruning).
#[must_use]
pub fn should_late_move_prune(to_horizon: u32, move_index: usize, is_quiet: bool) -> bool {
    is_quiet && to_horizon <= 6 && move_index >= ((3 + to_horizon * to_horizon) / 2) as usize
}

/// Whole-node static/reverse-futility prune (spec.md §4.5 step 6): a
/// position far from check or mate whose static score already clears beta
/// by a depth-scaled margin is assumed to hold without searching further.
#[must_use]
pub fn should_prune_node_as_futile(
    in_check: bool,
    is_drawn_endgame: bool,
    beta: i32,
    static_score: i32,
    to_horizon: u32,
) -> bool {
    if in_check || is_drawn_endgame || beta.abs() >= MATE_SCORE - 100 {
        return false;
    }
    static_score - NODE_FUTILITY_MARGIN_PER_PLY * to_horizon as i32 > beta
}

const NODE_FUTILITY_MARGIN_PER_PLY: i32 = 120;

/// Adaptive null-move reduction (spec.md §4.5 step 7: "3 + min(3,
/// (static−β)/200)").
#[must_use]
pub fn null_move_reduction(static_score: i32, beta: i32) -> u32 {
    let bonus = ((static_score - beta) / 200).clamp(0, 3);
    3 + bonus as u32
}

/// Whether the position is eligible for a null-move try at all (the reduced
/// search itself is the caller's job, since it needs the board/TT/heuristic
/// state this module doesn't own).
#[must_use]
pub fn null_move_eligible(pos: &Position, to_horizon: u32, beta: i32) -> bool {
    to_horizon >= 3
        && !pos.in_check()
        && !is_zugzwang_position(pos, pos.side_to_move())
        && beta.abs() < MATE_SCORE - 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zugzwang_is_detected_for_king_and_pawns_only() {
        let pos = crate::position::fen::parse_fen("8/8/8/4k3/8/4P3/8/4K3 w - - 0 1").unwrap();
        assert!(is_zugzwang_position(&pos, Color::White));
    }

    #[test]
    fn non_pawn_material_is_not_zugzwang() {
        let pos = Position::startpos();
        assert!(!is_zugzwang_position(&pos, Color::White));
    }

    #[test]
    fn mate_distance_pruning_tightens_bounds_near_mate() {
        let (alpha, beta) = mate_distance_pruning(-32_000, 32_000, 1);
        assert!(alpha > -32_000);
        assert!(beta < 32_000);
    }

    #[test]
    fn futility_pruning_only_applies_near_the_horizon() {
        assert!(!should_futility_prune(5, -1000, 0, 0, true));
        assert!(should_futility_prune(1, -1000, 0, 0, true));
        assert!(!should_futility_prune(1, -1000, 0, 0, false));
    }

    #[test]
    fn null_move_reduction_grows_with_static_advantage() {
        assert_eq!(null_move_reduction(0, 0), 3);
        assert_eq!(null_move_reduction(700, 0), 6);
    }

    #[test]
    fn node_futility_prune_fires_on_a_big_static_lead() {
        assert!(should_prune_node_as_futile(false, false, 0, 10_000, 2));
        assert!(!should_prune_node_as_futile(true, false, 0, 10_000, 2));
        assert!(!should_prune_node_as_futile(false, false, 0, 100, 2));
    }

    #[test]
    fn null_move_is_ineligible_near_mate_scores() {
        let pos = Position::startpos();
        assert!(!null_move_eligible(&pos, 4, MATE_SCORE - 50));
    }
}
