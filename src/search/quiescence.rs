//! Quiescence search (spec.md §4.5: "quiescence mirrors the search but is
//! restricted to captures, stands pat, and performs no null-move, cache, or
//! LMR handling").
//!
//! Grounded on the teacher's `search/quiescence.rs` (`quiesce`'s stand-pat
//! check, delta-pruning threshold, and recursive capture-only loop).
//! Ordering there came from SEE; this crate folds SEE's job into the
//! packed move's own `ordering_key()` (MVV/LVA) instead, since the
//! evaluator is an external oracle the search doesn't otherwise reach into
//! for per-move tactics.

use crate::board::Board;
use crate::eval::Evaluator;
use crate::position::movegen::MoveBuffer;
use crate::search::time_control::{Interrupted, StopFlag, TimeControl};

/// Margin added to the stand-pat score before a shallow quiescence node
/// bothers generating captures at all (delta pruning).
const DELTA_MARGIN: i32 = 200;

#[allow(clippy::too_many_arguments)]
pub fn quiesce(
    board: &mut Board,
    mut alpha: i32,
    beta: i32,
    evaluator: &impl Evaluator,
    time: &TimeControl,
    stop: &StopFlag,
) -> Result<i32, Interrupted> {
    let (stand_pat, is_drawn_endgame, _phase) = evaluator.static_score(board.current());
    if is_drawn_endgame || board.is_terminal_draw() {
        return Ok(0);
    }
    let due = board.visit_node();
    time.poll(due, board.nodes(), stop)?;

    if stand_pat >= beta {
        return Ok(beta);
    }
    alpha = alpha.max(stand_pat);

    let in_check = board.current().in_check();
    let mut candidates = MoveBuffer::new();
    if in_check {
        board.current().generate_pseudo_legal_into(&mut candidates);
    } else if stand_pat + DELTA_MARGIN >= alpha {
        board.current().generate_captures_into(u64::MAX, &mut candidates);
    }

    let mut ordered: Vec<_> = candidates.as_slice().to_vec();
    ordered.sort_by_key(|m| std::cmp::Reverse(m.ordering_key()));

    let mut best_score = stand_pat;
    for mv in ordered {
        let (legal, _) = board.make_move(mv);
        if !legal {
            board.unmake_move();
            continue;
        }
        let score = -quiesce(board, -beta, -alpha, evaluator, time, stop)?;
        board.unmake_move();

        if score > best_score {
            best_score = score;
        }
        if best_score > alpha {
            alpha = best_score;
        }
        if alpha >= beta {
            break;
        }
    }

    Ok(best_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MaterialEvaluator;

    #[test]
    fn quiescence_from_a_quiet_position_returns_the_stand_pat_score() {
        let mut board = Board::new();
        let evaluator = MaterialEvaluator::new();
        let time = TimeControl::infinite();
        let stop = StopFlag::new();
        let score = quiesce(&mut board, -30_000, 30_000, &evaluator, &time, &stop).unwrap();
        assert!(score.abs() < 200);
    }

    #[test]
    fn a_free_hanging_queen_is_found_by_quiescence() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/4q3/4K3 w - - 0 1").unwrap();
        let evaluator = MaterialEvaluator::new();
        let time = TimeControl::infinite();
        let stop = StopFlag::new();
        let score = quiesce(&mut board, -30_000, 30_000, &evaluator, &time, &stop).unwrap();
        assert!(score < -500);
    }
}
