//! Alpha-beta search (spec.md §4.5 `dynamic_score`, the ten-step node
//! algorithm) wired together from the rest of `search::*`.
//!
//! Grounded on the teacher's `search/algorithms.rs` (`negamax`/
//! `search_moves`'s TT-probe/IID/null-move/PVS-with-LMR/killer-history
//! shape), generalized to the spec's explicit step ordering and formulas:
//! whole-node static-futility pruning (not present in the teacher), the
//! spec's exact adaptive null-move reduction, and a cooperative
//! `Result<_, Interrupted>` return in place of the teacher's ad hoc
//! `should_stop()` polling returning a plain score.

use crate::board::Board;
use crate::chess_move::Move;
use crate::constants::MATE_SCORE;
use crate::eval::Evaluator;
use crate::heuristics::{KillerMoves, MoveHistory};
use crate::search::extensions::{self, Extensions};
use crate::search::lmr;
use crate::search::move_picker::MovePicker;
use crate::search::pruning;
use crate::search::pv::PvTable;
use crate::search::quiescence;
use crate::search::time_control::{Interrupted, StopFlag, TimeControl};
use crate::tt::{Precision, TranspositionTable};
use crate::types::Piece;

/// Bundles the search's shared mutable state so `dynamic_score` doesn't
/// carry eight separate `&mut` parameters through every recursive call.
pub struct SearchState<'a, E: Evaluator> {
    pub tt: &'a mut TranspositionTable,
    pub killers: &'a mut KillerMoves,
    pub history: &'a mut MoveHistory,
    pub pv: &'a mut PvTable,
    pub evaluator: &'a E,
    pub time: &'a TimeControl,
    pub stop: &'a StopFlag,
}

fn is_pawn_push_to_seventh(board: &Board, mv: Move) -> bool {
    if !mv.is_pawn_move() {
        return false;
    }
    match board.current().side_to_move() {
        crate::types::Color::White => mv.to().rank() == 6,
        crate::types::Color::Black => mv.to().rank() == 1,
    }
}

/// Whether `mv` is exempt from late-move reduction and per-move futility
/// pruning (spec.md §4.5 step 9: "no reduction for captures, checks,
/// promotions, killers, castling, pawn push to 7th rank, or singular best
/// moves").
fn is_non_reducible(board: &Board, mv: Move) -> bool {
    mv.is_capture()
        || mv.is_promotion()
        || mv.killer_rank() > 0
        || mv.is_castling()
        || mv.is_best()
        || is_pawn_push_to_seventh(board, mv)
}

fn attacker_piece(board: &Board, mv: Move) -> Option<Piece> {
    mv.attacker().map(|cp| Piece::new(board.current().side_to_move(), cp))
}

/// Entry point: search the current position at `to_horizon` plies, root
/// ply `0`, full window.
pub fn dynamic_score<E: Evaluator>(
    board: &mut Board,
    state: &mut SearchState<'_, E>,
    to_horizon: u32,
    ply: u32,
    alpha: i32,
    beta: i32,
) -> Result<i32, Interrupted> {
    search_node(board, state, to_horizon, ply, alpha, beta, None)
}

/// The full node routine. `excluded` is only set by the singular-extension
/// probe's internal re-search, which skips one move at the *current* node
/// without threading the exclusion any deeper (spec.md §4.5 step 9).
#[allow(clippy::too_many_arguments)]
fn search_node<E: Evaluator>(
    board: &mut Board,
    state: &mut SearchState<'_, E>,
    to_horizon: u32,
    ply: u32,
    mut alpha: i32,
    mut beta: i32,
    excluded: Option<Move>,
) -> Result<i32, Interrupted> {
    // Step 1: time/node budget.
    let due = board.visit_node();
    state.time.poll(due, board.nodes(), state.stop)?;

    // Step 2: terminal draw.
    if board.is_terminal_draw() {
        return Ok(0);
    }

    // Step 3: mate distance pruning.
    let (a, b) = pruning::mate_distance_pruning(alpha, beta, ply);
    alpha = a;
    beta = b;
    if alpha >= beta {
        return Ok(alpha);
    }

    let key = board.current().zobrist();
    let in_check = board.current().in_check();

    // Step 4: cache probe (skipped for an excluded-move re-search node).
    let mut hash_move: Option<Move> = None;
    if excluded.is_none() {
        if let Some(probe) = state.tt.probe(key) {
            if let Some((from, to, promo)) = probe.best_move {
                hash_move = board.current().validate_move(from, to, promo);
            }
            if let Some(score) = probe.usable_score(to_horizon, alpha, beta, ply) {
                if score >= beta {
                    if let Some(mv) = hash_move {
                        if mv.is_quiet() {
                            if let Some(piece) = attacker_piece(board, mv) {
                                state.history.update(piece, mv.to(), 32);
                            }
                        }
                    }
                }
                return Ok(score);
            }
        }
    }

    // Step 5: tail-call quiescence at the horizon.
    if to_horizon == 0 {
        return quiescence::quiesce(board, alpha, beta, state.evaluator, state.time, state.stop);
    }

    let (static_score, is_drawn_endgame, phase) = state.evaluator.static_score(board.current());

    // Step 6: whole-node futility prune.
    if excluded.is_none()
        && pruning::should_prune_node_as_futile(in_check, is_drawn_endgame, beta, static_score, to_horizon)
    {
        return Ok(beta);
    }

    // Step 7: null-move pruning.
    if excluded.is_none()
        && static_score >= beta
        && pruning::null_move_eligible(board.current(), to_horizon, beta)
    {
        let reduction = pruning::null_move_reduction(static_score, beta);
        if to_horizon > reduction {
            board.make_null_move();
            let null_score = -search_node(
                board,
                state,
                to_horizon - 1 - reduction,
                ply + 1,
                -beta,
                -beta + 1,
                None,
            )?;
            board.unmake_null_move();
            if null_score >= beta {
                return Ok(beta);
            }
        }
    }

    // Step 8: internal iterative deepening.
    if excluded.is_none() && hash_move.is_none() && beta - alpha > 1 && to_horizon >= 4 {
        search_node(board, state, to_horizon - 2, ply, alpha, beta, None)?;
        if let Some(probe) = state.tt.probe(key) {
            if let Some((from, to, promo)) = probe.best_move {
                hash_move = board.current().validate_move(from, to, promo);
            }
        }
    }

    state.pv.clear_from(ply as usize + 1);

    let mut picker = MovePicker::new(
        board.current(),
        u64::MAX,
        hash_move,
        state.killers,
        state.history,
        ply as usize,
    );

    let original_alpha = alpha;
    let mut best_score = -(MATE_SCORE * 2);
    let mut best_move: Option<Move> = None;
    let mut legal_moves_played = 0usize;
    let mut quiet_number = 0usize;
    let mut quiets_tried: Vec<Move> = Vec::new();

    while let Some(mv) = picker.next() {
        if excluded == Some(mv) {
            continue;
        }

        let is_quiet = mv.is_quiet();
        let non_reducible = is_non_reducible(board, mv);

        let mut exts = Extensions::default();
        if mv.is_best() {
            if let Some(probe) = state.tt.probe(key) {
                let cached_best = probe
                    .best_move
                    .and_then(|(from, to, promo)| board.current().validate_move(from, to, promo));
                if extensions::singular_candidate(
                    to_horizon,
                    Some(mv),
                    cached_best,
                    probe.to_horizon,
                    probe.precision,
                ) {
                    let cached_score = probe.score;
                    exts.singular = extensions::singular_extension(to_horizon, cached_score, |lo, hi, horizon| {
                        search_node(board, state, horizon, ply, lo, hi, Some(mv)).unwrap_or(lo)
                    });
                }
            }
        }

        if is_quiet
            && !non_reducible
            && legal_moves_played > 0
            && !in_check
        {
            let location_delta = state.evaluator.piece_location_delta(board.current(), mv, phase);
            if pruning::should_futility_prune(to_horizon, static_score, location_delta, alpha, is_quiet) {
                continue;
            }
            if pruning::should_late_move_prune(to_horizon, quiet_number, is_quiet) {
                continue;
            }
        }

        let (legal, gives_check) = board.make_move(mv);
        if !legal {
            board.unmake_move();
            continue;
        }
        exts.check = extensions::check_extension(gives_check, legal_moves_played, to_horizon);

        let mut reduction = 0;
        if is_quiet && !non_reducible {
            reduction = lmr::reduction(quiet_number, to_horizon);
        }
        if gives_check {
            reduction = 0;
        }
        let full_horizon = to_horizon - 1 + exts.total();
        let reduced_horizon = full_horizon.saturating_sub(reduction);

        let score = if legal_moves_played == 0 {
            -search_node(board, state, full_horizon, ply + 1, -beta, -alpha, None)?
        } else {
            let mut s = -search_node(board, state, reduced_horizon, ply + 1, -alpha - 1, -alpha, None)?;
            if s > alpha && reduced_horizon < full_horizon {
                s = -search_node(board, state, full_horizon, ply + 1, -alpha - 1, -alpha, None)?;
            }
            if s > alpha && s < beta {
                s = -search_node(board, state, full_horizon, ply + 1, -beta, -alpha, None)?;
            }
            s
        };
        board.unmake_move();

        legal_moves_played += 1;
        if is_quiet {
            quiet_number += 1;
            quiets_tried.push(mv);
        }

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
            if score > alpha {
                alpha = score;
                state.pv.update(ply as usize, mv);
            }
        }

        if alpha >= beta {
            if is_quiet {
                if let Some(piece) = attacker_piece(board, mv) {
                    state.killers.update(ply as usize, piece, mv.to());
                    state.history.update(piece, mv.to(), 32);
                }
                for &prior in quiets_tried.iter().take(quiets_tried.len().saturating_sub(1)) {
                    if let Some(piece) = attacker_piece(board, prior) {
                        state.history.update(piece, prior.to(), -32);
                    }
                }
            }
            break;
        }
    }

    if excluded.is_none() && legal_moves_played == 0 {
        let score = if in_check { state.evaluator.mated_score(ply) } else { 0 };
        return Ok(score);
    }

    if excluded.is_none() {
        let precision = if best_score <= original_alpha {
            Precision::UpperBound
        } else if best_score >= beta {
            Precision::LowerBound
        } else {
            Precision::Exact
        };
        state.tt.store(key, to_horizon, best_score, precision, best_move, ply);
    }

    Ok(best_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MaterialEvaluator;
    use crate::tt::TranspositionTable;

    fn fresh_state() -> (TranspositionTable, KillerMoves, MoveHistory, PvTable, MaterialEvaluator) {
        (
            TranspositionTable::with_size_mb(1),
            KillerMoves::new(64),
            MoveHistory::new(),
            PvTable::new(),
            MaterialEvaluator::new(),
        )
    }

    #[test]
    fn shallow_search_from_startpos_does_not_panic_and_returns_a_move() {
        let mut board = Board::new();
        let (mut tt, mut killers, mut history, mut pv, evaluator) = fresh_state();
        let time = TimeControl::infinite();
        let stop = StopFlag::new();
        let mut state = SearchState {
            tt: &mut tt,
            killers: &mut killers,
            history: &mut history,
            pv: &mut pv,
            evaluator: &evaluator,
            time: &time,
            stop: &stop,
        };
        let score = dynamic_score(&mut board, &mut state, 3, 0, -30_000, 30_000).unwrap();
        assert!(score.abs() < 30_000);
        assert!(!state.pv.line(0).is_empty());
    }

    #[test]
    fn a_mate_in_one_is_found() {
        // Classic back-rank mate: Black's own pawns block every escape
        // square, so Ra1-a8 is mate in one.
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let (mut tt, mut killers, mut history, mut pv, evaluator) = fresh_state();
        let time = TimeControl::infinite();
        let stop = StopFlag::new();
        let mut state = SearchState {
            tt: &mut tt,
            killers: &mut killers,
            history: &mut history,
            pv: &mut pv,
            evaluator: &evaluator,
            time: &time,
            stop: &stop,
        };
        let score = dynamic_score(&mut board, &mut state, 4, 0, -30_000, 30_000).unwrap();
        assert!(score > 25_000, "expected a mate score, got {score}");
    }

    #[test]
    fn stalemate_position_scores_as_a_draw() {
        let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let (mut tt, mut killers, mut history, mut pv, evaluator) = fresh_state();
        let time = TimeControl::infinite();
        let stop = StopFlag::new();
        let mut state = SearchState {
            tt: &mut tt,
            killers: &mut killers,
            history: &mut history,
            pv: &mut pv,
            evaluator: &evaluator,
            time: &time,
            stop: &stop,
        };
        let score = dynamic_score(&mut board, &mut state, 2, 0, -30_000, 30_000).unwrap();
        assert_eq!(score, 0);
    }
}
