//! Search engine: iterative deepening, alpha-beta with its selectivity
//! heuristics, quiescence, the transposition cache and move-ordering
//! heuristics it consults, and the ambient time manager / strength limiter
//! (spec.md §4.5-§4.8).
//!
//! Grounded on the teacher's top-level `engine.rs` (`SimpleEngine`/
//! `SearchOptions` owning the board, TT, and a sink for intermediate best
//! moves) for the struct this module exposes; the submodules below are each
//! grounded individually (see DESIGN.md).

pub mod alphabeta;
pub mod extensions;
pub mod iterative;
pub mod limiter;
pub mod lmr;
pub mod move_picker;
pub mod pruning;
pub mod pv;
pub mod quiescence;
pub mod time_control;

use crate::board::Board;
use crate::chess_move::Move;
use crate::eval::Evaluator;
use crate::heuristics::{KillerMoves, MoveHistory};
use crate::search::iterative::SearchProgress;
use crate::search::limiter::StrengthLimiter;
use crate::search::pv::PvTable;
use crate::search::time_control::{StopFlag, TimeBudgetInput, TimeControl};
use crate::tt::TranspositionTable;

/// Owns every piece of mutable state one search needs across its lifetime:
/// the transposition cache, the two move-ordering heuristics, the PV table,
/// the cooperative stop flag, and (optionally) a strength limiter. A driver
/// creates one `SearchEngine` per game and calls [`SearchEngine::go`] once
/// per move.
pub struct SearchEngine<E: Evaluator> {
    tt: TranspositionTable,
    killers: KillerMoves,
    history: MoveHistory,
    pv: PvTable,
    evaluator: E,
    stop: StopFlag,
    limiter: StrengthLimiter,
    multi_pv: usize,
    analysis_mode: bool,
}

impl<E: Evaluator> SearchEngine<E> {
    #[must_use]
    pub fn new(evaluator: E, tt_size_mb: usize) -> Self {
        SearchEngine {
            tt: TranspositionTable::with_size_mb(tt_size_mb),
            killers: KillerMoves::new(crate::constants::MAX_PLY),
            history: MoveHistory::new(),
            pv: PvTable::new(),
            evaluator,
            stop: StopFlag::new(),
            limiter: StrengthLimiter::full_strength(),
            multi_pv: 1,
            analysis_mode: false,
        }
    }

    #[must_use]
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    pub fn set_multi_pv(&mut self, multi_pv: usize) {
        self.multi_pv = multi_pv.max(1);
    }

    pub fn set_analysis_mode(&mut self, analysis_mode: bool) {
        self.analysis_mode = analysis_mode;
    }

    pub fn set_strength_limiter(&mut self, limiter: StrengthLimiter) {
        self.limiter = limiter;
    }

    /// Drop all search-lifetime state for a new game (spec.md "new game"
    /// lifecycle): clear the cache, killer table, and history, and reset
    /// the stop flag so a prior "stop" doesn't leak into the next search.
    pub fn new_game(&mut self) {
        self.tt.clear();
        self.killers.reset();
        self.history.reset();
        self.stop.reset();
    }

    /// Run one iterative-deepening search from `board`'s current position
    /// under `budget`, reporting progress via `on_progress`, and return the
    /// chosen move (subject to the strength limiter). `board` is left at
    /// its position on return; the caller owns make/unmake of the chosen
    /// move.
    pub fn go(
        &mut self,
        board: &mut Board,
        budget: TimeBudgetInput,
        mut on_progress: impl FnMut(SearchProgress<'_>),
    ) -> Option<Move> {
        self.stop.reset();
        let time = TimeControl::new(budget);
        let legal = board.current().legal_moves();
        if legal.len() == 1 && !self.analysis_mode {
            return Some(legal[0]);
        }

        let ranked = iterative::search(
            board,
            &mut self.tt,
            &mut self.killers,
            &mut self.history,
            &mut self.pv,
            &self.evaluator,
            &time,
            &self.stop,
            self.multi_pv,
            self.analysis_mode,
            &mut on_progress,
        )?;

        if self.limiter.is_limiting() {
            self.limiter.pick_move(&ranked)
        } else {
            Some(ranked[0].0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::MaterialEvaluator;

    #[test]
    fn a_fresh_engine_finds_a_move_from_startpos() {
        let mut engine = SearchEngine::new(MaterialEvaluator::new(), 1);
        let mut board = Board::new();
        let budget = TimeBudgetInput {
            depth_limit: Some(3),
            ..Default::default()
        };
        let mv = engine.go(&mut board, budget, |_| {});
        assert!(mv.is_some());
    }

    #[test]
    fn new_game_clears_the_cache() {
        let mut engine = SearchEngine::new(MaterialEvaluator::new(), 1);
        let mut board = Board::new();
        let budget = TimeBudgetInput {
            depth_limit: Some(2),
            ..Default::default()
        };
        engine.go(&mut board, budget, |_| {});
        assert!(engine.tt.hashfull_permille() > 0, "search should have populated the cache");
        engine.new_game();
        assert_eq!(engine.tt.hashfull_permille(), 0);
    }
}
