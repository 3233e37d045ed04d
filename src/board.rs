//! Board: the position history stack plus the node/time bookkeeping the
//! search consults (spec.md §3 "Board").
//!
//! Precomputed attack tables are process-wide statics in [`crate::attacks`]
//! rather than fields here; every other piece of mutable per-search state
//! the spec assigns to the board — the position stack, the node counter, the
//! "next time to examine time" watermark — lives on this struct.

use crate::chess_move::Move;
use crate::error::FenError;
use crate::position::fen::STARTPOS_FEN;
use crate::position::Position;

/// How many nodes elapse between polls of the clock/stop-flag. Chosen the
/// way the teacher's search loop throttles time checks: frequent enough that
/// a "go movetime 100" doesn't overrun by much, rare enough that the syscall
/// doesn't show up in a profile.
pub const NODES_BETWEEN_TIME_CHECKS: u64 = 2048;

/// Owns the ordered stack of positions (current + history) a search plays
/// and unplays moves against. Making a move copies the current position onto
/// the next stack slot then mutates it in place; unmaking pops it back off.
#[derive(Clone)]
pub struct Board {
    stack: Vec<Position>,
    nodes: u64,
    next_time_check: u64,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Board {
            stack: vec![Position::startpos()],
            nodes: 0,
            next_time_check: NODES_BETWEEN_TIME_CHECKS,
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let pos = crate::position::fen::parse_fen(fen)?;
        Ok(Board {
            stack: vec![pos],
            nodes: 0,
            next_time_check: NODES_BETWEEN_TIME_CHECKS,
        })
    }

    #[must_use]
    pub fn startpos_fen() -> &'static str {
        STARTPOS_FEN
    }

    /// Reset to a fresh game, clearing history and counters ("new game").
    pub fn reset(&mut self) {
        self.stack.clear();
        self.stack.push(Position::startpos());
        self.nodes = 0;
        self.next_time_check = NODES_BETWEEN_TIME_CHECKS;
    }

    #[must_use]
    pub fn current(&self) -> &Position {
        self.stack.last().expect("board stack is never empty")
    }

    #[must_use]
    pub fn ply(&self) -> usize {
        self.stack.len() - 1
    }

    #[must_use]
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Bump the node counter and report whether a time/stop check is due.
    pub fn visit_node(&mut self) -> bool {
        self.nodes += 1;
        if self.nodes >= self.next_time_check {
            self.next_time_check = self.nodes + NODES_BETWEEN_TIME_CHECKS;
            true
        } else {
            false
        }
    }

    /// Copy the current position onto the next stack slot and apply `mv` to
    /// it in place. Returns `(legal, gives_check)`; on illegality the caller
    /// is expected to call [`Board::unmake_move`] to restore the stack.
    pub fn make_move(&mut self, mv: Move) -> (bool, bool) {
        let mut next = self.current().clone();
        let result = next.apply_move_in_place(mv);
        self.stack.push(next);
        result
    }

    /// Pop the most recently played position, restoring the prior one.
    pub fn unmake_move(&mut self) {
        self.stack.pop();
        debug_assert!(!self.stack.is_empty(), "unmake_move popped the root position");
    }

    /// Push a copy of the current position with the side to move passed
    /// (null-move pruning, spec.md §4.5 step 7). Paired with
    /// [`Board::unmake_null_move`].
    pub fn make_null_move(&mut self) {
        let mut next = self.current().clone();
        next.apply_null_move();
        self.stack.push(next);
    }

    pub fn unmake_null_move(&mut self) {
        self.unmake_move();
    }

    /// Replay `moves` (long algebraic) from the current position, as the
    /// driver's "set position ... moves ..." command does.
    pub fn replay(&mut self, moves: &[&str]) -> Result<(), crate::error::MoveParseError> {
        for text in moves {
            let mv = crate::position::san::parse_long_algebraic(self.current(), text)?;
            let (legal, _) = self.make_move(mv);
            if !legal {
                self.unmake_move();
                return Err(crate::error::MoveParseError::IllegalInPosition {
                    notation: (*text).to_string(),
                    fen: self.current().to_fen(),
                });
            }
        }
        Ok(())
    }

    /// 50-move rule, insufficient material, or threefold repetition
    /// (spec.md §4.5 step 2, §8 "Threefold repetition and 50-move rule").
    #[must_use]
    pub fn is_terminal_draw(&self) -> bool {
        let pos = self.current();
        if pos.halfmove_clock() >= 100 {
            return true;
        }
        if Self::is_insufficient_material(pos) {
            return true;
        }
        self.is_repetition()
    }

    fn is_insufficient_material(pos: &Position) -> bool {
        use crate::types::{Color, ColorlessPiece};
        for &color in &[Color::White, Color::Black] {
            if pos.piece_bitboard(color, ColorlessPiece::Pawn) != 0
                || pos.piece_bitboard(color, ColorlessPiece::Rook) != 0
                || pos.piece_bitboard(color, ColorlessPiece::Queen) != 0
            {
                return false;
            }
        }
        let minor_count = |color: Color| {
            crate::bits::popcount(pos.piece_bitboard(color, ColorlessPiece::Knight))
                + crate::bits::popcount(pos.piece_bitboard(color, ColorlessPiece::Bishop))
        };
        minor_count(Color::White) + minor_count(Color::Black) <= 1
    }

    /// Threefold repetition, scanning back only as far as the last
    /// irreversible move (capture, pawn move, or loss of castling rights)
    /// since earlier positions can never recur.
    fn is_repetition(&self) -> bool {
        let current = self.current();
        let key = current.zobrist();
        let clock = current.halfmove_clock() as usize;
        let lookback = clock.min(self.stack.len().saturating_sub(1));
        let mut seen = 0;
        for i in 1..=lookback {
            let idx = self.stack.len() - 1 - i;
            if self.stack[idx].zobrist() == key {
                seen += 1;
                if seen >= 2 {
                    return true;
                }
            }
        }
        false
    }

    /// Leaf-node count at `depth` from the current position (spec.md §8
    /// "Perft equivalence").
    #[must_use]
    pub fn perft(&self, depth: u32) -> u64 {
        self.current().perft(depth)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}
