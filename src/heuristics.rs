//! Move-ordering heuristics the search consults but does not own: killer
//! moves and the decaying history table (spec.md §4.6).
//!
//! Grounded on the teacher's `ordering.rs` (`OrderingContext`'s per-depth
//! killer slots and piece/square history table), generalized to the packed
//! `(piece, to)` key and the gravity-style decay formula the spec prescribes
//! in place of the teacher's plain saturating add.

use crate::constants::MAX_HISTORY;
use crate::types::{Piece, Square};

/// Two killer-move slots per search ply, keyed by the moving colored piece
/// and destination square rather than the full [`crate::chess_move::Move`]
/// (a position recurring at a different ply still recognizes the same
/// killer).
pub struct KillerMoves {
    slots: Vec<[Option<(Piece, Square)>; 2]>,
}

impl KillerMoves {
    #[must_use]
    pub fn new(max_ply: usize) -> Self {
        KillerMoves {
            slots: vec![[None, None]; max_ply + 1],
        }
    }

    /// Record a cutoff at `ply` for `(piece, to)`. The existing slot 0 moves
    /// to slot 1 and the new pair takes slot 0, unless it was already there.
    pub fn update(&mut self, ply: usize, piece: Piece, to: Square) {
        let Some(slot) = self.slots.get_mut(ply) else { return };
        if slot[0] == Some((piece, to)) {
            return;
        }
        slot[1] = slot[0];
        slot[0] = Some((piece, to));
    }

    /// Ordering bonus for `(piece, to)` at `ply`: 2 for the primary killer,
    /// 1 for the secondary, 0 otherwise.
    #[must_use]
    pub fn value(&self, ply: usize, piece: Piece, to: Square) -> u8 {
        let Some(slot) = self.slots.get(ply) else { return 0 };
        if slot[0] == Some((piece, to)) {
            2
        } else if slot[1] == Some((piece, to)) {
            1
        } else {
            0
        }
    }

    /// Shift killer slots `amount` plies toward the root, so the table
    /// keeps tracking "this ply" across iterative-deepening iterations
    /// whose root moves change the tree shape underneath it. An
    /// out-of-range shift resets the table entirely rather than guessing at
    /// partial semantics.
    pub fn shift(&mut self, amount: usize) {
        if amount == 0 {
            return;
        }
        if amount >= self.slots.len() {
            self.reset();
            return;
        }
        for ply in 0..self.slots.len() - amount {
            self.slots[ply] = self.slots[ply + amount];
        }
        for slot in &mut self.slots[self.slots.len() - amount..] {
            *slot = [None, None];
        }
    }

    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            *slot = [None, None];
        }
    }
}

const HISTORY_SLOTS: usize = 13; // Piece::as_index() ranges 0 (none, unused) ..= 12.
const HISTORY_DIVISOR: i64 = 1024;

/// Signed, decaying `(piece, to-square)` history table. Values move toward
/// `±MAX_HISTORY` under repeated same-sign updates and never overshoot it.
pub struct MoveHistory {
    table: Vec<i32>,
}

impl MoveHistory {
    #[must_use]
    pub fn new() -> Self {
        MoveHistory {
            table: vec![0; HISTORY_SLOTS * 64],
        }
    }

    fn index(piece: Piece, to: Square) -> usize {
        piece.as_index() * 64 + to.index()
    }

    #[must_use]
    pub fn value(&self, piece: Piece, to: Square) -> i32 {
        self.table[Self::index(piece, to)]
    }

    /// Apply the gravity-style decay update: `h += increment*1024 -
    /// h*|increment|/1024`, which asymptotes at `±MAX_HISTORY` because
    /// `1024 * 1024 == MAX_HISTORY`.
    pub fn update(&mut self, piece: Piece, to: Square, increment: i32) {
        let idx = Self::index(piece, to);
        let h = self.table[idx] as i64;
        let inc = increment as i64;
        let updated = h + inc * HISTORY_DIVISOR - h * inc.abs() / HISTORY_DIVISOR;
        self.table[idx] = updated.clamp(-(MAX_HISTORY as i64), MAX_HISTORY as i64) as i32;
    }

    /// Age every entry by `244/256` between iterative-deepening iterations.
    pub fn age(&mut self) {
        for h in &mut self.table {
            *h = ((*h as i64 * 244) / 256) as i32;
        }
    }

    pub fn reset(&mut self) {
        for h in &mut self.table {
            *h = 0;
        }
    }
}

impl Default for MoveHistory {
    fn default() -> Self {
        MoveHistory::new()
    }
}
