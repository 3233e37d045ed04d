//! Triangular principal-variation table (spec.md §4.5 "Principal variation
//! is a triangular table of size MaxHorizon+2 per root move").
//!
//! Not grounded on the teacher, which tracks only the single best move per
//! node rather than a full triangular table; this is new machinery required
//! by the spec's multi-PV and progress-reporting requirements.

use crate::chess_move::Move;
use crate::constants::MAX_PLY;

pub struct PvTable {
    table: Vec<Vec<Move>>,
    length: Vec<usize>,
}

impl PvTable {
    #[must_use]
    pub fn new() -> Self {
        PvTable {
            table: vec![vec![Move::NULL; MAX_PLY + 2]; MAX_PLY + 2],
            length: vec![0; MAX_PLY + 2],
        }
    }

    /// Clear the continuation tracked at and below `ply` before searching a
    /// node's children.
    pub fn clear_from(&mut self, ply: usize) {
        if ply < self.length.len() {
            self.length[ply] = 0;
        }
    }

    /// Record `mv` as the best move at `ply`, and splice in the
    /// continuation already found at `ply + 1` (spec.md: "an improving move
    /// at ply p copies the continuation from ply p+1 behind itself").
    pub fn update(&mut self, ply: usize, mv: Move) {
        self.table[ply][0] = mv;
        let child_len = self.length.get(ply + 1).copied().unwrap_or(0);
        for i in 0..child_len {
            self.table[ply][i + 1] = self.table[ply + 1][i];
        }
        self.length[ply] = child_len + 1;
    }

    #[must_use]
    pub fn line(&self, ply: usize) -> &[Move] {
        let len = self.length.get(ply).copied().unwrap_or(0);
        &self.table[ply][..len]
    }
}

impl Default for PvTable {
    fn default() -> Self {
        PvTable::new()
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
    fn update_splices_child_continuation_behind_the_move() {
        let mut pv = PvTable::new();
        pv.update(2, mv(10, 18));
        pv.update(1, mv(8, 16));
        let line = pv.line(1);
        assert_eq!(line.len(), 2);
        assert_eq!(line[0], mv(8, 16));
        assert_eq!(line[1], mv(10, 18));
    }

    #[test]
    fn clear_from_truncates_the_line() {
        let mut pv = PvTable::new();
        pv.update(1, mv(8, 16));
        pv.clear_from(1);
        assert!(pv.line(1).is_empty());
    }
}
