//! Zobrist key tables.
//!
//! Keys are generated once from a fixed seed via a scoped `StdRng` (Design
//! Notes §9: no process-global RNG), so runs are reproducible across
//! processes without persisting anything.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{Color, ColorlessPiece, Square};

const ZOBRIST_SEED: u64 = 0x5EED_C0FF_EE15_C0DE;

pub struct ZobristKeys {
    /// `piece[color][colorless_piece][square]`
    pub piece: [[[u64; 64]; 6]; 2],
    pub side_to_move: u64,
    /// `castling[0..16]`, one key per castling-rights bitfield value so the
    /// side/castling/en-passant terms can be folded in with a single XOR
    /// each, independent of the piece-placement subkey.
    pub castling: [u64; 16],
    /// One key per file, since only the file of an en-passant target square
    /// matters for repetition purposes.
    pub en_passant_file: [u64; 8],
}

impl ZobristKeys {
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut piece = [[[0u64; 64]; 6]; 2];
        for color in &mut piece {
            for pc in color.iter_mut() {
                for key in pc.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        let side_to_move = rng.gen();
        let mut castling = [0u64; 16];
        for key in &mut castling {
            *key = rng.gen();
        }
        let mut en_passant_file = [0u64; 8];
        for key in &mut en_passant_file {
            *key = rng.gen();
        }
        ZobristKeys {
            piece,
            side_to_move,
            castling,
            en_passant_file,
        }
    }
}

pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(ZobristKeys::new);

#[inline]
#[must_use]
pub fn piece_key(color: Color, piece: ColorlessPiece, sq: Square) -> u64 {
    ZOBRIST.piece[color.index()][piece.index()][sq.index()]
}

#[inline]
#[must_use]
pub fn side_to_move_key() -> u64 {
    ZOBRIST.side_to_move
}

#[inline]
#[must_use]
pub fn castling_key(rights: u8) -> u64 {
    ZOBRIST.castling[rights as usize & 0xF]
}

#[inline]
#[must_use]
pub fn en_passant_key(sq: Square) -> u64 {
    if sq.is_legal() {
        ZOBRIST.en_passant_file[sq.file()]
    } else {
        0
    }
}
