//! Core scalar types: squares, colors, and pieces.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A square on the board, or the sentinel [`Square::ILLEGAL`].
///
/// Index layout follows the spec's own mapping rather than the usual
/// `a1=0` convention: `A8 = 0`, `H1 = 63`, with `index = file + 8*(7-rank)`
/// (file 0=a..7=h, rank 0=1..7=8). Ranks decrease toward white's back rank
/// as the index increases.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// Sentinel value meaning "no square" (e.g. an absent en-passant target).
    pub const ILLEGAL: Square = Square(64);

    /// Build a square from 0-based `file` (a=0..h=7) and `rank` (1=0..8=7).
    #[inline]
    #[must_use]
    pub const fn new(file: usize, rank: usize) -> Self {
        Square((file + 8 * (7 - rank)) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn try_new(file: usize, rank: usize) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Square::new(file, rank))
        } else {
            None
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        Square(idx as u8)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_legal(self) -> bool {
        self.0 < 64
    }

    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 as usize) % 8
    }

    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        7 - (self.0 as usize) / 8
    }

    /// Rank of this square as used by pawn-direction logic: 0 is white's
    /// back rank, 7 is black's back rank.
    #[inline]
    #[must_use]
    pub const fn rank_from_white(self) -> usize {
        self.rank()
    }

    #[must_use]
    pub fn offset(self, file_delta: i32, rank_delta: i32) -> Option<Square> {
        let f = self.file() as i32 + file_delta;
        let r = self.rank() as i32 + rank_delta;
        if (0..8).contains(&f) && (0..8).contains(&r) {
            Some(Square::new(f as usize, r as usize))
        } else {
            None
        }
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_legal() {
            write!(f, "{self}")
        } else {
            write!(f, "Square(illegal)")
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_legal() {
            return write!(f, "-");
        }
        write!(
            f,
            "{}{}",
            (b'a' + self.file() as u8) as char,
            self.rank() + 1
        )
    }
}

impl FromStr for Square {
    type Err = crate::error::SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(crate::error::SquareError::InvalidNotation {
                notation: s.to_string(),
            });
        }
        let file = bytes[0];
        let rank = bytes[1];
        if !(b'a'..=b'h').contains(&file) {
            return Err(crate::error::SquareError::InvalidNotation {
                notation: s.to_string(),
            });
        }
        if !(b'1'..=b'8').contains(&rank) {
            return Err(crate::error::SquareError::InvalidNotation {
                notation: s.to_string(),
            });
        }
        let file = (file - b'a') as usize;
        let rank = (rank - b'1') as usize;
        Ok(Square::new(file, rank))
    }
}

/// Side to move / side owning a piece.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline]
    #[must_use]
    pub const fn enemy(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        match idx {
            0 => Color::White,
            _ => Color::Black,
        }
    }

    /// Direction pawns of this color move in, expressed as a rank delta.
    #[inline]
    #[must_use]
    pub const fn pawn_rank_delta(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

/// A piece type without color information.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorlessPiece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

pub const ALL_COLORLESS_PIECES: [ColorlessPiece; 6] = [
    ColorlessPiece::Pawn,
    ColorlessPiece::Knight,
    ColorlessPiece::Bishop,
    ColorlessPiece::Rook,
    ColorlessPiece::Queen,
    ColorlessPiece::King,
];

impl ColorlessPiece {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        match idx {
            0 => ColorlessPiece::Pawn,
            1 => ColorlessPiece::Knight,
            2 => ColorlessPiece::Bishop,
            3 => ColorlessPiece::Rook,
            4 => ColorlessPiece::Queen,
            _ => ColorlessPiece::King,
        }
    }

    #[must_use]
    pub const fn to_char(self) -> char {
        match self {
            ColorlessPiece::Pawn => 'p',
            ColorlessPiece::Knight => 'n',
            ColorlessPiece::Bishop => 'b',
            ColorlessPiece::Rook => 'r',
            ColorlessPiece::Queen => 'q',
            ColorlessPiece::King => 'k',
        }
    }

    #[must_use]
    pub const fn from_char(c: char) -> Option<ColorlessPiece> {
        match c.to_ascii_lowercase() {
            'p' => Some(ColorlessPiece::Pawn),
            'n' => Some(ColorlessPiece::Knight),
            'b' => Some(ColorlessPiece::Bishop),
            'r' => Some(ColorlessPiece::Rook),
            'q' => Some(ColorlessPiece::Queen),
            'k' => Some(ColorlessPiece::King),
            _ => None,
        }
    }
}

/// A colored piece, or [`Piece::NONE`] for an empty square. Stored as
/// `1 + color*6 + colorless.index()` so `0` is free for "none".
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece(u8);

impl Piece {
    pub const NONE: Piece = Piece(0);

    #[inline]
    #[must_use]
    pub const fn new(color: Color, piece: ColorlessPiece) -> Self {
        Piece(1 + color.index() as u8 * 6 + piece.index() as u8)
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        if self.is_none() {
            None
        } else if (self.0 - 1) < 6 {
            Some(Color::White)
        } else {
            Some(Color::Black)
        }
    }

    #[inline]
    #[must_use]
    pub const fn colorless(self) -> Option<ColorlessPiece> {
        if self.is_none() {
            None
        } else {
            Some(ColorlessPiece::from_index(((self.0 - 1) % 6) as usize))
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub fn to_char(self) -> char {
        match self.colorless() {
            None => '.',
            Some(p) => {
                let c = p.to_char();
                match self.color() {
                    Some(Color::White) => c.to_ascii_uppercase(),
                    _ => c,
                }
            }
        }
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Piece({})", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_mapping_matches_spec() {
        assert_eq!(Square::new(0, 7).index(), 0); // a8
        assert_eq!(Square::new(7, 0).index(), 63); // h1
    }

    #[test]
    fn square_round_trips_through_display_and_parse() {
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            let s = sq.to_string();
            let parsed: Square = s.parse().unwrap();
            assert_eq!(parsed, sq);
        }
    }

    #[test]
    fn color_enemy_is_involution() {
        assert_eq!(Color::White.enemy().enemy(), Color::White);
    }

    #[test]
    fn piece_round_trips_color_and_kind() {
        for &color in &[Color::White, Color::Black] {
            for &cp in &ALL_COLORLESS_PIECES {
                let p = Piece::new(color, cp);
                assert_eq!(p.color(), Some(color));
                assert_eq!(p.colorless(), Some(cp));
            }
        }
        assert!(Piece::NONE.is_none());
    }
}
