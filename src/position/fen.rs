//! FEN (Forsyth-Edwards Notation) encoding and decoding (spec.md §6).

use super::{
    castling_rights_for_king_start, king_start, Position, BLACK_KINGSIDE, BLACK_QUEENSIDE,
    WHITE_KINGSIDE, WHITE_QUEENSIDE,
};
use crate::error::FenError;
use crate::types::{Color, ColorlessPiece, Square};

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Parse a standard six-field FEN string into a [`Position`].
pub fn parse_fen(fen: &str) -> Result<Position, FenError> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() < 4 {
        return Err(FenError::TooFewFields { found: fields.len() });
    }

    let mut pos = Position::empty();
    parse_piece_placement(&mut pos, fields[0])?;

    pos.side_to_move = match fields[1] {
        "w" => Color::White,
        "b" => Color::Black,
        other => {
            return Err(FenError::InvalidSideToMove {
                token: other.to_string(),
            })
        }
    };

    pos.castling_rights = parse_castling(fields[2])?;

    pos.ep_square = if fields[3] == "-" {
        Square::ILLEGAL
    } else {
        fields[3]
            .parse()
            .map_err(|_| FenError::InvalidEnPassant {
                token: fields[3].to_string(),
            })?
    };

    pos.halfmove_clock = if fields.len() > 4 {
        fields[4].parse().map_err(|_| FenError::InvalidHalfmoveClock {
            token: fields[4].to_string(),
        })?
    } else {
        0
    };

    pos.fullmove_number = if fields.len() > 5 {
        fields[5]
            .parse()
            .map_err(|_| FenError::InvalidFullmoveNumber {
                token: fields[5].to_string(),
            })?
    } else {
        1
    };

    pos.in_check = pos.king_in_check(pos.side_to_move);
    pos.recompute_zobrist();
    pos.pinned = pos.compute_pinned();
    Ok(pos)
}

fn parse_piece_placement(pos: &mut Position, field: &str) -> Result<(), FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::WrongRankCount { found: ranks.len() });
    }
    for (rank_idx, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - rank_idx; // first FEN rank is rank 8 (index 7)
        let mut file = 0usize;
        for ch in rank_str.chars() {
            if let Some(empty) = ch.to_digit(10) {
                file += empty as usize;
                if file > 8 {
                    return Err(FenError::TooManyFilesInRank { rank: rank_idx });
                }
                continue;
            }
            if file >= 8 {
                return Err(FenError::TooManyFilesInRank { rank: rank_idx });
            }
            let color = if ch.is_ascii_uppercase() { Color::White } else { Color::Black };
            let cp = ColorlessPiece::from_char(ch).ok_or(FenError::InvalidPiece { token: ch })?;
            let sq = Square::new(file, rank);
            pos.put_piece(color, cp, sq);
            file += 1;
        }
        if file != 8 {
            return Err(FenError::TooFewFilesInRank { rank: rank_idx });
        }
    }
    Ok(())
}

fn parse_castling(field: &str) -> Result<u8, FenError> {
    if field == "-" {
        return Ok(0);
    }
    let mut rights = 0u8;
    for ch in field.chars() {
        rights |= match ch {
            'K' => WHITE_KINGSIDE,
            'Q' => WHITE_QUEENSIDE,
            'k' => BLACK_KINGSIDE,
            'q' => BLACK_QUEENSIDE,
            other => return Err(FenError::InvalidCastling { token: other }),
        };
    }
    Ok(rights)
}

/// Encode a [`Position`] back into a standard six-field FEN string.
pub fn to_fen(pos: &Position) -> String {
    let mut placement = String::new();
    for rank_idx in 0..8 {
        let rank = 7 - rank_idx;
        let mut empty_run = 0u32;
        for file in 0..8 {
            let sq = Square::new(file, rank);
            let piece = pos.piece_at(sq);
            if piece.is_none() {
                empty_run += 1;
                continue;
            }
            if empty_run > 0 {
                placement.push_str(&empty_run.to_string());
                empty_run = 0;
            }
            placement.push(piece.to_char());
        }
        if empty_run > 0 {
            placement.push_str(&empty_run.to_string());
        }
        if rank_idx != 7 {
            placement.push('/');
        }
    }

    let side = match pos.side_to_move() {
        Color::White => "w",
        Color::Black => "b",
    };

    let mut castling = String::new();
    if pos.castling_rights() & WHITE_KINGSIDE != 0 {
        castling.push('K');
    }
    if pos.castling_rights() & WHITE_QUEENSIDE != 0 {
        castling.push('Q');
    }
    if pos.castling_rights() & BLACK_KINGSIDE != 0 {
        castling.push('k');
    }
    if pos.castling_rights() & BLACK_QUEENSIDE != 0 {
        castling.push('q');
    }
    if castling.is_empty() {
        castling.push('-');
    }

    let ep = if pos.en_passant_square().is_legal() {
        pos.en_passant_square().to_string()
    } else {
        "-".to_string()
    };

    format!(
        "{} {} {} {} {} {}",
        placement,
        side,
        castling,
        ep,
        pos.halfmove_clock(),
        pos.fullmove_number()
    )
}

/// Sanity-check helper used by callers building a fresh `Position` by hand
/// (e.g. future opening-book loaders): confirms rights are internally
/// consistent with where the king currently sits.
#[must_use]
pub fn default_rights_if_king_home(pos: &Position, color: Color) -> u8 {
    if pos.king_square(color) == king_start(color) {
        castling_rights_for_king_start(color)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_round_trips() {
        let pos = parse_fen(STARTPOS_FEN).unwrap();
        assert_eq!(to_fen(&pos), STARTPOS_FEN);
    }

    #[test]
    fn kiwipete_round_trips() {
        let kiwipete = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        let pos = parse_fen(kiwipete).unwrap();
        assert_eq!(to_fen(&pos), kiwipete);
    }

    #[test]
    fn halfmove_clock_is_not_part_of_the_zobrist_key() {
        let a = parse_fen("8/8/8/8/8/8/4K3/4k3 w - - 0 1").unwrap();
        let b = parse_fen("8/8/8/8/8/8/4K3/4k3 w - - 37 1").unwrap();
        assert_eq!(a.zobrist(), b.zobrist());
    }

    #[test]
    fn rejects_malformed_fen() {
        assert!(parse_fen("not a fen").is_err());
        assert!(parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1").is_err());
    }
}
