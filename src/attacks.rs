//! Precomputed attack tables: pawn/knight/king masks, between-square masks,
//! and a fancy (non-multiplicative) sliding-attack lookup for bishops and
//! rooks.
//!
//! Sliding attacks are built the way the teacher's `magic` module builds
//! them: for each square, compute the "relevant occupancy" mask (blocker
//! squares excluding the board edge in each ray direction), enumerate every
//! subset of that mask via [`crate::bits::subsets`], and flatten the
//! resulting per-subset attack sets into one contiguous table indexed by
//! `offset[square] + index_of(blockers & mask)`. No multiplicative magic
//! constant is needed because the blocker bits are packed densely in the
//! same order they were enumerated.

use once_cell::sync::Lazy;

use crate::bits::{popcount, subsets};
use crate::types::{Color, Square};

// All of these walk a ray in (file, rank) space and convert back to a
// `Square` for each step, so the resulting bit position always matches
// `Square::index()`'s layout regardless of what that mapping is.

fn ray_mask(sq: usize, deltas: &[(i32, i32)], stop_before_edge: bool) -> u64 {
    let origin = Square::from_index(sq);
    let file = origin.file() as i32;
    let rank = origin.rank() as i32;
    let mut mask = 0u64;
    for &(dr, df) in deltas {
        let mut r = rank + dr;
        let mut f = file + df;
        loop {
            if !(0..8).contains(&r) || !(0..8).contains(&f) {
                break;
            }
            if stop_before_edge && (r == 0 || r == 7 || f == 0 || f == 7) {
                break;
            }
            mask |= 1u64 << Square::new(f as usize, r as usize).index();
            r += dr;
            f += df;
        }
    }
    mask
}

fn ray_attacks(sq: usize, deltas: &[(i32, i32)], occupancy: u64) -> u64 {
    let origin = Square::from_index(sq);
    let file = origin.file() as i32;
    let rank = origin.rank() as i32;
    let mut attacks = 0u64;
    for &(dr, df) in deltas {
        let mut r = rank + dr;
        let mut f = file + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let idx = Square::new(f as usize, r as usize).index();
            attacks |= 1u64 << idx;
            if occupancy & (1u64 << idx) != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    attacks
}

const ROOK_DELTAS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DELTAS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

struct SliderTable {
    masks: [u64; 64],
    flat: Vec<u64>,
    offsets: [usize; 64],
}

impl SliderTable {
    fn build(deltas: &[(i32, i32)]) -> Self {
        let mut masks = [0u64; 64];
        let mut offsets = [0usize; 64];
        let mut flat = Vec::new();
        for (sq, mask_slot) in masks.iter_mut().enumerate() {
            let mask = ray_mask(sq, deltas, true);
            *mask_slot = mask;
            offsets[sq] = flat.len();
            // Masks here are always well under MAX_SUBSET_BITS (12 at most).
            let blocker_subsets = subsets(mask).expect("slider relevant-occupancy mask too large");
            let bits: Vec<usize> = (0..64).filter(|&i| (mask >> i) & 1 != 0).collect();
            let table_size = 1usize << bits.len();
            let mut attacks_by_index = vec![0u64; table_size];
            for blockers in blocker_subsets {
                let idx = pack_index(blockers, &bits);
                attacks_by_index[idx] = ray_attacks(sq, deltas, blockers);
            }
            flat.extend(attacks_by_index);
        }
        SliderTable { masks, flat, offsets }
    }

    fn attacks(&self, sq: Square, occupancy: u64) -> u64 {
        let s = sq.index();
        let mask = self.masks[s];
        let blockers = occupancy & mask;
        let bits: Vec<usize> = (0..64).filter(|&i| (mask >> i) & 1 != 0).collect();
        let idx = pack_index(blockers, &bits);
        self.flat[self.offsets[s] + idx]
    }
}

fn pack_index(blockers: u64, bits: &[usize]) -> usize {
    let mut idx = 0usize;
    for (j, &bit) in bits.iter().enumerate() {
        if (blockers >> bit) & 1 != 0 {
            idx |= 1usize << j;
        }
    }
    idx
}

static ROOK_TABLE: Lazy<SliderTable> = Lazy::new(|| SliderTable::build(&ROOK_DELTAS));
static BISHOP_TABLE: Lazy<SliderTable> = Lazy::new(|| SliderTable::build(&BISHOP_DELTAS));

#[must_use]
pub fn rook_attacks(sq: Square, occupancy: u64) -> u64 {
    ROOK_TABLE.attacks(sq, occupancy)
}

#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: u64) -> u64 {
    BISHOP_TABLE.attacks(sq, occupancy)
}

#[must_use]
pub fn queen_attacks(sq: Square, occupancy: u64) -> u64 {
    rook_attacks(sq, occupancy) | bishop_attacks(sq, occupancy)
}

fn knight_mask(sq: usize) -> u64 {
    const DELTAS: [(i32, i32); 8] = [
        (-2, -1), (-2, 1), (-1, -2), (-1, 2), (1, -2), (1, 2), (2, -1), (2, 1),
    ];
    let origin = Square::from_index(sq);
    let file = origin.file() as i32;
    let rank = origin.rank() as i32;
    let mut mask = 0u64;
    for &(dr, df) in &DELTAS {
        let r = rank + dr;
        let f = file + df;
        if (0..8).contains(&r) && (0..8).contains(&f) {
            mask |= 1u64 << Square::new(f as usize, r as usize).index();
        }
    }
    mask
}

fn king_mask(sq: usize) -> u64 {
    const DELTAS: [(i32, i32); 8] = [
        (-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1),
    ];
    let origin = Square::from_index(sq);
    let file = origin.file() as i32;
    let rank = origin.rank() as i32;
    let mut mask = 0u64;
    for &(dr, df) in &DELTAS {
        let r = rank + dr;
        let f = file + df;
        if (0..8).contains(&r) && (0..8).contains(&f) {
            mask |= 1u64 << Square::new(f as usize, r as usize).index();
        }
    }
    mask
}

fn pawn_attack_mask(sq: usize, color: Color) -> u64 {
    let origin = Square::from_index(sq);
    let file = origin.file() as i32;
    let rank = origin.rank() as i32;
    let dr = color.pawn_rank_delta();
    let mut mask = 0u64;
    for df in [-1, 1] {
        let r = rank + dr;
        let f = file + df;
        if (0..8).contains(&r) && (0..8).contains(&f) {
            mask |= 1u64 << Square::new(f as usize, r as usize).index();
        }
    }
    mask
}

static KNIGHT_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut t = [0u64; 64];
    for (sq, slot) in t.iter_mut().enumerate() {
        *slot = knight_mask(sq);
    }
    t
});

static KING_ATTACKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut t = [0u64; 64];
    for (sq, slot) in t.iter_mut().enumerate() {
        *slot = king_mask(sq);
    }
    t
});

static PAWN_ATTACKS: Lazy<[[u64; 64]; 2]> = Lazy::new(|| {
    let mut t = [[0u64; 64]; 2];
    for (sq, slot) in t[Color::White.index()].iter_mut().enumerate() {
        *slot = pawn_attack_mask(sq, Color::White);
    }
    for (sq, slot) in t[Color::Black.index()].iter_mut().enumerate() {
        *slot = pawn_attack_mask(sq, Color::Black);
    }
    t
});

/// Squares strictly between `a` and `b` along a shared rank, file, or
/// diagonal, or 0 if they don't share one.
static BETWEEN: Lazy<[[u64; 64]; 64]> = Lazy::new(|| {
    let mut t = [[0u64; 64]; 64];
    for a in 0..64usize {
        for b in 0..64usize {
            t[a][b] = between_from_scratch(a, b);
        }
    }
    t
});

fn between_from_scratch(a: usize, b: usize) -> u64 {
    if a == b {
        return 0;
    }
    let sa = Square::from_index(a);
    let sb = Square::from_index(b);
    let (af, ar) = (sa.file() as i32, sa.rank() as i32);
    let (bf, br) = (sb.file() as i32, sb.rank() as i32);
    let dr = (br - ar).signum();
    let df = (bf - af).signum();
    let same_rank = ar == br;
    let same_file = af == bf;
    let same_diag = (br - ar).abs() == (bf - af).abs();
    if !(same_rank || same_file || same_diag) {
        return 0;
    }
    let mut mask = 0u64;
    let mut r = ar + dr;
    let mut f = af + df;
    while (r, f) != (br, bf) {
        mask |= 1u64 << Square::new(f as usize, r as usize).index();
        r += dr;
        f += df;
    }
    mask
}

#[must_use]
pub fn knight_attacks(sq: Square) -> u64 {
    KNIGHT_ATTACKS[sq.index()]
}

#[must_use]
pub fn king_attacks(sq: Square) -> u64 {
    KING_ATTACKS[sq.index()]
}

#[must_use]
pub fn pawn_attacks(sq: Square, color: Color) -> u64 {
    PAWN_ATTACKS[color.index()][sq.index()]
}

#[must_use]
pub fn between(a: Square, b: Square) -> u64 {
    BETWEEN[a.index()][b.index()]
}
