//! Transposition cache: a flat, power-of-two-sized array of `(key, data)`
//! buckets with lock-free verification via XOR-folding (spec.md §4.4).
//!
//! `data` is packed as `to-horizon(7) | promoted(4) | to(7) | from(7) |
//! score(27, biased) | precision(2) | last-accessed(10)`. The stored key is
//! `zobrist ^ data`, so a reader recomputes `zobrist` as `stored_key ^ data`
//! and compares against the position's own key — a torn concurrent write
//! (half-old, half-new `key`/`data`) shows up as a mismatch instead of a
//! silently wrong hit.

use crate::chess_move::Move;
use crate::constants::{MATE_SCORE, MAX_HORIZON, MAX_NON_MATE_SCORE};
use crate::types::{ColorlessPiece, Square};

const SCORE_BIAS: i64 = 1 << 20;

const W_HORIZON: u32 = 7;
const W_PROMOTED: u32 = 4;
const W_TO: u32 = 7;
const W_FROM: u32 = 7;
const W_SCORE: u32 = 27;
const W_PRECISION: u32 = 2;
const W_LAST_ACCESSED: u32 = 10;

const SHIFT_LAST_ACCESSED: u32 = 0;
const SHIFT_PRECISION: u32 = SHIFT_LAST_ACCESSED + W_LAST_ACCESSED;
const SHIFT_SCORE: u32 = SHIFT_PRECISION + W_PRECISION;
const SHIFT_FROM: u32 = SHIFT_SCORE + W_SCORE;
const SHIFT_TO: u32 = SHIFT_FROM + W_FROM;
const SHIFT_PROMOTED: u32 = SHIFT_TO + W_TO;
const SHIFT_HORIZON: u32 = SHIFT_PROMOTED + W_PROMOTED;

const MASK_HORIZON: u64 = (1 << W_HORIZON) - 1;
const MASK_PROMOTED: u64 = (1 << W_PROMOTED) - 1;
const MASK_TO: u64 = (1 << W_TO) - 1;
const MASK_FROM: u64 = (1 << W_FROM) - 1;
const MASK_SCORE: u64 = (1 << W_SCORE) - 1;
const MASK_PRECISION: u64 = (1 << W_PRECISION) - 1;
const MASK_LAST_ACCESSED: u64 = (1 << W_LAST_ACCESSED) - 1;

const BUCKET_SIZE: usize = 4;

/// How a stored score should be interpreted relative to the search window it
/// was produced under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Precision {
    Exact = 0,
    LowerBound = 1,
    UpperBound = 2,
}

impl Precision {
    fn from_bits(bits: u64) -> Precision {
        match bits & MASK_PRECISION {
            0 => Precision::Exact,
            1 => Precision::LowerBound,
            _ => Precision::UpperBound,
        }
    }
}

/// A decoded cache hit.
#[derive(Clone, Copy, Debug)]
pub struct Probe {
    pub to_horizon: u32,
    pub score: i32,
    pub precision: Precision,
    pub best_move: Option<(Square, Square, Option<ColorlessPiece>)>,
    pub last_accessed: u16,
}

impl Probe {
    /// Whether this entry's score can be returned directly at the given
    /// `(to_horizon, alpha, beta)` window (spec.md §4.5 step 4).
    #[must_use]
    pub fn usable_score(&self, to_horizon: u32, alpha: i32, beta: i32, ply: u32) -> Option<i32> {
        if self.to_horizon < to_horizon {
            return None;
        }
        let score = adjust_mate_score_on_read(self.score, ply);
        match self.precision {
            Precision::Exact => Some(score),
            Precision::LowerBound if score >= beta => Some(score),
            Precision::UpperBound if score <= alpha => Some(score),
            _ => None,
        }
    }
}

fn pack(
    to_horizon: u32,
    score: i32,
    precision: Precision,
    best_move: Option<Move>,
    last_accessed: u16,
) -> u64 {
    let (from, to, promoted) = match best_move {
        Some(mv) => (mv.from().index() as u64, mv.to().index() as u64, move_promo_code(mv)),
        None => (Square::ILLEGAL.index() as u64, Square::ILLEGAL.index() as u64, 0),
    };
    let biased_score = (score as i64 + SCORE_BIAS) as u64;
    let mut data = 0u64;
    data |= (to_horizon as u64 & MASK_HORIZON) << SHIFT_HORIZON;
    data |= (promoted & MASK_PROMOTED) << SHIFT_PROMOTED;
    data |= (to & MASK_TO) << SHIFT_TO;
    data |= (from & MASK_FROM) << SHIFT_FROM;
    data |= (biased_score & MASK_SCORE) << SHIFT_SCORE;
    data |= (precision as u64 & MASK_PRECISION) << SHIFT_PRECISION;
    data |= (last_accessed as u64 & MASK_LAST_ACCESSED) << SHIFT_LAST_ACCESSED;
    data
}

fn move_promo_code(mv: Move) -> u64 {
    match mv.promoted() {
        None => 0,
        Some(cp) => cp.index() as u64 + 1,
    }
}

fn unpack(data: u64) -> Probe {
    let to_horizon = ((data >> SHIFT_HORIZON) & MASK_HORIZON) as u32;
    let promoted_code = (data >> SHIFT_PROMOTED) & MASK_PROMOTED;
    let to = ((data >> SHIFT_TO) & MASK_TO) as usize;
    let from = ((data >> SHIFT_FROM) & MASK_FROM) as usize;
    let biased_score = (data >> SHIFT_SCORE) & MASK_SCORE;
    let score = biased_score as i64 - SCORE_BIAS;
    let precision = Precision::from_bits(data >> SHIFT_PRECISION);
    let last_accessed = ((data >> SHIFT_LAST_ACCESSED) & MASK_LAST_ACCESSED) as u16;

    let best_move = if from == Square::ILLEGAL.index() {
        None
    } else {
        let promoted = if promoted_code == 0 {
            None
        } else {
            Some(ColorlessPiece::from_index((promoted_code - 1) as usize))
        };
        Some((Square::from_index(from), Square::from_index(to), promoted))
    };

    Probe {
        to_horizon,
        score: score as i32,
        precision,
        best_move,
        last_accessed,
    }
}

/// Convert a raw search score, which is relative to the current node's ply,
/// into a ply-independent score safe to store (spec.md §4.4: "checkmate
/// scores are stored relative to the current ply").
#[must_use]
pub fn adjust_mate_score_on_store(score: i32, ply: u32) -> i32 {
    if score > MAX_NON_MATE_SCORE {
        score + ply as i32
    } else if score < -MAX_NON_MATE_SCORE {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`adjust_mate_score_on_store`], applied on read.
#[must_use]
pub fn adjust_mate_score_on_read(score: i32, ply: u32) -> i32 {
    if score > MAX_NON_MATE_SCORE {
        score - ply as i32
    } else if score < -MAX_NON_MATE_SCORE {
        score + ply as i32
    } else {
        score
    }
}

#[derive(Clone, Copy)]
struct Slot {
    key: u64,
    data: u64,
}

/// Open-addressed transposition cache: `buckets.len()` is a power of two,
/// each holding [`BUCKET_SIZE`] slots probed linearly.
pub struct TranspositionTable {
    buckets: Vec<[Option<Slot>; BUCKET_SIZE]>,
    mask: usize,
    searches: u32,
}

impl TranspositionTable {
    #[must_use]
    pub fn with_size_mb(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<[Option<Slot>; BUCKET_SIZE]>();
        let requested = (size_mb * 1024 * 1024) / entry_size.max(1);
        let buckets = requested.next_power_of_two().max(1024);
        TranspositionTable {
            buckets: vec![[None; BUCKET_SIZE]; buckets],
            mask: buckets - 1,
            searches: 0,
        }
    }

    fn bucket_index(&self, key: u64) -> usize {
        (key as usize) & self.mask
    }

    /// Increment the root-search counter (spec.md §4.4: "exposes a
    /// `searches` counter incremented per root search").
    pub fn new_search(&mut self) {
        self.searches = self.searches.wrapping_add(1);
        #[cfg(feature = "logging")]
        if self.searches & 0x3FF == 0 {
            log::warn!("transposition table search counter nearing 10-bit last-accessed wraparound");
        }
    }

    /// Probe the cache for `key`, verifying the XOR-folded stored key
    /// matches before trusting the decoded entry.
    #[must_use]
    pub fn probe(&self, key: u64) -> Option<Probe> {
        let bucket = &self.buckets[self.bucket_index(key)];
        for slot in bucket.iter().flatten() {
            if slot.key ^ slot.data == key {
                return Some(unpack(slot.data));
            }
        }
        None
    }

    /// Store a search result, choosing the lowest-priority existing entry as
    /// victim when the bucket is full (`priority = last_accessed << 7 |
    /// to_horizon`, so older entries and then shallower ones are replaced
    /// first).
    #[allow(clippy::too_many_arguments)]
    pub fn store(
        &mut self,
        key: u64,
        to_horizon: u32,
        score: i32,
        precision: Precision,
        best_move: Option<Move>,
        ply: u32,
    ) {
        debug_assert!(to_horizon <= MAX_HORIZON, "to_horizon exceeds MAX_HORIZON");
        let stored_score = adjust_mate_score_on_store(score, ply);
        let last_accessed = (self.searches & 0x3FF) as u16;
        let data = pack(to_horizon, stored_score, precision, best_move, last_accessed);
        let stored_key = key ^ data;
        let new_slot = Slot { key: stored_key, data };

        let idx = self.bucket_index(key);
        let bucket = &mut self.buckets[idx];

        for slot in bucket.iter_mut() {
            if let Some(existing) = slot {
                if existing.key ^ existing.data == key {
                    *slot = Some(new_slot);
                    return;
                }
            }
        }

        for slot in bucket.iter_mut() {
            if slot.is_none() {
                *slot = Some(new_slot);
                return;
            }
        }

        let mut victim = 0usize;
        let mut worst_priority = u32::MAX;
        for (i, slot) in bucket.iter().enumerate() {
            let entry = slot.expect("bucket is full in this branch");
            let probe = unpack(entry.data);
            let priority = ((probe.last_accessed as u32) << 7) + probe.to_horizon;
            if priority < worst_priority {
                worst_priority = priority;
                victim = i;
            }
        }
        bucket[victim] = Some(new_slot);
    }

    /// Zero every entry, keeping the allocation.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            *bucket = [None; BUCKET_SIZE];
        }
        self.searches = 0;
    }

    /// Fraction of slots occupied, in permille (UCI `hashfull`).
    #[must_use]
    pub fn hashfull_permille(&self) -> u32 {
        let total = self.buckets.len() * BUCKET_SIZE;
        if total == 0 {
            return 0;
        }
        let occupied: usize = self
            .buckets
            .iter()
            .map(|b| b.iter().filter(|s| s.is_some()).count())
            .sum();
        ((occupied as u64 * 1000) / total as u64) as u32
    }
}
