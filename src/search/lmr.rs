//! Late-move reduction table (spec.md §4.5 step 9: "a precomputed
//! `a·log₂(n)·log₂(h) + b` table").
//!
//! Grounded on the teacher's `search/lmr.rs` (`should_apply_lmr`'s
//! `ln(depth) * ln(move_index)` formula and its "no reduction before move 4"
//! cutoff), generalized from an ad hoc per-call computation to the spec's
//! precomputed table indexed by quiet-move number and remaining horizon.

use once_cell::sync::Lazy;

use crate::constants::MAX_HORIZON;

const TABLE_MOVES: usize = 96;
const LMR_A: f32 = 0.4;
const LMR_B: f32 = -0.3;

/// `reductions[quiet_number][to_horizon]`, clamped to `>= 0`.
static REDUCTIONS: Lazy<Vec<Vec<u32>>> = Lazy::new(|| {
    let mut table = vec![vec![0u32; MAX_HORIZON as usize + 1]; TABLE_MOVES];
    for (n, row) in table.iter_mut().enumerate() {
        for (h, cell) in row.iter_mut().enumerate() {
            if n == 0 || h == 0 {
                continue;
            }
            let value = LMR_A * (n as f32).log2() * (h as f32).log2() + LMR_B;
            *cell = value.max(0.0) as u32;
        }
    }
    table
});

/// Reduction (in plies) for the `quiet_number`th quiet move searched at
/// `to_horizon` plies remaining. The first few quiet moves at any horizon
/// always return 0 (no reduction).
#[must_use]
pub fn reduction(quiet_number: usize, to_horizon: u32) -> u32 {
    let n = quiet_number.min(TABLE_MOVES - 1);
    let h = (to_horizon as usize).min(MAX_HORIZON as usize);
    REDUCTIONS[n][h]
}
