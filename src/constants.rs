//! Shared tunable constants referenced by more than one module.

/// Largest horizon (total planned search depth) the engine will iterate to.
pub const MAX_HORIZON: u32 = 127;

/// Fixed capacity of the per-position move buffer (spec.md §3).
pub const MAX_MOVES: usize = 128;

/// Maximum ply depth tracked by search-local tables (killers, PV, history
/// shift bookkeeping).
pub const MAX_PLY: usize = 128;

/// Saturation bound for the history heuristic and for the packed-move
/// history field's bias, shared so a move's embedded snapshot and the live
/// table always use the same range.
pub const MAX_HISTORY: i32 = 1 << 20;

/// Score magnitude bound for non-mate evaluations (spec.md §4.7).
pub const MAX_NON_MATE_SCORE: i32 = 30_000;

/// Score representing "mate in 0 plies from this node", from which mate
/// distances are derived by subtracting the ply count.
pub const MATE_SCORE: i32 = 32_000;
