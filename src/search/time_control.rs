//! Time manager (spec.md §4.8) and the cooperative stop flag the driver
//! uses to interrupt a running search.
//!
//! `StopFlag` is lifted almost verbatim from the teacher's `src/sync.rs`
//! (`Arc<AtomicBool>` wrapper with `stop`/`reset`/`is_stopped`); the soft/
//! hard limit computation is new, grounded on the teacher's
//! `src/timer.rs`/`src/uci.rs` "go" handling idiom of deriving a deadline
//! from remaining time, increment, and moves-to-go.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A thread-safe stop flag for controlling search termination.
#[derive(Clone, Debug)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    #[must_use]
    pub fn new() -> Self {
        StopFlag(Arc::new(AtomicBool::new(false)))
    }

    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs to a "go" command; any field may be absent (infinite analysis,
/// fixed depth, etc).
#[derive(Clone, Copy, Debug, Default)]
pub struct TimeBudgetInput {
    pub remaining: Option<Duration>,
    pub increment: Option<Duration>,
    pub moves_to_go: Option<u32>,
    pub move_time: Option<Duration>,
    pub node_limit: Option<u64>,
    pub depth_limit: Option<u32>,
    pub infinite: bool,
}

/// A reserve withheld from `remaining` so a flagged clock never causes a
/// loss on time even when the OS scheduler stalls the engine briefly.
const SAFETY_RESERVE: Duration = Duration::from_millis(50);

/// Divides `remaining` into a conservative number of expected moves left
/// when the GUI doesn't supply `moves_to_go`.
const DEFAULT_MOVES_TO_GO: u32 = 30;

pub struct TimeControl {
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
    node_limit: Option<u64>,
    depth_limit: Option<u32>,
}

impl TimeControl {
    #[must_use]
    pub fn new(input: TimeBudgetInput) -> Self {
        if input.infinite {
            return TimeControl {
                start: Instant::now(),
                soft_limit: None,
                hard_limit: None,
                node_limit: input.node_limit,
                depth_limit: input.depth_limit,
            };
        }
        if let Some(move_time) = input.move_time {
            return TimeControl {
                start: Instant::now(),
                soft_limit: Some(move_time),
                hard_limit: Some(move_time),
                node_limit: input.node_limit,
                depth_limit: input.depth_limit,
            };
        }
        let (soft, hard) = match input.remaining {
            Some(remaining) => {
                let usable = remaining.saturating_sub(SAFETY_RESERVE);
                let moves_to_go = input.moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
                let increment = input.increment.unwrap_or(Duration::ZERO);
                let base = usable / moves_to_go + increment;
                let soft = base.min(usable);
                let hard = (base * 4).min(usable);
                (Some(soft), Some(hard))
            }
            None => (None, None),
        };
        TimeControl {
            start: Instant::now(),
            soft_limit: soft,
            hard_limit: hard,
            node_limit: input.node_limit,
            depth_limit: input.depth_limit,
        }
    }

    #[must_use]
    pub fn infinite() -> Self {
        Self::new(TimeBudgetInput {
            infinite: true,
            ..Default::default()
        })
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    #[must_use]
    pub fn depth_limit(&self) -> Option<u32> {
        self.depth_limit
    }

    #[must_use]
    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    /// Past the hard limit: the current search must stop immediately.
    #[must_use]
    pub fn hard_expired(&self) -> bool {
        matches!(self.hard_limit, Some(limit) if self.elapsed() >= limit)
    }

    /// Past the soft limit: acceptable to finish the current root move but
    /// should not start another iterative-deepening iteration.
    #[must_use]
    pub fn soft_expired(&self) -> bool {
        matches!(self.soft_limit, Some(limit) if self.elapsed() >= limit)
    }

    /// Whether starting another iteration is predicted to blow the hard
    /// limit, given how long the last iteration took.
    #[must_use]
    pub fn next_iteration_would_exceed_hard(&self, last_iteration: Duration) -> bool {
        match self.hard_limit {
            Some(limit) => self.elapsed() + last_iteration > limit,
            None => false,
        }
    }

    #[must_use]
    pub fn node_budget_exceeded(&self, nodes: u64) -> bool {
        matches!(self.node_limit, Some(limit) if nodes >= limit)
    }

    /// Poll the clock and node ceiling when `due` (the search only checks
    /// periodically, spec.md §4.5 step 1: "every fixed number of nodes").
    /// Returns [`Interrupted`] the first time either budget is blown.
    pub fn poll(&self, due: bool, nodes: u64, stop: &StopFlag) -> Result<(), Interrupted> {
        if stop.is_stopped() {
            return Err(Interrupted);
        }
        if due && (self.hard_expired() || self.node_budget_exceeded(nodes)) {
            stop.stop();
            return Err(Interrupted);
        }
        Ok(())
    }
}

/// Signals that a search was cut short by the time/node budget or an
/// external stop request (spec.md §4.5 step 1: "an interrupted sentinel
/// which propagates up and halts the search"). Carries no payload: every
/// frame that sees one simply unwinds without touching the cache.
#[derive(Debug, Clone, Copy)]
pub struct Interrupted;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinite_search_never_expires() {
        let tc = TimeControl::infinite();
        assert!(!tc.hard_expired());
        assert!(!tc.soft_expired());
    }

    #[test]
    fn move_time_sets_equal_soft_and_hard_limits() {
        let tc = TimeControl::new(TimeBudgetInput {
            move_time: Some(Duration::from_millis(0)),
            ..Default::default()
        });
        assert!(tc.hard_expired());
        assert!(tc.soft_expired());
    }

    #[test]
    fn remaining_time_splits_by_moves_to_go() {
        let tc = TimeControl::new(TimeBudgetInput {
            remaining: Some(Duration::from_secs(30)),
            moves_to_go: Some(10),
            ..Default::default()
        });
        assert!(!tc.hard_expired());
        assert!(!tc.soft_expired());
    }

    #[test]
    fn stop_flag_round_trips() {
        let flag = StopFlag::new();
        assert!(!flag.is_stopped());
        flag.stop();
        assert!(flag.is_stopped());
        flag.reset();
        assert!(!flag.is_stopped());
    }
}
