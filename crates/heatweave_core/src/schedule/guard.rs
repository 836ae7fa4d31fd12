//! Per-tick execution guard.
//!
//! # Responsibility
//! - Convert a schedule decision plus a freshly observed commit count into
//!   exactly one of: do nothing, write a delta, or flag an overrun.
//!
//! # Invariants
//! - Requested units are never negative: each tick only asks for the gap
//!   between target and observation, so arbitrary re-invocation on the
//!   same day converges instead of compounding.
//! - The guard performs no I/O; the caller owns the artifact write, the
//!   staging and the overrun notification.

use crate::schedule::resolver::ScheduleDecision;

/// One tick's verdict, consumed immediately by the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Schedule inactive today; the tick ends without side effects.
    NoOp,
    /// Append `units` more work items and stage them.
    Write { units: u32 },
    /// The external count already meets or exceeds the target; writing
    /// more would overshoot intent. Raise an alert instead.
    Overrun { observed: u32, target: u32 },
}

/// Decides what this tick should do.
///
/// `observed_today` must be re-read from the external source on every
/// invocation. Two overlapping ticks can still race the external counter
/// and overshoot by one tick's delta before the next observation catches
/// it; that window is an accepted trade-off of the lock-free re-read
/// design, not something the guard tries to close.
pub fn decide(decision: ScheduleDecision, observed_today: u32) -> ExecutionOutcome {
    match decision {
        ScheduleDecision::Inactive => ExecutionOutcome::NoOp,
        ScheduleDecision::Active { target } => {
            if observed_today >= target {
                ExecutionOutcome::Overrun {
                    observed: observed_today,
                    target,
                }
            } else {
                ExecutionOutcome::Write {
                    units: target - observed_today,
                }
            }
        }
    }
}
