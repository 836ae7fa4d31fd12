//! Date-to-cell schedule resolution.
//!
//! # Responsibility
//! - Decide, for one date and one validated document, whether the schedule
//!   is active and how many commits the day targets.
//!
//! # Invariants
//! - `resolve` is deterministic: identical inputs always yield the same
//!   decision, with no process-local or ambient state involved.
//! - Callers must only pass documents that passed `validate()`; the
//!   resolver relies on the 7-equal-rows geometry.

use crate::model::pattern::{Mode, PatternDocument};
use chrono::NaiveDate;

/// Outcome of resolving one date against the schedule. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// Nothing to do today: before start, past the last column, or a
    /// zero-intensity cell.
    Inactive,
    /// The day requires `target` total commits.
    Active { target: u32 },
}

/// Maps `today` onto the document's schedule.
///
/// Pattern mode walks the grid column-major from `start_date`: elapsed
/// days `d` address row `d % 7` (day of week, Sunday first) and column
/// `d / 7` (week). Daily mode targets `daily_commit_count` every day from
/// `start_date` onward with no end date.
///
/// Zero targets resolve to `Inactive`: a cell that asks for nothing needs
/// no tick work and must not trip the overrun guard.
pub fn resolve(today: NaiveDate, doc: &PatternDocument) -> ScheduleDecision {
    let elapsed = (today - doc.start_date).num_days();
    if elapsed < 0 {
        return ScheduleDecision::Inactive;
    }

    let target = match doc.mode {
        Mode::Daily => doc.daily_commit_count,
        Mode::Pattern => {
            let week = (elapsed / 7) as usize;
            let day_of_week = (elapsed % 7) as usize;
            if week >= doc.weeks() {
                return ScheduleDecision::Inactive;
            }
            u32::from(doc.grid[day_of_week][week])
        }
    };

    if target == 0 {
        ScheduleDecision::Inactive
    } else {
        ScheduleDecision::Active { target }
    }
}
