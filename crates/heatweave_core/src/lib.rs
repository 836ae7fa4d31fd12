//! Core logic for heatweave: schedule a 7xN intensity grid into daily
//! commit targets and execute each day idempotently.
//! This crate is the single source of truth for scheduling invariants.

pub mod artifacts;
pub mod config;
pub mod editor;
pub mod git;
pub mod heatmap;
pub mod logging;
pub mod model;
pub mod schedule;
pub mod service;
pub mod store;

pub use config::{Config, ConfigError};
pub use editor::state::{
    Direction, EditorCommand, EditorError, EditorPhase, EditorSession, GridCoordinate,
};
pub use editor::tui::{run_editor, EditorOutcome};
pub use model::pattern::{
    blank_grid, compute_start_date, resize_grid, validate_grid, Mode, PatternDocument,
    PatternValidationError, GRID_ROWS, MAX_INTENSITY, MAX_WEEKS, MIN_WEEKS,
};
pub use schedule::guard::{decide, ExecutionOutcome};
pub use schedule::resolver::{resolve, ScheduleDecision};
pub use service::paint::{
    GitLogCountSource, LogNotifier, ObserveError, ObservedCountSource, OverrunNotifier,
    PaintError, PaintService, TickReport,
};
pub use store::{FsPatternStore, PatternStore, StoreError, PATTERN_FILE};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
