//! Pattern document model and validation.
//!
//! # Responsibility
//! - Define the persisted `pattern.json` shape as one typed document.
//! - Validate grid geometry and cell ranges before any scheduling logic
//!   touches the document.
//!
//! # Invariants
//! - Row index 0..=6 maps to day-of-week Sunday..Saturday.
//! - Column index maps to whole weeks elapsed since `start_date`.
//! - `validate()` is the single gate: downstream components may assume a
//!   document that passed it has exactly 7 equal-length rows.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of grid rows; one per weekday, Sunday first.
pub const GRID_ROWS: usize = 7;
/// Narrowest supported grid.
pub const MIN_WEEKS: usize = 1;
/// Widest supported grid (two years of columns).
pub const MAX_WEEKS: usize = 104;
/// Largest per-cell commit target.
pub const MAX_INTENSITY: u8 = 9;

/// How the painter interprets the document on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Follow the 7xN grid cell addressed by the elapsed-day offset.
    #[default]
    Pattern,
    /// Ignore the grid; every day targets `daily_commit_count` commits.
    Daily,
}

pub type PatternResult<T> = Result<T, PatternValidationError>;

/// Validation failure for a pattern document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternValidationError {
    /// Grid is not 7 rows, or a row disagrees with the first row's width.
    DimensionMismatch(String),
    /// A cell holds a value outside 0..=9.
    ValueOutOfRange { row: usize, col: usize, value: u8 },
    /// The column count is outside the supported 1..=104 range.
    BadWeeksCount(usize),
}

impl Display for PatternValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch(detail) => {
                write!(f, "pattern grid dimension mismatch: {detail}")
            }
            Self::ValueOutOfRange { row, col, value } => write!(
                f,
                "pattern cell ({row},{col}) holds {value}, outside 0..={MAX_INTENSITY}"
            ),
            Self::BadWeeksCount(weeks) => write!(
                f,
                "pattern width {weeks} is outside {MIN_WEEKS}..={MAX_WEEKS} weeks"
            ),
        }
    }
}

impl Error for PatternValidationError {}

/// The sole durable artifact: a painting schedule for one target repo.
///
/// Serialized field names (`mode`, `start_date`, `pattern`,
/// `daily_commit_count`) are the wire contract for `pattern.json` and must
/// round-trip exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDocument {
    pub mode: Mode,
    /// ISO calendar date the schedule starts counting from.
    pub start_date: NaiveDate,
    /// 7 rows (Sunday..Saturday) by N week columns, values 0..=9.
    #[serde(rename = "pattern")]
    pub grid: Vec<Vec<u8>>,
    /// Per-day target; meaningful only when `mode == Mode::Daily`.
    #[serde(default)]
    pub daily_commit_count: u32,
}

impl PatternDocument {
    /// Builds a pattern-mode document from an edited grid.
    ///
    /// # Contract
    /// - Returns the document only after a full `validate()` pass.
    pub fn from_grid(grid: Vec<Vec<u8>>, start_date: NaiveDate) -> PatternResult<Self> {
        let doc = Self {
            mode: Mode::Pattern,
            start_date,
            grid,
            daily_commit_count: 0,
        };
        doc.validate()?;
        Ok(doc)
    }

    /// Builds a daily-mode document targeting `count` commits every day.
    ///
    /// The grid is filled with the clamped count so the persisted artifact
    /// still renders a meaningful preview, but the resolver never reads it
    /// in daily mode.
    pub fn daily(count: u32, weeks: usize, start_date: NaiveDate) -> PatternResult<Self> {
        let cell = count.min(u32::from(MAX_INTENSITY)) as u8;
        let doc = Self {
            mode: Mode::Daily,
            start_date,
            grid: vec![vec![cell; weeks]; GRID_ROWS],
            daily_commit_count: count,
        };
        doc.validate()?;
        Ok(doc)
    }

    /// Number of week columns in the grid.
    pub fn weeks(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    /// Checks grid geometry and cell ranges.
    ///
    /// # Errors
    /// - `DimensionMismatch` when the grid is not 7 equal-length rows.
    /// - `BadWeeksCount` when the width is outside 1..=104.
    /// - `ValueOutOfRange` for the first cell above 9.
    pub fn validate(&self) -> PatternResult<()> {
        validate_grid(&self.grid)
    }
}

/// Validates a raw grid against the 7xN geometry and 0..=9 cell contract.
///
/// Shared by the document gate and the editor's save transition, so a grid
/// rejected here can never become a persisted document.
pub fn validate_grid(grid: &[Vec<u8>]) -> PatternResult<()> {
    if grid.len() != GRID_ROWS {
        return Err(PatternValidationError::DimensionMismatch(format!(
            "expected {GRID_ROWS} rows, found {}",
            grid.len()
        )));
    }
    let width = grid[0].len();
    if !(MIN_WEEKS..=MAX_WEEKS).contains(&width) {
        return Err(PatternValidationError::BadWeeksCount(width));
    }
    for (row_idx, row) in grid.iter().enumerate() {
        if row.len() != width {
            return Err(PatternValidationError::DimensionMismatch(format!(
                "row {row_idx} has {} columns, expected {width}",
                row.len()
            )));
        }
        for (col_idx, &value) in row.iter().enumerate() {
            if value > MAX_INTENSITY {
                return Err(PatternValidationError::ValueOutOfRange {
                    row: row_idx,
                    col: col_idx,
                    value,
                });
            }
        }
    }
    Ok(())
}

/// Returns an all-zero 7xN grid.
pub fn blank_grid(weeks: usize) -> Vec<Vec<u8>> {
    vec![vec![0; weeks]; GRID_ROWS]
}

/// Reshapes an arbitrary grid to exactly 7 rows by `weeks` columns.
///
/// Extra rows/columns are truncated, missing cells are zero-filled and
/// out-of-range values are clamped. Used by the lenient editor preload;
/// the strict tick path never goes through here.
pub fn resize_grid(grid: &[Vec<u8>], weeks: usize) -> Vec<Vec<u8>> {
    let weeks = weeks.clamp(MIN_WEEKS, MAX_WEEKS);
    let mut adjusted = Vec::with_capacity(GRID_ROWS);
    for row_idx in 0..GRID_ROWS {
        let mut row: Vec<u8> = grid
            .get(row_idx)
            .map(|row| {
                row.iter()
                    .take(weeks)
                    .map(|&value| value.min(MAX_INTENSITY))
                    .collect()
            })
            .unwrap_or_default();
        row.resize(weeks, 0);
        adjusted.push(row);
    }
    adjusted
}

/// Computes the schedule start date at generation time.
///
/// # Contract
/// - Daily mode always starts today.
/// - Pattern mode starts today, or on the next Sunday (inclusive) when
///   `start_from_next_sunday` is set, so that row 0 lines up with the
///   first painted column.
pub fn compute_start_date(today: NaiveDate, mode: Mode, start_from_next_sunday: bool) -> NaiveDate {
    if mode == Mode::Daily || !start_from_next_sunday {
        return today;
    }
    let offset = (7 - today.weekday().num_days_from_sunday()) % 7;
    today + chrono::Days::new(u64::from(offset))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_sunday_is_inclusive() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        assert_eq!(compute_start_date(sunday, Mode::Pattern, true), sunday);

        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let next = compute_start_date(monday, Mode::Pattern, true);
        assert_eq!(next, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());
    }

    #[test]
    fn daily_mode_ignores_sunday_alignment() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(compute_start_date(monday, Mode::Daily, true), monday);
    }

    #[test]
    fn resize_clamps_rows_columns_and_values() {
        let ragged = vec![vec![12, 3], vec![1]];
        let resized = resize_grid(&ragged, 3);
        assert_eq!(resized.len(), GRID_ROWS);
        assert_eq!(resized[0], vec![9, 3, 0]);
        assert_eq!(resized[1], vec![1, 0, 0]);
        assert_eq!(resized[6], vec![0, 0, 0]);
    }
}
