//! Editing session state machine.
//!
//! # Responsibility
//! - Apply one discrete editor command at a time to an in-memory grid.
//! - Gate the save transition behind full grid validation.
//!
//! # Invariants
//! - The cursor is always inside the grid; moves clamp, they never wrap.
//! - `Saved` and `Abandoned` are absorbing: no command is applied after
//!   either is reached.
//! - Clearing the grid is two-phase; a pending clear is dropped by any
//!   command other than its confirmation.

use crate::editor::font;
use crate::model::pattern::{
    blank_grid, validate_grid, PatternValidationError, GRID_ROWS, MAX_INTENSITY,
};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Cursor position inside the editing grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridCoordinate {
    pub row: usize,
    pub col: usize,
}

/// Cursor movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// The discrete command set of the editing surface.
///
/// Each command is one atomic transition; there is no overlapping command
/// processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorCommand {
    Move(Direction),
    /// Set the current cell to an explicit intensity 0..=9.
    Set(u8),
    /// Toggle the current cell between 0 and 5.
    Toggle,
    /// Cycle the current cell through 0 -> 3 -> 6 -> 9 -> 0.
    Cycle,
    /// Stamp text as dot-matrix pixels, left edge at the cursor column.
    Template(String),
    ClearRequested,
    ClearConfirmed,
    ClearCancelled,
    Save,
    Abandon,
}

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Editing,
    /// A clear was requested and awaits confirmation or cancellation.
    ClearPending,
    /// Terminal: the grid validated and is ready to persist.
    Saved,
    /// Terminal: the session ended without persisting anything.
    Abandoned,
}

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Debug)]
pub enum EditorError {
    /// A command arrived after the session reached a terminal phase.
    SessionClosed,
    /// `Set` carried a value above 9.
    InvalidIntensity(u8),
    /// The save transition rejected the grid.
    Validation(PatternValidationError),
    /// The interactive surface could not start or failed mid-session.
    Surface(String),
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionClosed => write!(f, "editor session already ended"),
            Self::InvalidIntensity(value) => {
                write!(f, "intensity {value} is outside 0..={MAX_INTENSITY}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Surface(detail) => write!(f, "editor surface unavailable: {detail}"),
        }
    }
}

impl Error for EditorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PatternValidationError> for EditorError {
    fn from(value: PatternValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<std::io::Error> for EditorError {
    fn from(value: std::io::Error) -> Self {
        Self::Surface(value.to_string())
    }
}

/// One cooperative editing session over a grid-in-progress.
#[derive(Debug, Clone)]
pub struct EditorSession {
    grid: Vec<Vec<u8>>,
    cursor: GridCoordinate,
    dirty: bool,
    phase: EditorPhase,
    status: String,
}

impl EditorSession {
    /// Starts a session over `grid`, cursor at (0,0).
    ///
    /// # Errors
    /// - Rejects grids that are not 7 equal-length rows of 0..=9 cells, so
    ///   every command can rely on the geometry.
    pub fn new(grid: Vec<Vec<u8>>) -> EditorResult<Self> {
        validate_grid(&grid)?;
        Ok(Self {
            grid,
            cursor: GridCoordinate::default(),
            dirty: false,
            phase: EditorPhase::Editing,
            status: String::from("edit the grid, Ctrl+S saves"),
        })
    }

    pub fn grid(&self) -> &[Vec<u8>] {
        &self.grid
    }

    pub fn cursor(&self) -> GridCoordinate {
        self.cursor
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, EditorPhase::Saved | EditorPhase::Abandoned)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Last human-readable status line for the surface to display.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Value under the cursor.
    pub fn current_value(&self) -> u8 {
        self.grid[self.cursor.row][self.cursor.col]
    }

    /// Consumes a saved session, yielding the validated grid.
    ///
    /// Callers must only invoke this after `phase() == Saved`.
    pub fn into_grid(self) -> Vec<Vec<u8>> {
        self.grid
    }

    /// Applies one command synchronously.
    ///
    /// # Errors
    /// - `SessionClosed` once a terminal phase is reached.
    /// - `Validation` when `Save` rejects the grid; the session stays in
    ///   `Editing` and the error is also mirrored into the status line.
    pub fn apply(&mut self, command: EditorCommand) -> EditorResult<()> {
        if self.is_terminal() {
            return Err(EditorError::SessionClosed);
        }

        if self.phase == EditorPhase::ClearPending {
            match command {
                EditorCommand::ClearConfirmed => {
                    self.grid = blank_grid(self.width());
                    self.dirty = true;
                    self.phase = EditorPhase::Editing;
                    self.status = String::from("grid cleared");
                    return Ok(());
                }
                EditorCommand::ClearCancelled => {
                    self.phase = EditorPhase::Editing;
                    self.status = String::from("clear cancelled");
                    return Ok(());
                }
                // Anything else drops the pending clear and applies normally.
                _ => self.phase = EditorPhase::Editing,
            }
        }

        match command {
            EditorCommand::Move(direction) => self.move_cursor(direction),
            EditorCommand::Set(value) => {
                if value > MAX_INTENSITY {
                    return Err(EditorError::InvalidIntensity(value));
                }
                self.write_cell(value);
            }
            EditorCommand::Toggle => {
                let next = if self.current_value() == 0 { 5 } else { 0 };
                self.write_cell(next);
            }
            EditorCommand::Cycle => {
                let next = cycle_value(self.current_value());
                self.write_cell(next);
            }
            EditorCommand::Template(text) => {
                let written = font::stamp_text(&mut self.grid, self.cursor.col, &text);
                if written > 0 {
                    self.dirty = true;
                }
                self.status = format!("stamped {written} cells from \"{text}\"");
            }
            EditorCommand::ClearRequested => {
                self.phase = EditorPhase::ClearPending;
                self.status = String::from("clear the whole grid?");
            }
            EditorCommand::ClearConfirmed | EditorCommand::ClearCancelled => {
                // Only meaningful while a clear is pending; ignored here.
                self.status = String::from("no clear pending");
            }
            EditorCommand::Save => {
                if let Err(err) = validate_grid(&self.grid) {
                    self.status = err.to_string();
                    return Err(err.into());
                }
                self.phase = EditorPhase::Saved;
                self.status = String::from("saved");
            }
            EditorCommand::Abandon => {
                self.phase = EditorPhase::Abandoned;
                self.status = String::from("abandoned, nothing persisted");
            }
        }
        Ok(())
    }

    fn width(&self) -> usize {
        self.grid[0].len()
    }

    fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.cursor.row = self.cursor.row.saturating_sub(1),
            Direction::Down => self.cursor.row = (self.cursor.row + 1).min(GRID_ROWS - 1),
            Direction::Left => self.cursor.col = self.cursor.col.saturating_sub(1),
            Direction::Right => self.cursor.col = (self.cursor.col + 1).min(self.width() - 1),
        }
    }

    fn write_cell(&mut self, value: u8) {
        self.grid[self.cursor.row][self.cursor.col] = value;
        self.dirty = true;
    }
}

/// 0 -> 3 -> 6 -> 9 -> 0; values off the sequence restart at 0.
fn cycle_value(current: u8) -> u8 {
    match current {
        0 => 3,
        3 => 6,
        6 => 9,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pattern::blank_grid;

    #[test]
    fn cycle_sequence_wraps_and_resets() {
        assert_eq!(cycle_value(0), 3);
        assert_eq!(cycle_value(3), 6);
        assert_eq!(cycle_value(6), 9);
        assert_eq!(cycle_value(9), 0);
        assert_eq!(cycle_value(4), 0);
    }

    #[test]
    fn moves_clamp_at_grid_edges() {
        let mut session = EditorSession::new(blank_grid(2)).unwrap();
        session.apply(EditorCommand::Move(Direction::Up)).unwrap();
        session.apply(EditorCommand::Move(Direction::Left)).unwrap();
        assert_eq!(session.cursor(), GridCoordinate { row: 0, col: 0 });

        for _ in 0..10 {
            session.apply(EditorCommand::Move(Direction::Down)).unwrap();
            session
                .apply(EditorCommand::Move(Direction::Right))
                .unwrap();
        }
        assert_eq!(session.cursor(), GridCoordinate { row: 6, col: 1 });
    }
}
