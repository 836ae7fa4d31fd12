//! Crossterm front end for the editing session.
//!
//! # Responsibility
//! - Translate key presses into editor commands, one at a time.
//! - Paint the grid with the contribution palette and a visible cursor.
//!
//! # Invariants
//! - Refuses to start when stdout is not a terminal; the caller falls
//!   back to a non-interactive default instead of crashing.
//! - Raw mode and the alternate screen are always restored, even when the
//!   session loop fails.

use crate::editor::state::{
    Direction, EditorCommand, EditorError, EditorPhase, EditorResult, EditorSession,
};
use crate::heatmap::render::{level_for_intensity, DAY_NAMES, LEVEL_RGB};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::tty::IsTty;
use crossterm::{cursor, execute, queue};
use std::io::{self, Write};

const TITLE: &str = "heatweave pattern editor";
const HELP: &str =
    "arrows/wasd move · 0-9 set · space 0/5 · c cycle · t text · x clear · Ctrl+S save · q abandon";

/// How an interactive session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorOutcome {
    /// The user saved; the grid passed validation.
    Saved(Vec<Vec<u8>>),
    /// The user abandoned; nothing should be persisted.
    Abandoned,
}

/// What the surface is currently collecting input for.
enum SurfaceMode {
    Grid,
    /// Collecting a template string to stamp at the cursor column.
    TextEntry(String),
}

/// Runs the interactive editor over `grid` until save or abandon.
///
/// # Errors
/// - `Surface` when stdout is not a TTY or terminal I/O fails.
pub fn run_editor(grid: Vec<Vec<u8>>) -> EditorResult<EditorOutcome> {
    let mut stdout = io::stdout();
    if !stdout.is_tty() {
        return Err(EditorError::Surface(String::from(
            "stdout is not a terminal",
        )));
    }

    let mut session = EditorSession::new(grid)?;

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;
    let looped = event_loop(&mut stdout, &mut session);
    // Restore the terminal before surfacing any loop error.
    let _ = execute!(stdout, cursor::Show, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    looped?;

    match session.phase() {
        EditorPhase::Saved => Ok(EditorOutcome::Saved(session.into_grid())),
        _ => Ok(EditorOutcome::Abandoned),
    }
}

fn event_loop(stdout: &mut io::Stdout, session: &mut EditorSession) -> EditorResult<()> {
    let mut mode = SurfaceMode::Grid;

    loop {
        draw(stdout, session, &mode)?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let command = match &mut mode {
            SurfaceMode::TextEntry(buffer) => match key.code {
                KeyCode::Enter => {
                    let text = std::mem::take(buffer);
                    mode = SurfaceMode::Grid;
                    Some(EditorCommand::Template(text))
                }
                KeyCode::Esc => {
                    mode = SurfaceMode::Grid;
                    None
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    None
                }
                KeyCode::Char(ch) => {
                    buffer.push(ch);
                    None
                }
                _ => None,
            },
            SurfaceMode::Grid => map_grid_key(session, key.code, key.modifiers, &mut mode),
        };

        if let Some(command) = command {
            match session.apply(command) {
                // Save rejections stay in the session; the status line
                // already carries the validation message.
                Ok(()) | Err(EditorError::Validation(_)) => {}
                Err(err) => return Err(err),
            }
        }

        if session.is_terminal() {
            return Ok(());
        }
    }
}

fn map_grid_key(
    session: &EditorSession,
    code: KeyCode,
    modifiers: KeyModifiers,
    mode: &mut SurfaceMode,
) -> Option<EditorCommand> {
    if session.phase() == EditorPhase::ClearPending {
        return match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(EditorCommand::ClearConfirmed),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                Some(EditorCommand::ClearCancelled)
            }
            _ => Some(EditorCommand::ClearCancelled),
        };
    }

    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('s') => Some(EditorCommand::Save),
            _ => None,
        };
    }

    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(EditorCommand::Move(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('s') => Some(EditorCommand::Move(Direction::Down)),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(EditorCommand::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(EditorCommand::Move(Direction::Right))
        }
        KeyCode::Char(' ') => Some(EditorCommand::Toggle),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(EditorCommand::Cycle),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(EditorCommand::ClearRequested),
        KeyCode::Char('t') | KeyCode::Char('T') => {
            *mode = SurfaceMode::TextEntry(String::new());
            None
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(EditorCommand::Abandon),
        KeyCode::Char(digit @ '0'..='9') => Some(EditorCommand::Set(digit as u8 - b'0')),
        _ => None,
    }
}

fn draw(
    stdout: &mut io::Stdout,
    session: &EditorSession,
    mode: &SurfaceMode,
) -> io::Result<()> {
    let (term_cols, term_rows) = terminal::size()?;
    let visible_cols = usize::from(term_cols).saturating_sub(5);

    queue!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
    queue!(stdout, Print(TITLE), cursor::MoveTo(0, 1), Print(HELP))?;

    let grid = session.grid();
    let width = grid[0].len().min(visible_cols);

    let header: String = (0..width).map(|col| char::from(b'0' + (col % 10) as u8)).collect();
    queue!(stdout, cursor::MoveTo(0, 3), Print(format!("    {header}")))?;

    let cursor_pos = session.cursor();
    for (row_idx, row) in grid.iter().enumerate() {
        let line_y = 4 + row_idx as u16;
        if line_y + 2 >= term_rows {
            break;
        }
        queue!(
            stdout,
            cursor::MoveTo(0, line_y),
            Print(format!("{:>3} ", DAY_NAMES[row_idx]))
        )?;
        for (col_idx, &value) in row.iter().take(width).enumerate() {
            let (r, g, b) = LEVEL_RGB[level_for_intensity(value)];
            let under_cursor = row_idx == cursor_pos.row && col_idx == cursor_pos.col;
            if under_cursor {
                queue!(stdout, SetAttribute(Attribute::Reverse))?;
            }
            queue!(
                stdout,
                SetBackgroundColor(Color::Rgb { r, g, b }),
                SetForegroundColor(if value == 0 { Color::DarkGrey } else { Color::Black }),
                Print(char::from(b'0' + value % 10)),
                SetAttribute(Attribute::Reset),
            )?;
        }
    }

    let info_y = 4 + grid.len() as u16 + 1;
    if info_y + 1 < term_rows {
        queue!(
            stdout,
            cursor::MoveTo(0, info_y),
            Print(format!(
                "cursor: {} week {} · value {}",
                DAY_NAMES[cursor_pos.row],
                cursor_pos.col + 1,
                session.current_value()
            ))
        )?;
    }

    let status_y = term_rows.saturating_sub(2);
    let status_line = match mode {
        SurfaceMode::TextEntry(buffer) => {
            format!("text: {buffer}_ (Enter stamps at cursor column, Esc cancels)")
        }
        SurfaceMode::Grid if session.phase() == EditorPhase::ClearPending => {
            String::from("clear the whole grid? y confirms, any other key cancels")
        }
        SurfaceMode::Grid => session.status().to_string(),
    };
    queue!(stdout, cursor::MoveTo(0, status_y), Print(status_line))?;

    stdout.flush()
}
