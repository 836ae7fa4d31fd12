//! Terminal rendering for level matrices.
//!
//! # Responsibility
//! - Turn a 7xN level matrix into printable lines, with ANSI truecolor
//!   backgrounds on capable terminals and an ASCII fallback elsewhere.
//!
//! # Invariants
//! - Rendering is pure string building; callers decide where it prints.

/// Contribution palette, level 0 (empty) through 4 (busiest).
pub const LEVEL_RGB: [(u8, u8, u8); 5] = [
    (235, 237, 240),
    (155, 233, 168),
    (64, 196, 99),
    (48, 161, 78),
    (33, 110, 57),
];

const LEVEL_ASCII: [char; 5] = [' ', '.', ':', '=', '#'];

/// Sunday-first row labels, matching the grid row convention.
pub const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Whether stdout can take ANSI color output.
pub fn stdout_is_tty() -> bool {
    use crossterm::tty::IsTty;
    std::io::stdout().is_tty()
}

/// Buckets a raw 0..=9 intensity into the 5-level palette.
pub fn level_for_intensity(value: u8) -> usize {
    match value {
        0 => 0,
        1..=2 => 1,
        3..=5 => 2,
        6..=8 => 3,
        _ => 4,
    }
}

/// Renders a level matrix (values already 0..=4) into display lines.
///
/// With `colored` set, each cell becomes two background-colored spaces;
/// otherwise a single ASCII shade character.
pub fn render_matrix(matrix: &[Vec<u8>], colored: bool) -> Vec<String> {
    let mut lines = Vec::with_capacity(matrix.len());
    for (row_idx, row) in matrix.iter().enumerate() {
        let label = DAY_NAMES.get(row_idx).copied().unwrap_or("???");
        let mut line = format!("{label:>3} ");
        for &level in row {
            let level = usize::from(level.min(4));
            if colored {
                let (r, g, b) = LEVEL_RGB[level];
                line.push_str(&format!("\u{1b}[48;2;{r};{g};{b}m  \u{1b}[0m"));
            } else {
                line.push(LEVEL_ASCII[level]);
            }
        }
        lines.push(line);
    }
    lines
}
