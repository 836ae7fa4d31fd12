//! Interactive grid editor.
//!
//! # Responsibility
//! - Drive a single-threaded editing session over one grid via discrete
//!   commands (`state`).
//! - Render short text strings into grid cells through a static dot-matrix
//!   font (`font`).
//! - Translate terminal key events into commands and paint the grid
//!   (`tui`).
//!
//! # Invariants
//! - The command state machine is pure and fully testable without a
//!   terminal; `tui` is the only module that touches crossterm.

pub mod font;
pub mod state;
pub mod tui;
