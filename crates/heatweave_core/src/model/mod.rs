//! Domain model for heatmap painting schedules.
//!
//! # Responsibility
//! - Define the canonical pattern document persisted into target repos.
//! - Keep grid shape and value invariants in one place.
//!
//! # Invariants
//! - A valid grid is always 7 rows (Sunday..Saturday) of equal width.
//! - Cell values encode daily commit targets in the closed range 0..=9.

pub mod pattern;
