//! Remote contribution heatmap preview.
//!
//! # Responsibility
//! - Fetch a user's public contribution calendar and reshape it into a
//!   Sunday-first 7xN level matrix (`fetch`).
//! - Render that matrix as colored or plain terminal output (`render`).
//!
//! # Invariants
//! - Preview failures are never fatal for the surrounding flow; callers
//!   log and continue without a preview.

pub mod fetch;
pub mod render;
