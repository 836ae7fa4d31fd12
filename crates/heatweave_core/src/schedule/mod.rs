//! Scheduling and idempotent-execution core.
//!
//! # Responsibility
//! - Map calendar dates onto grid cells (`resolver`).
//! - Turn a cell target plus an external observation into exactly one
//!   per-tick action (`guard`).
//!
//! # Invariants
//! - Both halves are pure, synchronous and free of I/O; all durable state
//!   lives in the pattern document and the externally observed counter.

pub mod guard;
pub mod resolver;
