//! Use-case orchestration services.
//!
//! # Responsibility
//! - Wire the pure scheduling core to its external collaborators behind
//!   trait seams, keeping the core testable without git or a network.

pub mod paint;
