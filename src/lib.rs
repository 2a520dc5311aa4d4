//! Taskrank - deadline- and dependency-aware task prioritization
//!
//! Scores a batch of tasks from four signals (deadline urgency, importance,
//! effort and dependency fan-in), ranks them, and explains each score.
//! Batches whose dependency graph is broken or cyclic are rejected.

pub mod domain;
pub mod error;
pub mod ipc;
pub mod scoring;

pub use error::{RankError, Result};
