//! Scoring pipeline for task prioritization.
//!
//! This module provides:
//! - **Graph validation**: every dependency exists and there are no cycles.
//! - **Signals**: urgency from the due date, effort from the estimate, and
//!   dependents (fan-in) from the batch.
//! - **Aggregation**: fixed weights into a 0–10 score plus an explanation.
//! - **Ranking**: stable sort by score and the single-slot last-analysis store.
//!
//! # Example
//!
//! ```ignore
//! use taskrank::scoring::Prioritizer;
//!
//! let prioritizer = Prioritizer::new();
//! let ranked = prioritizer.score(&tasks)?;
//! let top = prioritizer.last_top_n(3)?;
//! ```

pub mod aggregate;
pub mod features;
pub mod graph;
mod prioritizer;
pub mod rank;

pub use aggregate::{WEIGHT_DEPENDENCIES, WEIGHT_EFFORT, WEIGHT_IMPORTANCE, WEIGHT_URGENCY, aggregate, explain};
pub use features::{Signals, days_left, dependents_count, effort, urgency};
pub use prioritizer::Prioritizer;
pub use rank::{DEFAULT_SUGGESTIONS, LastAnalysis, rank};
