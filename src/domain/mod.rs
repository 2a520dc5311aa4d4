//! Domain types for taskrank
//!
//! - Task / ScoredTask: the records flowing through scoring
//! - Explanation / Reason: tagged phrases explaining a score
//! - TaskInput: the loosely-shaped wire record and its normalization

pub mod explanation;
pub mod input;
pub mod task;

pub use explanation::{Explanation, Reason};
pub use input::{TaskInput, TaskRef, normalize_batch, parse_batch, parse_tasks};
pub use task::{DEFAULT_ESTIMATED_HOURS, DEFAULT_IMPORTANCE, PriorityBand, ScoredTask, Task};
