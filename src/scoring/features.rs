//! Per-task signals feeding the score.
//!
//! - Urgency: step function of whole days left until the due date
//! - Effort: `1 / (1 + hours)`, favoring quick tasks
//! - Dependents: how many tasks in the batch list this one as a dependency

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::Task;

/// Urgency of a task already past its due date.
pub const URGENCY_OVERDUE: u8 = 10;
/// Urgency of a task due today.
pub const URGENCY_TODAY: u8 = 9;
/// Urgency of a task due within three days.
pub const URGENCY_SOON: u8 = 7;
/// Urgency of a task due within a week.
pub const URGENCY_WEEK: u8 = 5;
/// Urgency of anything further out.
pub const URGENCY_LATER: u8 = 3;
/// Urgency of a task whose due date could not be interpreted.
pub const URGENCY_UNKNOWN: u8 = 0;

/// Whole days from `today` until `due`; negative once overdue.
pub fn days_left(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Map days left to an urgency level.
///
/// `None` means the due date was not interpretable and yields no urgency.
pub fn urgency(days_left: Option<i64>) -> u8 {
    match days_left {
        None => URGENCY_UNKNOWN,
        Some(d) if d < 0 => URGENCY_OVERDUE,
        Some(0) => URGENCY_TODAY,
        Some(1..=3) => URGENCY_SOON,
        Some(4..=7) => URGENCY_WEEK,
        Some(_) => URGENCY_LATER,
    }
}

/// Convenience of a task given its estimate; 1 for zero hours, tending to 0.
///
/// Negative estimates count as zero.
pub fn effort(hours: f64) -> f64 {
    1.0 / (1.0 + hours.max(0.0))
}

/// Count, for every task, how many tasks in the batch depend on it.
///
/// Every task gets an entry, zero when nothing depends on it.
pub fn dependents_count(tasks: &[Task]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = tasks.iter().map(|t| (t.id.as_str(), 0)).collect();

    for task in tasks {
        for dep in &task.dependencies {
            *counts.entry(dep.as_str()).or_insert(0) += 1;
        }
    }

    counts
}

/// The signals computed for one task
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    /// Days until due, `None` when the due date is unknown
    pub days_left: Option<i64>,
    pub urgency: u8,
    pub importance: u8,
    pub effort: f64,
    pub dependents: usize,
}

impl Signals {
    /// Compute every signal for `task` against the batch-wide `today` and dependents map.
    pub fn compute(task: &Task, today: NaiveDate, dependents: &HashMap<&str, usize>) -> Self {
        let days_left = task.due_date.map(|due| days_left(due, today));
        Self {
            days_left,
            urgency: urgency(days_left),
            importance: task.importance,
            effort: effort(task.estimated_hours),
            dependents: dependents.get(task.id.as_str()).copied().unwrap_or(0),
        }
    }
}
