//! Task and scored task records
//!
//! A `Task` is the validated input to scoring; a `ScoredTask` is the same task
//! carrying its score and explanation. Neither outlives the batch it was built
//! for, except through the last-analysis slot.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::explanation::Explanation;

/// Hours assumed when a record carries no estimate.
pub const DEFAULT_ESTIMATED_HOURS: f64 = 1.0;

/// Importance assumed when a record carries none.
pub const DEFAULT_IMPORTANCE: u8 = 5;

/// Lowest accepted importance.
pub const MIN_IMPORTANCE: u8 = 1;
/// Highest accepted importance.
pub const MAX_IMPORTANCE: u8 = 10;

/// A task as seen by the scoring pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique within one batch
    pub id: String,

    /// Informational only
    pub title: String,

    /// Calendar due date; `None` when the supplied date could not be interpreted
    pub due_date: Option<NaiveDate>,

    /// Non-negative effort estimate
    pub estimated_hours: f64,

    /// 1 (lowest) to 10 (highest)
    pub importance: u8,

    /// Ids of tasks that must complete before this one, in declaration order
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Task {
    /// Create a task with default hours, importance and no dependencies
    pub fn new(id: impl Into<String>, title: impl Into<String>, due_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            due_date: Some(due_date),
            estimated_hours: DEFAULT_ESTIMATED_HOURS,
            importance: DEFAULT_IMPORTANCE,
            dependencies: Vec::new(),
        }
    }

    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = hours;
        self
    }

    pub fn with_importance(mut self, importance: u8) -> Self {
        self.importance = importance;
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

/// A task with its computed score and explanation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTask {
    #[serde(flatten)]
    pub task: Task,

    /// In [0, 10], rounded to two decimals
    pub score: f64,

    /// Ordered reasons, serialized as one `". "`-joined string
    pub explanation: Explanation,
}

impl ScoredTask {
    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn band(&self) -> PriorityBand {
        PriorityBand::from_score(self.score)
    }
}

/// Display bucket for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

impl PriorityBand {
    /// Scores of 7 and up are high, 4 and up medium, the rest low
    pub fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            PriorityBand::High
        } else if score >= 4.0 {
            PriorityBand::Medium
        } else {
            PriorityBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityBand::High => "high",
            PriorityBand::Medium => "medium",
            PriorityBand::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::explanation::Reason;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_task_new_defaults() {
        let task = Task::new("a", "Write report", date(2025, 3, 1));
        assert_eq!(task.estimated_hours, 1.0);
        assert_eq!(task.importance, 5);
        assert!(task.dependencies.is_empty());
        assert_eq!(task.due_date, Some(date(2025, 3, 1)));
    }

    #[test]
    fn test_task_builders() {
        let task = Task::new("a", "Write report", date(2025, 3, 1))
            .with_hours(3.5)
            .with_importance(9)
            .with_dependencies(["b", "c"]);
        assert_eq!(task.estimated_hours, 3.5);
        assert_eq!(task.importance, 9);
        assert_eq!(task.dependencies, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_task_date_serializes_as_iso() {
        let task = Task::new("a", "Write report", date(2025, 3, 1));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["due_date"], "2025-03-01");
    }

    #[test]
    fn test_scored_task_flattens_task_fields() {
        let scored = ScoredTask {
            task: Task::new("a", "Write report", date(2025, 3, 1)).with_dependencies(["b"]),
            score: 5.27,
            explanation: Explanation::new(vec![Reason::DueSoon, Reason::Blocks(2)]),
        };
        let json = serde_json::to_value(&scored).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["title"], "Write report");
        assert_eq!(json["score"], 5.27);
        assert_eq!(json["explanation"], "Due soon. Blocks 2 task(s)");
        assert_eq!(json["dependencies"][0], "b");
    }

    #[test]
    fn test_scored_task_parses_back() {
        let json = r#"{
            "id": "7",
            "title": "Ship it",
            "due_date": "2025-03-01",
            "estimated_hours": 2.0,
            "importance": 8,
            "dependencies": [],
            "score": 6.4,
            "explanation": "Overdue. High importance"
        }"#;
        let scored: ScoredTask = serde_json::from_str(json).unwrap();
        assert_eq!(scored.id(), "7");
        assert_eq!(scored.explanation.reasons(), &[Reason::Overdue, Reason::HighImportance]);
    }

    #[test]
    fn test_priority_band_thresholds() {
        assert_eq!(PriorityBand::from_score(7.0), PriorityBand::High);
        assert_eq!(PriorityBand::from_score(6.99), PriorityBand::Medium);
        assert_eq!(PriorityBand::from_score(4.0), PriorityBand::Medium);
        assert_eq!(PriorityBand::from_score(3.99), PriorityBand::Low);
        assert_eq!(PriorityBand::from_score(0.0), PriorityBand::Low);
    }
}
