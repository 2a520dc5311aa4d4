//! Loosely-shaped task records and their normalization
//!
//! Callers hand us JSON where most fields are optional and ids may be numbers.
//! `normalize_batch` applies the defaults and range checks so the scoring
//! pipeline only ever sees well-formed `Task` values:
//!
//! | field             | default                  | accepted                |
//! |-------------------|--------------------------|-------------------------|
//! | `id`              | zero-based record index  | string or integer, ≤ 20 |
//! | `title`           | required                 | non-blank, ≤ 255        |
//! | `due_date`        | required                 | `YYYY-MM-DD`            |
//! | `estimated_hours` | 1                        | finite, ≥ 0             |
//! | `importance`      | 5                        | integer 1..=10          |
//! | `dependencies`    | empty                    | ids, duplicates dropped |
//!
//! A `due_date` that is present but unparseable is kept as "unknown" and
//! scores no urgency rather than rejecting the batch.

use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::task::{DEFAULT_ESTIMATED_HOURS, DEFAULT_IMPORTANCE, MAX_IMPORTANCE, MIN_IMPORTANCE, Task};
use crate::error::{RankError, Result};

/// Longest accepted task id.
pub const MAX_ID_LEN: usize = 20;

/// Longest accepted task title.
pub const MAX_TITLE_LEN: usize = 255;

/// Date format accepted for `due_date`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A task id as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskRef {
    Text(String),
    Number(i64),
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskRef::Text(s) => f.write_str(s),
            TaskRef::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for TaskRef {
    fn from(s: &str) -> Self {
        TaskRef::Text(s.to_string())
    }
}

/// A task record before defaults are applied
///
/// Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<TaskRef>>,
}

/// Parse a JSON payload that must be an array of task records.
pub fn parse_batch(json: &str) -> Result<Vec<TaskInput>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(RankError::InvalidInput("Expected a JSON array of tasks.".to_string()));
    }
    serde_json::from_value(value).map_err(|e| RankError::InvalidInput(format!("malformed task record: {}", e)))
}

/// Parse and normalize a JSON array of task records.
pub fn parse_tasks(json: &str) -> Result<Vec<Task>> {
    normalize_batch(parse_batch(json)?)
}

/// Apply defaults and range checks to every record of a batch.
///
/// Fails on the first offending record; ids are checked for uniqueness after
/// index defaulting.
pub fn normalize_batch(inputs: Vec<TaskInput>) -> Result<Vec<Task>> {
    let mut seen = HashSet::with_capacity(inputs.len());
    let mut tasks = Vec::with_capacity(inputs.len());

    for (index, input) in inputs.into_iter().enumerate() {
        let task = normalize(index, input)?;
        if !seen.insert(task.id.clone()) {
            return Err(RankError::InvalidInput(format!("duplicate task id {}", task.id)));
        }
        tasks.push(task);
    }

    Ok(tasks)
}

fn normalize(index: usize, input: TaskInput) -> Result<Task> {
    let id = input.id.map(|r| r.to_string()).unwrap_or_else(|| index.to_string());
    check_id(&id)?;

    let title = match input.title {
        Some(title) if !title.trim().is_empty() => title,
        _ => return Err(invalid(&id, "title is required")),
    };
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(invalid(&id, &format!("title longer than {} characters", MAX_TITLE_LEN)));
    }

    let due_date = match input.due_date {
        Some(raw) => parse_due_date(&id, &raw),
        None => return Err(invalid(&id, "due_date is required")),
    };

    let estimated_hours = input.estimated_hours.unwrap_or(DEFAULT_ESTIMATED_HOURS);
    if !estimated_hours.is_finite() || estimated_hours < 0.0 {
        return Err(invalid(&id, "estimated_hours must be a non-negative number"));
    }

    let importance = input.importance.unwrap_or(i64::from(DEFAULT_IMPORTANCE));
    let importance = u8::try_from(importance)
        .ok()
        .filter(|i| (MIN_IMPORTANCE..=MAX_IMPORTANCE).contains(i))
        .ok_or_else(|| {
            invalid(
                &id,
                &format!("importance must be between {} and {}", MIN_IMPORTANCE, MAX_IMPORTANCE),
            )
        })?;

    let mut dependencies: Vec<String> = Vec::new();
    for dep in input.dependencies.unwrap_or_default() {
        let dep = dep.to_string();
        check_id(&dep)?;
        if dependencies.contains(&dep) {
            log::debug!("Task {} lists dependency {} more than once", id, dep);
            continue;
        }
        dependencies.push(dep);
    }

    Ok(Task {
        id,
        title,
        due_date,
        estimated_hours,
        importance,
        dependencies,
    })
}

fn parse_due_date(id: &str, raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            log::warn!("Task {}: cannot interpret due_date {:?} ({}), scoring it without urgency", id, raw, e);
            None
        }
    }
}

fn check_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(RankError::InvalidInput("task id must not be empty".to_string()));
    }
    if id.chars().count() > MAX_ID_LEN {
        return Err(RankError::InvalidInput(format!(
            "task id {} longer than {} characters",
            id, MAX_ID_LEN
        )));
    }
    Ok(())
}

fn invalid(id: &str, message: &str) -> RankError {
    RankError::InvalidInput(format!("task {}: {}", id, message))
}
