//! The scoring service.
//!
//! `Prioritizer` runs one batch through validation, signals, aggregation and
//! ranking, then records the ranked list in its `LastAnalysis` slot. Every
//! call builds its own intermediates; only the slot is shared between callers.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use log::{debug, info};

use crate::domain::{ScoredTask, Task};
use crate::error::Result;
use crate::scoring::aggregate::aggregate;
use crate::scoring::features::{Signals, dependents_count};
use crate::scoring::graph;
use crate::scoring::rank::{LastAnalysis, rank};

/// Scores batches of tasks and remembers the last ranked list
#[derive(Debug, Clone, Default)]
pub struct Prioritizer {
    last: Arc<LastAnalysis>,
}

impl Prioritizer {
    /// Create a prioritizer with its own, empty, last-analysis slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a prioritizer sharing an existing slot.
    pub fn with_store(last: Arc<LastAnalysis>) -> Self {
        Self { last }
    }

    /// Score and rank a batch against today's local date.
    pub fn score(&self, tasks: &[Task]) -> Result<Vec<ScoredTask>> {
        self.score_on(tasks, Local::now().date_naive())
    }

    /// Score and rank a batch against an explicit date.
    ///
    /// Fails without storing anything when a dependency is missing or the
    /// dependencies form a cycle.
    pub fn score_on(&self, tasks: &[Task], today: NaiveDate) -> Result<Vec<ScoredTask>> {
        graph::validate(tasks)?;

        let dependents = dependents_count(tasks);
        let scored: Vec<ScoredTask> = tasks
            .iter()
            .map(|task| {
                let signals = Signals::compute(task, today, &dependents);
                debug!("Task {} signals: {:?}", task.id, signals);
                aggregate(task, &signals)
            })
            .collect();

        let ranked = rank(scored);
        self.last.store(&ranked);

        info!(
            "Scored {} task(s), top: {}",
            ranked.len(),
            ranked.first().map(|s| s.id()).unwrap_or("-")
        );
        Ok(ranked)
    }

    /// First `n` tasks of the most recent successful ranking.
    pub fn last_top_n(&self, n: usize) -> Result<Vec<ScoredTask>> {
        self.last.top(n)
    }

    /// Top `n` of a fresh batch when one is given, else of the last ranking.
    ///
    /// Scoring a fresh batch replaces the remembered ranking.
    pub fn suggest(&self, tasks: Option<&[Task]>, n: usize) -> Result<Vec<ScoredTask>> {
        match tasks {
            Some(tasks) => {
                let mut ranked = self.score(tasks)?;
                ranked.truncate(n);
                Ok(ranked)
            }
            None => self.last_top_n(n),
        }
    }
}
