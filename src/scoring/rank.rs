//! Ranking and the last-analysis slot.
//!
//! Ranking is a stable sort by score, highest first, so equal scores keep
//! their batch order. The most recent ranked list is kept in a single-slot
//! store so callers can ask for the top tasks again without resubmitting.

use std::sync::{Arc, Mutex};

use crate::domain::ScoredTask;
use crate::error::{RankError, Result};

/// Number of tasks returned by a suggestion when the caller does not say.
pub const DEFAULT_SUGGESTIONS: usize = 3;

/// Sort by score descending; ties keep input order.
pub fn rank(mut scored: Vec<ScoredTask>) -> Vec<ScoredTask> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Single-slot store of the most recent ranked list.
///
/// The slot holds an `Arc` swapped whole under a mutex, so a reader sees
/// either the previous list or the new one, never a mix.
#[derive(Debug, Default)]
pub struct LastAnalysis {
    slot: Mutex<Option<Arc<[ScoredTask]>>>,
}

impl LastAnalysis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored list.
    pub fn store(&self, ranked: &[ScoredTask]) {
        let list: Arc<[ScoredTask]> = Arc::from(ranked);
        // A poisoned slot still holds a complete list; overwrite it.
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(list);
    }

    /// The whole stored list, if any batch has been stored.
    pub fn latest(&self) -> Option<Arc<[ScoredTask]>> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// First `n` tasks of the stored list (fewer if the list is shorter).
    pub fn top(&self, n: usize) -> Result<Vec<ScoredTask>> {
        let latest = self.latest().ok_or(RankError::NoPriorAnalysis)?;
        Ok(latest.iter().take(n).cloned().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.latest().is_none()
    }
}
