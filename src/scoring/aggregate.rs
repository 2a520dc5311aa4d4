//! Weighted aggregation of signals into a score and explanation.
//!
//! `raw = urgency*4 + importance*3 + effort*2 + dependents*1`, then
//! `score = clamp(raw / 10, 0, 10)` rounded to two decimals.
//!
//! The divisor is a fixed scale, not the largest achievable raw value: without
//! many dependents a score tops out a little above 7.

use crate::domain::{Explanation, Reason, ScoredTask, Task};
use crate::scoring::features::Signals;

/// Weight of the urgency signal.
pub const WEIGHT_URGENCY: f64 = 4.0;
/// Weight of stated importance.
pub const WEIGHT_IMPORTANCE: f64 = 3.0;
/// Weight of the effort signal.
pub const WEIGHT_EFFORT: f64 = 2.0;
/// Weight of the dependents count.
pub const WEIGHT_DEPENDENCIES: f64 = 1.0;

/// Fixed divisor applied to the raw weighted sum.
pub const SCALE: f64 = 10.0;
/// Upper bound of a score.
pub const MAX_SCORE: f64 = 10.0;

/// Importance at or above which a task is called out as important.
pub const HIGH_IMPORTANCE: u8 = 8;
/// Importance at or below which a task is called out as unimportant.
pub const LOW_IMPORTANCE: u8 = 3;
/// Estimates at or under this many hours are quick wins.
pub const LOW_EFFORT_HOURS: f64 = 2.0;
/// Estimates at or over this many hours are heavy.
pub const HIGH_EFFORT_HOURS: f64 = 6.0;

/// Weighted sum of the signals before scaling.
pub fn raw_score(signals: &Signals) -> f64 {
    f64::from(signals.urgency) * WEIGHT_URGENCY
        + f64::from(signals.importance) * WEIGHT_IMPORTANCE
        + signals.effort * WEIGHT_EFFORT
        + signals.dependents as f64 * WEIGHT_DEPENDENCIES
}

/// Scale a raw sum into [0, 10] and round to two decimals.
pub fn normalize(raw: f64) -> f64 {
    round2((raw / SCALE).clamp(0.0, MAX_SCORE))
}

/// Round the exact decimal value of `value`, ties to even.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Reasons for a task's rank, in display order.
///
/// The effort reason looks at the raw estimate, not the effort signal.
pub fn explain(signals: &Signals, estimated_hours: f64) -> Explanation {
    let mut reasons = Vec::new();

    match signals.days_left {
        Some(d) if d < 0 => reasons.push(Reason::Overdue),
        Some(0) => reasons.push(Reason::DueToday),
        Some(1..=3) => reasons.push(Reason::DueSoon),
        _ => {}
    }

    if signals.importance >= HIGH_IMPORTANCE {
        reasons.push(Reason::HighImportance);
    } else if signals.importance <= LOW_IMPORTANCE {
        reasons.push(Reason::LowImportance);
    }

    if estimated_hours <= LOW_EFFORT_HOURS {
        reasons.push(Reason::LowEffort);
    } else if estimated_hours >= HIGH_EFFORT_HOURS {
        reasons.push(Reason::HighEffort);
    }

    if signals.dependents > 0 {
        reasons.push(Reason::Blocks(signals.dependents));
    }

    Explanation::new(reasons)
}

/// Score one task. The input task is copied, never modified.
pub fn aggregate(task: &Task, signals: &Signals) -> ScoredTask {
    ScoredTask {
        task: task.clone(),
        score: normalize(raw_score(signals)),
        explanation: explain(signals, task.estimated_hours),
    }
}
