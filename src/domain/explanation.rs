//! Explanation phrases attached to a scored task
//!
//! Reasons stay tagged until they cross a boundary (JSON, terminal), where they
//! are joined with `". "`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Separator between phrases in the joined form.
pub const SEPARATOR: &str = ". ";

/// One reason contributing to a task's rank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Overdue,
    DueToday,
    DueSoon,
    HighImportance,
    LowImportance,
    LowEffort,
    HighEffort,
    /// Number of tasks in the batch that depend on this one
    Blocks(usize),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reason::Overdue => write!(f, "Overdue"),
            Reason::DueToday => write!(f, "Due today"),
            Reason::DueSoon => write!(f, "Due soon"),
            Reason::HighImportance => write!(f, "High importance"),
            Reason::LowImportance => write!(f, "Low importance"),
            Reason::LowEffort => write!(f, "Low effort (quick win)"),
            Reason::HighEffort => write!(f, "High effort"),
            Reason::Blocks(n) => write!(f, "Blocks {} task(s)", n),
        }
    }
}

impl FromStr for Reason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Overdue" => Ok(Reason::Overdue),
            "Due today" => Ok(Reason::DueToday),
            "Due soon" => Ok(Reason::DueSoon),
            "High importance" => Ok(Reason::HighImportance),
            "Low importance" => Ok(Reason::LowImportance),
            "Low effort (quick win)" => Ok(Reason::LowEffort),
            "High effort" => Ok(Reason::HighEffort),
            other => other
                .strip_prefix("Blocks ")
                .and_then(|rest| rest.strip_suffix(" task(s)"))
                .and_then(|n| n.parse().ok())
                .map(Reason::Blocks)
                .ok_or_else(|| format!("unknown explanation phrase: {}", other)),
        }
    }
}

/// Ordered list of reasons
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Explanation(Vec<Reason>);

impl Explanation {
    pub fn new(reasons: Vec<Reason>) -> Self {
        Self(reasons)
    }

    pub fn reasons(&self) -> &[Reason] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, reason: Reason) -> bool {
        self.0.contains(&reason)
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, reason) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(SEPARATOR)?;
            }
            write!(f, "{}", reason)?;
        }
        Ok(())
    }
}

impl FromStr for Explanation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        s.split(SEPARATOR).map(str::parse).collect::<Result<Vec<_>, _>>().map(Self)
    }
}

impl Serialize for Explanation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Explanation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
