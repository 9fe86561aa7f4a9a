//! Task priority and due-date ordering.
//!
//! # Invariants
//! - Priority rank: `low` = 0, `medium` = 1, `high` = 2; anything else is 0.
//! - Date order is plain string order, which matches calendar order only for
//!   zero-padded `YYYY-MM-DD` values.

use crate::model::entity::Task;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Priority labels accepted on validated paths, lowest first.
pub const PRIORITY_LEVELS: [&str; 3] = ["low", "medium", "high"];

/// Returns comparison rank for one priority label.
pub fn priority_rank(priority: &str) -> usize {
    PRIORITY_LEVELS
        .iter()
        .position(|level| *level == priority)
        .unwrap_or(0)
}

/// Orders tasks by priority, highest first.
pub fn compare_by_priority(a: &Task, b: &Task) -> Ordering {
    priority_rank(&b.priority).cmp(&priority_rank(&a.priority))
}

/// Orders tasks by due date, nearest first.
pub fn compare_by_date(a: &Task, b: &Task) -> Ordering {
    a.date.cmp(&b.date)
}

/// Sort order a user can pick for one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortCriterion {
    /// High to low.
    Priority,
    /// Nearest to furthest.
    Date,
}

impl SortCriterion {
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Priority => compare_by_priority(a, b),
            Self::Date => compare_by_date(a, b),
        }
    }
}
