//! Upcoming-deadline report.
//!
//! # Invariants
//! - Only tasks dated strictly after `today` are reported.
//! - Entries are ordered by date ascending and capped at `limit`.

use crate::model::entity::Task;
use crate::model::ordering::compare_by_date;
use crate::model::tree::{BoardTree, TreeError, TreeResult};
use serde::Serialize;

/// Default number of entries in the upcoming report.
pub const UPCOMING_LIMIT: usize = 3;

/// One reported task with the names of its containers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpcomingTask {
    pub task: Task,
    pub board_name: String,
    pub list_name: String,
}

/// Returns the next `limit` tasks due after `today` across all boards of
/// `username`.
///
/// `today` must be a `YYYY-MM-DD` string; comparison is lexicographic.
pub fn upcoming_tasks(
    tree: &BoardTree,
    username: &str,
    today: &str,
    limit: usize,
) -> TreeResult<Vec<UpcomingTask>> {
    if !tree.contains_user(username) {
        return Err(TreeError::UserNotFound(username.to_string()));
    }

    let mut upcoming = Vec::new();
    for board in tree.boards_of(username) {
        for list in tree.lists_of(board.id) {
            for task in tree.tasks_of(list.id) {
                if task.date.as_str() > today {
                    upcoming.push(UpcomingTask {
                        task: task.clone(),
                        board_name: board.name.clone(),
                        list_name: list.name.clone(),
                    });
                }
            }
        }
    }

    upcoming.sort_by(|a, b| compare_by_date(&a.task, &b.task));
    upcoming.truncate(limit);
    Ok(upcoming)
}
