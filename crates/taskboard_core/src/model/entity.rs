//! Board hierarchy entities.
//!
//! # Responsibility
//! - Define the four record shapes of the ownership tree.
//! - Carry explicit parent keys so entities can live in flat arenas.
//!
//! # Invariants
//! - `username` identifies a `User`; `id` identifies boards, lists, tasks.
//! - Parent keys (`owner`, `board_id`, `list_id`) are maintained by
//!   `BoardTree` and must not be rewritten by callers.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Identifier shared by boards, lists and tasks.
pub type EntityId = i64;

/// Entity kinds that carry a numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Board,
    List,
    Task,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Board => write!(f, "board"),
            Self::List => write!(f, "list"),
            Self::Task => write!(f, "task"),
        }
    }
}

/// Account record. Password is stored as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Case-sensitive unique login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
}

impl User {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Top-level named collection owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: EntityId,
    pub name: String,
    /// Username of the owning user.
    pub owner: String,
}

/// Named ordered collection of tasks owned by one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: EntityId,
    pub name: String,
    /// Id of the owning board.
    pub board_id: EntityId,
}

/// Unit of work with priority and due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub name: String,
    /// `low|medium|high` on validated paths; free text from foreign data.
    pub priority: String,
    /// `YYYY-MM-DD` on validated paths; not re-checked on load.
    pub date: String,
    /// Id of the list whose sequence currently holds this task.
    pub list_id: EntityId,
}

/// Partial task update. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub name: Option<String>,
    pub priority: Option<String>,
    pub date: Option<String>,
}

impl TaskEdit {
    /// Returns whether applying this edit would change nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.priority.is_none() && self.date.is_none()
    }
}
