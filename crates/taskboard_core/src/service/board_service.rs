//! Board, list and task use-cases.
//!
//! # Responsibility
//! - Validate names, priorities and due dates above the tree layer.
//! - Resolve 1-based menu positions into entity ids.
//! - Provide create/rename/delete for boards and lists, and
//!   add/edit/delete/move/sort for tasks.
//!
//! # Invariants
//! - A rejected request leaves the tree unchanged.
//! - Tasks only move between lists of the same board.
//! - Stored text never contains the table quote character or line breaks.

use crate::codec::QUOTE;
use crate::model::date::is_valid_due_date;
use crate::model::entity::{Board, EntityId, Task, TaskEdit, TaskList};
use crate::model::ordering::SortCriterion;
use crate::model::tree::{MoveOutcome, TreeError};
use crate::model::workspace::Workspace;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from board/list/task use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardServiceError {
    /// Name is blank or contains a forbidden character.
    InvalidName,
    /// Priority is blank or contains a forbidden character.
    InvalidPriority,
    /// Date is not a `YYYY-MM-DD` calendar date.
    InvalidDate(String),
    /// 1-based position does not name an existing entry.
    PositionOutOfRange { position: usize, available: usize },
    /// Move target does not belong to the task's board.
    ListOutsideBoard {
        list_id: EntityId,
        board_id: EntityId,
    },
    /// Structural tree failure (unknown id, duplicate id).
    Tree(TreeError),
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(
                f,
                "name must not be blank and must not contain quotes or line breaks"
            ),
            Self::InvalidPriority => write!(
                f,
                "priority must not be blank and must not contain quotes or line breaks"
            ),
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected YYYY-MM-DD")
            }
            Self::PositionOutOfRange {
                position,
                available,
            } => write!(f, "position {position} is out of range 1..={available}"),
            Self::ListOutsideBoard { list_id, board_id } => {
                write!(f, "list {list_id} does not belong to board {board_id}")
            }
            Self::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for BoardServiceError {
    fn from(value: TreeError) -> Self {
        Self::Tree(value)
    }
}

pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Input for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub priority: String,
    /// `YYYY-MM-DD`.
    pub date: String,
}

impl NewTask {
    pub fn new(
        name: impl Into<String>,
        priority: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            priority: priority.into(),
            date: date.into(),
        }
    }
}

/// Use-case facade over one workspace.
pub struct BoardService<'w> {
    workspace: &'w mut Workspace,
}

impl<'w> BoardService<'w> {
    pub fn new(workspace: &'w mut Workspace) -> Self {
        Self { workspace }
    }

    pub fn boards(&self, owner: &str) -> Vec<&Board> {
        self.workspace.tree.boards_of(owner)
    }

    pub fn lists(&self, board_id: EntityId) -> Vec<&TaskList> {
        self.workspace.tree.lists_of(board_id)
    }

    pub fn tasks(&self, list_id: EntityId) -> Vec<&Task> {
        self.workspace.tree.tasks_of(list_id)
    }

    /// Resolves the board shown at 1-based `position` for `owner`.
    pub fn board_at(&self, owner: &str, position: usize) -> BoardServiceResult<EntityId> {
        let boards = self.workspace.tree.boards_of(owner);
        pick(position, boards.iter().map(|board| board.id))
    }

    /// Resolves the list shown at 1-based `position` on `board_id`.
    pub fn list_at(&self, board_id: EntityId, position: usize) -> BoardServiceResult<EntityId> {
        let lists = self.workspace.tree.lists_of(board_id);
        pick(position, lists.iter().map(|list| list.id))
    }

    /// Resolves the task shown at 1-based `position` in `list_id`.
    pub fn task_at(&self, list_id: EntityId, position: usize) -> BoardServiceResult<EntityId> {
        let tasks = self.workspace.tree.tasks_of(list_id);
        pick(position, tasks.iter().map(|task| task.id))
    }

    pub fn create_board(&mut self, owner: &str, name: &str) -> BoardServiceResult<EntityId> {
        let name = normalize_name(name)?;
        let Workspace { tree, ids } = &mut *self.workspace;
        let id = tree.create_board(ids, owner, name)?;
        debug!("event=board_create module=service status=ok board_id={id}");
        Ok(id)
    }

    pub fn rename_board(&mut self, board_id: EntityId, name: &str) -> BoardServiceResult<()> {
        let name = normalize_name(name)?;
        self.workspace.tree.rename_board(board_id, name)?;
        Ok(())
    }

    /// Deletes one board with its lists and tasks.
    pub fn delete_board(&mut self, board_id: EntityId) -> BoardServiceResult<Board> {
        let board = self.workspace.tree.remove_board(board_id)?;
        debug!("event=board_delete module=service status=ok board_id={board_id}");
        Ok(board)
    }

    pub fn create_list(&mut self, board_id: EntityId, name: &str) -> BoardServiceResult<EntityId> {
        let name = normalize_name(name)?;
        let Workspace { tree, ids } = &mut *self.workspace;
        let id = tree.create_list(ids, board_id, name)?;
        debug!("event=list_create module=service status=ok list_id={id} board_id={board_id}");
        Ok(id)
    }

    pub fn rename_list(&mut self, list_id: EntityId, name: &str) -> BoardServiceResult<()> {
        let name = normalize_name(name)?;
        self.workspace.tree.rename_list(list_id, name)?;
        Ok(())
    }

    /// Deletes one list with its tasks.
    pub fn delete_list(&mut self, list_id: EntityId) -> BoardServiceResult<TaskList> {
        let list = self.workspace.tree.remove_list(list_id)?;
        debug!("event=list_delete module=service status=ok list_id={list_id}");
        Ok(list)
    }

    /// Validates and prepends a new task to `list_id`.
    pub fn add_task(&mut self, list_id: EntityId, request: NewTask) -> BoardServiceResult<EntityId> {
        let name = normalize_name(&request.name)?;
        let priority = normalize_priority(&request.priority)?;
        let date = validate_date(&request.date)?;
        let Workspace { tree, ids } = &mut *self.workspace;
        let id = tree.create_task(ids, list_id, name, priority, date)?;
        debug!("event=task_create module=service status=ok task_id={id} list_id={list_id}");
        Ok(id)
    }

    /// Applies an edit. Blank fields keep the current value; an invalid
    /// field rejects the whole edit.
    pub fn edit_task(&mut self, task_id: EntityId, edit: TaskEdit) -> BoardServiceResult<Task> {
        let normalized = TaskEdit {
            name: non_blank(edit.name)
                .map(|value| normalize_name(&value))
                .transpose()?,
            priority: non_blank(edit.priority)
                .map(|value| normalize_priority(&value))
                .transpose()?,
            date: non_blank(edit.date)
                .map(|value| validate_date(&value))
                .transpose()?,
        };
        if normalized.is_empty() {
            let task = self
                .workspace
                .tree
                .task(task_id)
                .ok_or(TreeError::TaskNotFound(task_id))?;
            debug!("event=task_edit module=service status=unchanged task_id={task_id}");
            return Ok(task.clone());
        }
        let task = self.workspace.tree.edit_task(task_id, normalized)?;
        debug!("event=task_edit module=service status=ok task_id={task_id}");
        Ok(task.clone())
    }

    pub fn delete_task(&mut self, task_id: EntityId) -> BoardServiceResult<Task> {
        let task = self.workspace.tree.remove_task(task_id)?;
        debug!("event=task_delete module=service status=ok task_id={task_id}");
        Ok(task)
    }

    /// Moves a task to another list of the same board.
    ///
    /// Targeting the task's current list is a no-op.
    pub fn move_task(
        &mut self,
        task_id: EntityId,
        target_list_id: EntityId,
    ) -> BoardServiceResult<MoveOutcome> {
        let tree = &self.workspace.tree;
        let task = tree.task(task_id).ok_or(TreeError::TaskNotFound(task_id))?;
        let source = tree
            .list(task.list_id)
            .ok_or(TreeError::ListNotFound(task.list_id))?;
        let target = tree
            .list(target_list_id)
            .ok_or(TreeError::ListNotFound(target_list_id))?;
        if target.board_id != source.board_id {
            return Err(BoardServiceError::ListOutsideBoard {
                list_id: target_list_id,
                board_id: source.board_id,
            });
        }

        let outcome = self.workspace.tree.move_task(task_id, target_list_id)?;
        debug!("event=task_move module=service status=ok task_id={task_id} outcome={outcome:?}");
        Ok(outcome)
    }

    pub fn sort_tasks(
        &mut self,
        list_id: EntityId,
        criterion: SortCriterion,
    ) -> BoardServiceResult<()> {
        self.workspace.tree.sort_tasks(list_id, criterion)?;
        Ok(())
    }
}

fn pick(position: usize, ids: impl ExactSizeIterator<Item = EntityId>) -> BoardServiceResult<EntityId> {
    let available = ids.len();
    position
        .checked_sub(1)
        .and_then(|index| ids.into_iter().nth(index))
        .ok_or(BoardServiceError::PositionOutOfRange {
            position,
            available,
        })
}

fn has_forbidden_char(value: &str) -> bool {
    value.contains([QUOTE, '\n', '\r'])
}

fn normalize_name(value: &str) -> BoardServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || has_forbidden_char(trimmed) {
        return Err(BoardServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}

fn normalize_priority(value: &str) -> BoardServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || has_forbidden_char(trimmed) {
        return Err(BoardServiceError::InvalidPriority);
    }
    Ok(trimmed.to_string())
}

fn validate_date(value: &str) -> BoardServiceResult<String> {
    let trimmed = value.trim();
    if !is_valid_due_date(trimmed) {
        return Err(BoardServiceError::InvalidDate(value.to_string()));
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
