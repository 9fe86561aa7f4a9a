//! In-memory ownership tree for users, boards, lists and tasks.
//!
//! # Responsibility
//! - Store every entity in a flat arena keyed by its identity.
//! - Keep per-parent child sequences that define display and save order.
//! - Provide unchecked structural mutations; input validation lives in the
//!   service layer.
//!
//! # Invariants
//! - Every child sequence is newest-first: inserts prepend.
//! - A child's parent key always names an entity present in the arena.
//! - Removing a parent drops its whole subtree.
//! - Ids are unique per entity kind.

use crate::model::entity::{Board, EntityId, EntityKind, Task, TaskEdit, TaskList, User};
use crate::model::id::IdGenerator;
use crate::model::ordering::SortCriterion;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::Hash;

/// Result type used by tree mutations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Structural errors from tree lookups and mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// No user with this username.
    UserNotFound(String),
    /// Username is already taken.
    DuplicateUser(String),
    BoardNotFound(EntityId),
    ListNotFound(EntityId),
    TaskNotFound(EntityId),
    /// Another entity of the same kind already uses this id.
    DuplicateId { kind: EntityKind, id: EntityId },
    /// The id generator has already issued the largest possible id.
    IdsExhausted,
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserNotFound(username) => write!(f, "user not found: {username}"),
            Self::DuplicateUser(username) => write!(f, "username is already taken: {username}"),
            Self::BoardNotFound(id) => write!(f, "board not found: {id}"),
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::DuplicateId { kind, id } => write!(f, "duplicate {kind} id: {id}"),
            Self::IdsExhausted => write!(f, "no ids left to allocate"),
        }
    }
}

impl Error for TreeError {}

/// Result of a task move request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Task left `from` and now heads `to`.
    Moved { from: EntityId, to: EntityId },
    /// Target was the task's current list; nothing changed.
    Unchanged,
}

/// Arena-backed board hierarchy.
#[derive(Debug, Clone, Default)]
pub struct BoardTree {
    users: HashMap<String, User>,
    user_order: Vec<String>,
    boards: HashMap<EntityId, Board>,
    boards_by_user: HashMap<String, Vec<EntityId>>,
    lists: HashMap<EntityId, TaskList>,
    lists_by_board: HashMap<EntityId, Vec<EntityId>>,
    tasks: HashMap<EntityId, Task>,
    tasks_by_list: HashMap<EntityId, Vec<EntityId>>,
}

impl BoardTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Users in tree order (newest first).
    pub fn users(&self) -> impl Iterator<Item = &User> + '_ {
        self.user_order
            .iter()
            .filter_map(|username| self.users.get(username))
    }

    pub fn user(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    pub fn contains_user(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Boards owned by `username`, newest first. Empty for unknown users.
    pub fn boards_of(&self, username: &str) -> Vec<&Board> {
        collect_children(&self.boards_by_user, username, &self.boards)
    }

    pub fn board(&self, board_id: EntityId) -> Option<&Board> {
        self.boards.get(&board_id)
    }

    /// Lists under `board_id`, newest first. Empty for unknown boards.
    pub fn lists_of(&self, board_id: EntityId) -> Vec<&TaskList> {
        collect_children(&self.lists_by_board, &board_id, &self.lists)
    }

    pub fn list(&self, list_id: EntityId) -> Option<&TaskList> {
        self.lists.get(&list_id)
    }

    /// Tasks under `list_id` in current sequence order.
    pub fn tasks_of(&self, list_id: EntityId) -> Vec<&Task> {
        collect_children(&self.tasks_by_list, &list_id, &self.tasks)
    }

    pub fn task(&self, task_id: EntityId) -> Option<&Task> {
        self.tasks.get(&task_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn board_count(&self) -> usize {
        self.boards.len()
    }

    pub fn list_count(&self) -> usize {
        self.lists.len()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Largest board, list or task id present, `0` for an empty tree.
    pub fn max_entity_id(&self) -> EntityId {
        self.boards
            .keys()
            .chain(self.lists.keys())
            .chain(self.tasks.keys())
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Prepends one user.
    pub fn insert_user(&mut self, user: User) -> TreeResult<()> {
        if self.users.contains_key(&user.username) {
            return Err(TreeError::DuplicateUser(user.username));
        }
        self.user_order.insert(0, user.username.clone());
        self.users.insert(user.username.clone(), user);
        Ok(())
    }

    /// Prepends one board under its `owner`.
    pub fn insert_board(&mut self, board: Board) -> TreeResult<()> {
        if !self.users.contains_key(&board.owner) {
            return Err(TreeError::UserNotFound(board.owner));
        }
        if self.boards.contains_key(&board.id) {
            return Err(TreeError::DuplicateId {
                kind: EntityKind::Board,
                id: board.id,
            });
        }
        self.boards_by_user
            .entry(board.owner.clone())
            .or_default()
            .insert(0, board.id);
        self.boards.insert(board.id, board);
        Ok(())
    }

    /// Prepends one list under its `board_id`.
    pub fn insert_list(&mut self, list: TaskList) -> TreeResult<()> {
        if !self.boards.contains_key(&list.board_id) {
            return Err(TreeError::BoardNotFound(list.board_id));
        }
        if self.lists.contains_key(&list.id) {
            return Err(TreeError::DuplicateId {
                kind: EntityKind::List,
                id: list.id,
            });
        }
        self.lists_by_board
            .entry(list.board_id)
            .or_default()
            .insert(0, list.id);
        self.lists.insert(list.id, list);
        Ok(())
    }

    /// Prepends one task under its `list_id`.
    pub fn insert_task(&mut self, task: Task) -> TreeResult<()> {
        if !self.lists.contains_key(&task.list_id) {
            return Err(TreeError::ListNotFound(task.list_id));
        }
        if self.tasks.contains_key(&task.id) {
            return Err(TreeError::DuplicateId {
                kind: EntityKind::Task,
                id: task.id,
            });
        }
        self.tasks_by_list
            .entry(task.list_id)
            .or_default()
            .insert(0, task.id);
        self.tasks.insert(task.id, task);
        Ok(())
    }

    /// Allocates an id and prepends a new board for `owner`.
    pub fn create_board(
        &mut self,
        ids: &mut IdGenerator,
        owner: &str,
        name: impl Into<String>,
    ) -> TreeResult<EntityId> {
        if !self.users.contains_key(owner) {
            return Err(TreeError::UserNotFound(owner.to_string()));
        }
        let id = ids.next_id()?;
        self.insert_board(Board {
            id,
            name: name.into(),
            owner: owner.to_string(),
        })?;
        Ok(id)
    }

    /// Allocates an id and prepends a new list under `board_id`.
    pub fn create_list(
        &mut self,
        ids: &mut IdGenerator,
        board_id: EntityId,
        name: impl Into<String>,
    ) -> TreeResult<EntityId> {
        if !self.boards.contains_key(&board_id) {
            return Err(TreeError::BoardNotFound(board_id));
        }
        let id = ids.next_id()?;
        self.insert_list(TaskList {
            id,
            name: name.into(),
            board_id,
        })?;
        Ok(id)
    }

    /// Allocates an id and prepends a new task under `list_id`.
    pub fn create_task(
        &mut self,
        ids: &mut IdGenerator,
        list_id: EntityId,
        name: impl Into<String>,
        priority: impl Into<String>,
        date: impl Into<String>,
    ) -> TreeResult<EntityId> {
        if !self.lists.contains_key(&list_id) {
            return Err(TreeError::ListNotFound(list_id));
        }
        let id = ids.next_id()?;
        self.insert_task(Task {
            id,
            name: name.into(),
            priority: priority.into(),
            date: date.into(),
            list_id,
        })?;
        Ok(id)
    }

    pub fn rename_board(&mut self, board_id: EntityId, name: impl Into<String>) -> TreeResult<()> {
        let board = self
            .boards
            .get_mut(&board_id)
            .ok_or(TreeError::BoardNotFound(board_id))?;
        board.name = name.into();
        Ok(())
    }

    pub fn rename_list(&mut self, list_id: EntityId, name: impl Into<String>) -> TreeResult<()> {
        let list = self
            .lists
            .get_mut(&list_id)
            .ok_or(TreeError::ListNotFound(list_id))?;
        list.name = name.into();
        Ok(())
    }

    /// Applies the `Some` fields of `edit` to one task.
    pub fn edit_task(&mut self, task_id: EntityId, edit: TaskEdit) -> TreeResult<&Task> {
        let task = self
            .tasks
            .get_mut(&task_id)
            .ok_or(TreeError::TaskNotFound(task_id))?;
        if let Some(name) = edit.name {
            task.name = name;
        }
        if let Some(priority) = edit.priority {
            task.priority = priority;
        }
        if let Some(date) = edit.date {
            task.date = date;
        }
        Ok(task)
    }

    /// Removes one board with all of its lists and tasks.
    pub fn remove_board(&mut self, board_id: EntityId) -> TreeResult<Board> {
        let board = self
            .boards
            .remove(&board_id)
            .ok_or(TreeError::BoardNotFound(board_id))?;
        if let Some(siblings) = self.boards_by_user.get_mut(&board.owner) {
            siblings.retain(|id| *id != board_id);
        }
        for list_id in self.lists_by_board.remove(&board_id).unwrap_or_default() {
            self.lists.remove(&list_id);
            self.drop_tasks_of(list_id);
        }
        Ok(board)
    }

    /// Removes one list with all of its tasks.
    pub fn remove_list(&mut self, list_id: EntityId) -> TreeResult<TaskList> {
        let list = self
            .lists
            .remove(&list_id)
            .ok_or(TreeError::ListNotFound(list_id))?;
        if let Some(siblings) = self.lists_by_board.get_mut(&list.board_id) {
            siblings.retain(|id| *id != list_id);
        }
        self.drop_tasks_of(list_id);
        Ok(list)
    }

    pub fn remove_task(&mut self, task_id: EntityId) -> TreeResult<Task> {
        let task = self
            .tasks
            .remove(&task_id)
            .ok_or(TreeError::TaskNotFound(task_id))?;
        if let Some(siblings) = self.tasks_by_list.get_mut(&task.list_id) {
            siblings.retain(|id| *id != task_id);
        }
        Ok(task)
    }

    /// Detaches a task from its list and prepends it to `target_list_id`.
    pub fn move_task(
        &mut self,
        task_id: EntityId,
        target_list_id: EntityId,
    ) -> TreeResult<MoveOutcome> {
        if !self.lists.contains_key(&target_list_id) {
            return Err(TreeError::ListNotFound(target_list_id));
        }
        let task = self
            .tasks
            .get_mut(&task_id)
            .ok_or(TreeError::TaskNotFound(task_id))?;
        let from = task.list_id;
        if from == target_list_id {
            return Ok(MoveOutcome::Unchanged);
        }
        task.list_id = target_list_id;

        if let Some(source) = self.tasks_by_list.get_mut(&from) {
            source.retain(|id| *id != task_id);
        }
        self.tasks_by_list
            .entry(target_list_id)
            .or_default()
            .insert(0, task_id);
        Ok(MoveOutcome::Moved {
            from,
            to: target_list_id,
        })
    }

    /// Reorders one list's tasks by `criterion`.
    pub fn sort_tasks(&mut self, list_id: EntityId, criterion: SortCriterion) -> TreeResult<()> {
        if !self.lists.contains_key(&list_id) {
            return Err(TreeError::ListNotFound(list_id));
        }
        let tasks = &self.tasks;
        let Some(order) = self.tasks_by_list.get_mut(&list_id) else {
            return Ok(());
        };
        if order.len() <= 1 {
            return Ok(());
        }
        order.sort_by(|a, b| match (tasks.get(a), tasks.get(b)) {
            (Some(a), Some(b)) => criterion.compare(a, b),
            _ => Ordering::Equal,
        });
        Ok(())
    }

    fn drop_tasks_of(&mut self, list_id: EntityId) {
        for task_id in self.tasks_by_list.remove(&list_id).unwrap_or_default() {
            self.tasks.remove(&task_id);
        }
    }
}

fn collect_children<'a, K, Q, V>(
    order: &HashMap<K, Vec<EntityId>>,
    parent: &Q,
    arena: &'a HashMap<EntityId, V>,
) -> Vec<&'a V>
where
    K: Borrow<Q> + Hash + Eq,
    Q: Hash + Eq + ?Sized,
{
    order
        .get(parent)
        .map(|ids| ids.iter().filter_map(|id| arena.get(id)).collect())
        .unwrap_or_default()
}
