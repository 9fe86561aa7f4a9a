//! Navigation state machine for one interactive session.
//!
//! # Responsibility
//! - Track which view the user is in and what it is scoped to.
//! - Route each command to the matching service call, or reject it when
//!   the current view does not offer it.
//!
//! # Invariants
//! - `LoggedOut` is the initial state and the target of `Logout`.
//! - `Back` moves exactly one level up; from `Boards` it logs out.
//! - Commands only touch entities inside the current scope: a user's own
//!   boards, the open board's lists, the open list's tasks.

use crate::model::entity::{EntityId, EntityKind, TaskEdit};
use crate::model::ordering::SortCriterion;
use crate::model::tree::{MoveOutcome, TreeError};
use crate::model::workspace::Workspace;
use crate::service::account_service::{AccountService, AccountServiceError};
use crate::service::board_service::{BoardService, BoardServiceError, NewTask};
use crate::service::report_service::{upcoming_tasks, UpcomingTask, UPCOMING_LIMIT};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Current view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    Boards {
        username: String,
    },
    Lists {
        username: String,
        board_id: EntityId,
    },
    Tasks {
        username: String,
        board_id: EntityId,
        list_id: EntityId,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoggedOut => "logged_out",
            Self::Boards { .. } => "boards",
            Self::Lists { .. } => "lists",
            Self::Tasks { .. } => "tasks",
        }
    }

    /// Logged-in username, if any.
    pub fn username(&self) -> Option<&str> {
        match self {
            Self::LoggedOut => None,
            Self::Boards { username }
            | Self::Lists { username, .. }
            | Self::Tasks { username, .. } => Some(username),
        }
    }
}

/// Discrete user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Signup { username: String, password: String },
    Login { username: String, password: String },
    Logout,
    Back,
    OpenBoard(EntityId),
    CreateBoard { name: String },
    RenameBoard { board_id: EntityId, name: String },
    DeleteBoard(EntityId),
    OpenList(EntityId),
    CreateList { name: String },
    RenameList { list_id: EntityId, name: String },
    DeleteList(EntityId),
    AddTask(NewTask),
    EditTask { task_id: EntityId, edit: TaskEdit },
    DeleteTask(EntityId),
    MoveTask { task_id: EntityId, target_list_id: EntityId },
    SortTasks(SortCriterion),
    /// `today` is `YYYY-MM-DD`.
    ShowUpcoming { today: String },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Signup { .. } => "signup",
            Self::Login { .. } => "login",
            Self::Logout => "logout",
            Self::Back => "back",
            Self::OpenBoard(_) => "open_board",
            Self::CreateBoard { .. } => "create_board",
            Self::RenameBoard { .. } => "rename_board",
            Self::DeleteBoard(_) => "delete_board",
            Self::OpenList(_) => "open_list",
            Self::CreateList { .. } => "create_list",
            Self::RenameList { .. } => "rename_list",
            Self::DeleteList(_) => "delete_list",
            Self::AddTask(_) => "add_task",
            Self::EditTask { .. } => "edit_task",
            Self::DeleteTask(_) => "delete_task",
            Self::MoveTask { .. } => "move_task",
            Self::SortTasks(_) => "sort_tasks",
            Self::ShowUpcoming { .. } => "show_upcoming",
        }
    }
}

/// What a successful command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed; read it from `Session::state`.
    Navigated,
    Created(EntityId),
    Updated,
    Removed,
    Moved(MoveOutcome),
    Upcoming(Vec<UpcomingTask>),
}

/// Errors from `Session::apply`. The session state is unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Command is not offered in the current view.
    NotAvailable {
        state: &'static str,
        command: &'static str,
    },
    /// Entity exists but lies outside the current scope, or does not exist.
    OutOfScope { kind: EntityKind, id: EntityId },
    Account(AccountServiceError),
    Board(BoardServiceError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAvailable { state, command } => {
                write!(f, "`{command}` is not available in the {state} view")
            }
            Self::OutOfScope { kind, id } => write!(f, "{kind} {id} is not available here"),
            Self::Account(err) => write!(f, "{err}"),
            Self::Board(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Account(err) => Some(err),
            Self::Board(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AccountServiceError> for SessionError {
    fn from(value: AccountServiceError) -> Self {
        Self::Account(value)
    }
}

impl From<BoardServiceError> for SessionError {
    fn from(value: BoardServiceError) -> Self {
        Self::Board(value)
    }
}

impl From<TreeError> for SessionError {
    fn from(value: TreeError) -> Self {
        Self::Board(BoardServiceError::Tree(value))
    }
}

/// One user's pass through the menus over a workspace.
#[derive(Debug)]
pub struct Session {
    workspace: Workspace,
    state: SessionState,
}

impl Session {
    /// Starts logged out.
    pub fn new(workspace: Workspace) -> Self {
        Self {
            workspace,
            state: SessionState::LoggedOut,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Ends the session and hands the workspace back for saving.
    pub fn into_workspace(self) -> Workspace {
        self.workspace
    }

    /// Applies one command to the current state.
    pub fn apply(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let state_name = self.state.name();
        let command_name = command.name();
        let outcome = match (self.state.clone(), command) {
            (SessionState::LoggedOut, Command::Signup { username, password }) => {
                AccountService::new(&mut self.workspace.tree).signup(&username, &password)?;
                self.state = SessionState::Boards { username };
                Outcome::Navigated
            }
            (SessionState::LoggedOut, Command::Login { username, password }) => {
                AccountService::new(&mut self.workspace.tree).login(&username, &password)?;
                self.state = SessionState::Boards { username };
                Outcome::Navigated
            }
            (SessionState::LoggedOut, _) => {
                return Err(SessionError::NotAvailable {
                    state: state_name,
                    command: command_name,
                })
            }

            (_, Command::Logout) | (SessionState::Boards { .. }, Command::Back) => {
                self.state = SessionState::LoggedOut;
                Outcome::Navigated
            }
            (SessionState::Lists { username, .. }, Command::Back) => {
                self.state = SessionState::Boards { username };
                Outcome::Navigated
            }
            (
                SessionState::Tasks {
                    username, board_id, ..
                },
                Command::Back,
            ) => {
                self.state = SessionState::Lists { username, board_id };
                Outcome::Navigated
            }
            (state, Command::ShowUpcoming { today }) => {
                let username = state.username().unwrap_or_default();
                let report =
                    upcoming_tasks(&self.workspace.tree, username, &today, UPCOMING_LIMIT)?;
                Outcome::Upcoming(report)
            }

            (SessionState::Boards { username }, Command::OpenBoard(board_id)) => {
                self.ensure_board_owned(&username, board_id)?;
                self.state = SessionState::Lists { username, board_id };
                Outcome::Navigated
            }
            (SessionState::Boards { username }, Command::CreateBoard { name }) => {
                let id = self.boards().create_board(&username, &name)?;
                Outcome::Created(id)
            }
            (SessionState::Boards { username }, Command::RenameBoard { board_id, name }) => {
                self.ensure_board_owned(&username, board_id)?;
                self.boards().rename_board(board_id, &name)?;
                Outcome::Updated
            }
            (SessionState::Boards { username }, Command::DeleteBoard(board_id)) => {
                self.ensure_board_owned(&username, board_id)?;
                self.boards().delete_board(board_id)?;
                Outcome::Removed
            }

            (SessionState::Lists { username, board_id }, Command::OpenList(list_id)) => {
                self.ensure_list_in_board(board_id, list_id)?;
                self.state = SessionState::Tasks {
                    username,
                    board_id,
                    list_id,
                };
                Outcome::Navigated
            }
            (SessionState::Lists { board_id, .. }, Command::CreateList { name }) => {
                let id = self.boards().create_list(board_id, &name)?;
                Outcome::Created(id)
            }
            (SessionState::Lists { board_id, .. }, Command::RenameList { list_id, name }) => {
                self.ensure_list_in_board(board_id, list_id)?;
                self.boards().rename_list(list_id, &name)?;
                Outcome::Updated
            }
            (SessionState::Lists { board_id, .. }, Command::DeleteList(list_id)) => {
                self.ensure_list_in_board(board_id, list_id)?;
                self.boards().delete_list(list_id)?;
                Outcome::Removed
            }

            (SessionState::Tasks { list_id, .. }, Command::AddTask(request)) => {
                let id = self.boards().add_task(list_id, request)?;
                Outcome::Created(id)
            }
            (SessionState::Tasks { list_id, .. }, Command::EditTask { task_id, edit }) => {
                self.ensure_task_in_list(list_id, task_id)?;
                self.boards().edit_task(task_id, edit)?;
                Outcome::Updated
            }
            (SessionState::Tasks { list_id, .. }, Command::DeleteTask(task_id)) => {
                self.ensure_task_in_list(list_id, task_id)?;
                self.boards().delete_task(task_id)?;
                Outcome::Removed
            }
            (
                SessionState::Tasks {
                    board_id, list_id, ..
                },
                Command::MoveTask {
                    task_id,
                    target_list_id,
                },
            ) => {
                self.ensure_task_in_list(list_id, task_id)?;
                self.ensure_list_in_board(board_id, target_list_id)?;
                Outcome::Moved(self.boards().move_task(task_id, target_list_id)?)
            }
            (SessionState::Tasks { list_id, .. }, Command::SortTasks(criterion)) => {
                self.boards().sort_tasks(list_id, criterion)?;
                Outcome::Updated
            }

            _ => {
                return Err(SessionError::NotAvailable {
                    state: state_name,
                    command: command_name,
                })
            }
        };
        debug!(
            "event=session_command module=session status=ok command={} from={} to={}",
            command_name,
            state_name,
            self.state.name()
        );
        Ok(outcome)
    }

    fn boards(&mut self) -> BoardService<'_> {
        BoardService::new(&mut self.workspace)
    }

    fn ensure_board_owned(&self, username: &str, board_id: EntityId) -> Result<(), SessionError> {
        match self.workspace.tree.board(board_id) {
            Some(board) if board.owner == username => Ok(()),
            _ => Err(SessionError::OutOfScope {
                kind: EntityKind::Board,
                id: board_id,
            }),
        }
    }

    fn ensure_list_in_board(&self, board_id: EntityId, list_id: EntityId) -> Result<(), SessionError> {
        match self.workspace.tree.list(list_id) {
            Some(list) if list.board_id == board_id => Ok(()),
            _ => Err(SessionError::OutOfScope {
                kind: EntityKind::List,
                id: list_id,
            }),
        }
    }

    fn ensure_task_in_list(&self, list_id: EntityId, task_id: EntityId) -> Result<(), SessionError> {
        match self.workspace.tree.task(task_id) {
            Some(task) if task.list_id == list_id => Ok(()),
            _ => Err(SessionError::OutOfScope {
                kind: EntityKind::Task,
                id: task_id,
            }),
        }
    }
}
