//! Core domain logic for the taskboard manager.
//! This crate owns the board hierarchy, its invariants and its persistence.

pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;

pub use config::{StoreConfig, DATA_DIR_ENV};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::date::{format_due_date, is_valid_due_date};
pub use model::entity::{Board, EntityId, EntityKind, Task, TaskEdit, TaskList, User};
pub use model::id::IdGenerator;
pub use model::ordering::{priority_rank, SortCriterion, PRIORITY_LEVELS};
pub use model::tree::{BoardTree, MoveOutcome, TreeError, TreeResult};
pub use model::workspace::Workspace;
pub use repo::table::Table;
pub use repo::table_store::{FlatFileStore, MemoryTableStore, StoreError, StoreResult, TableStore};
pub use repo::tree_mapper::{
    load_tree, load_workspace, save_tree, LoadReport, ReassignedId, SaveReport, SkipReason,
    SkippedRow,
};
pub use service::account_service::{AccountService, AccountServiceError};
pub use service::board_service::{BoardService, BoardServiceError, BoardServiceResult, NewTask};
pub use service::report_service::{upcoming_tasks, UpcomingTask, UPCOMING_LIMIT};
pub use session::{Command, Outcome, Session, SessionError, SessionState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
