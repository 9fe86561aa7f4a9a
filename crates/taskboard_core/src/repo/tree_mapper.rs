//! Mapping between `BoardTree` and the four flat tables.
//!
//! # Responsibility
//! - Flatten the tree into users/boards/lists/tasks rows on save.
//! - Rebuild the tree from those rows on load, re-linking children to
//!   parents by foreign key.
//!
//! # Invariants
//! - Load order is users → boards → lists → tasks.
//! - The child table is scanned in full once per loaded parent; each match
//!   is prepended, so loaded sequences are the reverse of row order.
//! - Every row whose foreign key matches a loaded parent is attached. A row
//!   whose id is already taken gets a fresh id above every id in the files,
//!   and its children still match it by the id stored in the file.
//! - A missing or unreadable table loads as empty; a short or non-numeric
//!   row is reported and skipped. Neither aborts the load.
//! - Save writes every table independently; one failed table does not stop
//!   the others.

use crate::codec::{decode_record, encode_record};
use crate::model::entity::{Board, EntityId, Task, TaskList, User};
use crate::model::id::IdGenerator;
use crate::model::tree::{BoardTree, TreeError};
use crate::model::workspace::Workspace;
use crate::repo::table::Table;
use crate::repo::table_store::{StoreError, TableStore};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Why one data row was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Row has fewer fields than the table requires.
    TooFewFields { found: usize, required: usize },
    /// An id column does not hold an integer.
    InvalidId { column: &'static str, value: String },
    /// Tree refused the row, e.g. a username loaded earlier.
    Rejected(TreeError),
    /// Row id was taken and no fresh id could be allocated.
    NoFreeId { id: EntityId },
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewFields { found, required } => {
                write!(f, "expected {required} fields, found {found}")
            }
            Self::InvalidId { column, value } => {
                write!(f, "column `{column}` is not an integer id: `{value}`")
            }
            Self::Rejected(err) => write!(f, "{err}"),
            Self::NoFreeId { id } => write!(f, "id {id} is taken and no fresh id is left"),
        }
    }
}

/// One data row dropped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub table: Table,
    /// 1-based line number in the table, header being line 1.
    pub line_number: usize,
    pub reason: SkipReason,
}

/// A row attached under a fresh id because its stored id was taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassignedId {
    pub table: Table,
    pub line_number: usize,
    pub stored_id: EntityId,
    pub assigned_id: EntityId,
}

/// Summary of one load pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Tables that did not exist.
    pub missing_tables: Vec<Table>,
    /// Tables that existed but could not be read, with the error text.
    pub unreadable_tables: Vec<(Table, String)>,
    pub skipped_rows: Vec<SkippedRow>,
    /// Rows kept under a new id; the next save writes the new id.
    pub reassigned_ids: Vec<ReassignedId>,
    /// Well-formed rows whose parent was never loaded.
    pub orphaned_rows: usize,
}

impl LoadReport {
    /// Returns whether every present row was attached under its stored id.
    pub fn is_clean(&self) -> bool {
        self.unreadable_tables.is_empty()
            && self.skipped_rows.is_empty()
            && self.reassigned_ids.is_empty()
            && self.orphaned_rows == 0
    }
}

/// Summary of one save pass.
#[derive(Debug, Default)]
pub struct SaveReport {
    /// Tables written, with their data row counts.
    pub written: Vec<(Table, usize)>,
    /// Tables that could not be written.
    pub failures: Vec<StoreError>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

struct UserRow {
    line_number: usize,
    username: String,
    password: String,
}

struct BoardRow {
    line_number: usize,
    id: EntityId,
    name: String,
    username: String,
}

struct ListRow {
    line_number: usize,
    id: EntityId,
    name: String,
    board_id: EntityId,
}

struct TaskRow {
    line_number: usize,
    id: EntityId,
    name: String,
    priority: String,
    date: String,
    list_id: EntityId,
}

/// Rebuilds the tree from `store`.
pub fn load_tree<S: TableStore + ?Sized>(store: &S) -> (BoardTree, LoadReport) {
    let started_at = Instant::now();
    info!("event=store_load module=repo status=start");

    let mut report = LoadReport::default();
    let mut tree = BoardTree::new();

    let user_rows = parse_rows(store, Table::Users, &mut report, |line_number, fields| {
        Ok(UserRow {
            line_number,
            username: fields[0].clone(),
            password: fields[1].clone(),
        })
    });
    let board_rows = parse_rows(store, Table::Boards, &mut report, |line_number, fields| {
        Ok(BoardRow {
            line_number,
            id: parse_id("Board ID", &fields[0])?,
            name: fields[1].clone(),
            username: fields[2].clone(),
        })
    });
    let list_rows = parse_rows(store, Table::Lists, &mut report, |line_number, fields| {
        Ok(ListRow {
            line_number,
            id: parse_id("List ID", &fields[0])?,
            name: fields[1].clone(),
            board_id: parse_id("Board ID", &fields[2])?,
        })
    });
    let task_rows = parse_rows(store, Table::Tasks, &mut report, |line_number, fields| {
        Ok(TaskRow {
            line_number,
            id: parse_id("Task ID", &fields[0])?,
            name: fields[1].clone(),
            priority: fields[2].clone(),
            date: fields[3].clone(),
            list_id: parse_id("List ID", &fields[4])?,
        })
    });

    for row in user_rows {
        let user = User::new(row.username, row.password);
        if let Err(err) = tree.insert_user(user) {
            skip_row(&mut report, Table::Users, row.line_number, SkipReason::Rejected(err));
        }
    }

    let largest_stored_id = board_rows
        .iter()
        .map(|row| row.id)
        .chain(list_rows.iter().map(|row| row.id))
        .chain(task_rows.iter().map(|row| row.id))
        .max()
        .unwrap_or(0);
    let mut fresh_ids = IdGenerator::starting_after(largest_stored_id);

    // Tree id -> id stored in the file, used to match child rows.
    let mut board_sources: HashMap<EntityId, EntityId> = HashMap::new();
    let mut consumed = vec![false; board_rows.len()];
    let usernames: Vec<String> = tree.users().map(|user| user.username.clone()).collect();
    for username in &usernames {
        for (index, row) in board_rows.iter().enumerate() {
            if row.username != *username {
                continue;
            }
            consumed[index] = true;
            let taken = tree.board(row.id).is_some();
            let Some(id) = resolve_id(
                taken,
                Table::Boards,
                row.line_number,
                row.id,
                &mut fresh_ids,
                &mut report,
            ) else {
                continue;
            };
            let board = Board {
                id,
                name: row.name.clone(),
                owner: row.username.clone(),
            };
            match tree.insert_board(board) {
                Ok(()) => {
                    board_sources.insert(id, row.id);
                }
                Err(err) => {
                    skip_row(&mut report, Table::Boards, row.line_number, SkipReason::Rejected(err))
                }
            }
        }
    }
    report.orphaned_rows += count_orphans(Table::Boards, &consumed);

    let mut list_sources: HashMap<EntityId, EntityId> = HashMap::new();
    let mut consumed = vec![false; list_rows.len()];
    let board_ids: Vec<EntityId> = usernames
        .iter()
        .flat_map(|username| tree.boards_of(username))
        .map(|board| board.id)
        .collect();
    for board_id in &board_ids {
        let stored_board_id = board_sources.get(board_id).copied().unwrap_or(*board_id);
        for (index, row) in list_rows.iter().enumerate() {
            if row.board_id != stored_board_id {
                continue;
            }
            consumed[index] = true;
            let taken = tree.list(row.id).is_some();
            let Some(id) = resolve_id(
                taken,
                Table::Lists,
                row.line_number,
                row.id,
                &mut fresh_ids,
                &mut report,
            ) else {
                continue;
            };
            let list = TaskList {
                id,
                name: row.name.clone(),
                board_id: *board_id,
            };
            match tree.insert_list(list) {
                Ok(()) => {
                    list_sources.insert(id, row.id);
                }
                Err(err) => {
                    skip_row(&mut report, Table::Lists, row.line_number, SkipReason::Rejected(err))
                }
            }
        }
    }
    report.orphaned_rows += count_orphans(Table::Lists, &consumed);

    let mut consumed = vec![false; task_rows.len()];
    let list_ids: Vec<EntityId> = board_ids
        .iter()
        .flat_map(|board_id| tree.lists_of(*board_id))
        .map(|list| list.id)
        .collect();
    for list_id in &list_ids {
        let stored_list_id = list_sources.get(list_id).copied().unwrap_or(*list_id);
        for (index, row) in task_rows.iter().enumerate() {
            if row.list_id != stored_list_id {
                continue;
            }
            consumed[index] = true;
            let taken = tree.task(row.id).is_some();
            let Some(id) = resolve_id(
                taken,
                Table::Tasks,
                row.line_number,
                row.id,
                &mut fresh_ids,
                &mut report,
            ) else {
                continue;
            };
            let task = Task {
                id,
                name: row.name.clone(),
                priority: row.priority.clone(),
                date: row.date.clone(),
                list_id: *list_id,
            };
            if let Err(err) = tree.insert_task(task) {
                skip_row(&mut report, Table::Tasks, row.line_number, SkipReason::Rejected(err));
            }
        }
    }
    report.orphaned_rows += count_orphans(Table::Tasks, &consumed);

    info!(
        "event=store_load module=repo status=ok duration_ms={} users={} boards={} lists={} tasks={} skipped={} reassigned={} orphaned={}",
        started_at.elapsed().as_millis(),
        tree.user_count(),
        tree.board_count(),
        tree.list_count(),
        tree.task_count(),
        report.skipped_rows.len(),
        report.reassigned_ids.len(),
        report.orphaned_rows
    );
    (tree, report)
}

/// Loads the tree and seeds its id generator above every loaded id.
pub fn load_workspace<S: TableStore + ?Sized>(store: &S) -> (Workspace, LoadReport) {
    let (tree, report) = load_tree(store);
    let workspace = Workspace::from_tree(tree);
    debug!(
        "event=workspace_load module=repo status=ok last_id={}",
        workspace.ids.last_issued()
    );
    (workspace, report)
}

/// Writes every table from `tree`, replacing previous content.
pub fn save_tree<S: TableStore + ?Sized>(store: &mut S, tree: &BoardTree) -> SaveReport {
    let started_at = Instant::now();
    info!("event=store_save module=repo status=start");

    let mut report = SaveReport::default();
    for table in Table::ALL {
        let rows = table_rows(tree, table);
        let row_count = rows.len();
        let mut lines = Vec::with_capacity(row_count + 1);
        lines.push(encode_record(table.header()));
        lines.extend(rows.iter().map(|row| encode_record(row)));

        match store.write_lines(table, &lines) {
            Ok(()) => {
                debug!(
                    "event=table_write module=repo status=ok table={} rows={}",
                    table, row_count
                );
                report.written.push((table, row_count));
            }
            Err(err) => {
                error!(
                    "event=table_write module=repo status=error table={} error={}",
                    table, err
                );
                report.failures.push(err);
            }
        }
    }

    info!(
        "event=store_save module=repo status={} duration_ms={} tables_written={} tables_failed={}",
        if report.is_complete() { "ok" } else { "partial" },
        started_at.elapsed().as_millis(),
        report.written.len(),
        report.failures.len()
    );
    report
}

fn table_rows(tree: &BoardTree, table: Table) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    for user in tree.users() {
        if table == Table::Users {
            rows.push(vec![user.username.clone(), user.password.clone()]);
            continue;
        }
        for board in tree.boards_of(&user.username) {
            if table == Table::Boards {
                rows.push(vec![
                    board.id.to_string(),
                    board.name.clone(),
                    user.username.clone(),
                ]);
                continue;
            }
            for list in tree.lists_of(board.id) {
                if table == Table::Lists {
                    rows.push(vec![list.id.to_string(), list.name.clone(), board.id.to_string()]);
                    continue;
                }
                for task in tree.tasks_of(list.id) {
                    rows.push(vec![
                        task.id.to_string(),
                        task.name.clone(),
                        task.priority.clone(),
                        task.date.clone(),
                        list.id.to_string(),
                    ]);
                }
            }
        }
    }
    rows
}

/// Reads, decodes and shape-checks the data rows of one table.
///
/// Returns rows that passed `parse`, in file order.
fn parse_rows<S, T, F>(
    store: &S,
    table: Table,
    report: &mut LoadReport,
    parse: F,
) -> Vec<T>
where
    S: TableStore + ?Sized,
    F: Fn(usize, &[String]) -> Result<T, SkipReason>,
{
    let lines = match store.read_lines(table) {
        Ok(Some(lines)) => lines,
        Ok(None) => {
            info!(
                "event=table_read module=repo status=missing table={}",
                table
            );
            report.missing_tables.push(table);
            return Vec::new();
        }
        Err(err) => {
            warn!(
                "event=table_read module=repo status=error table={} error={}",
                table, err
            );
            report.unreadable_tables.push((table, err.to_string()));
            return Vec::new();
        }
    };

    let mut rows = Vec::new();
    // Line 1 is the header.
    for (index, line) in lines.iter().enumerate().skip(1) {
        let line_number = index + 1;
        let fields = decode_record(line);
        let required = table.required_fields();
        if fields.len() < required {
            skip_row(
                report,
                table,
                line_number,
                SkipReason::TooFewFields {
                    found: fields.len(),
                    required,
                },
            );
            continue;
        }
        match parse(line_number, &fields) {
            Ok(row) => rows.push(row),
            Err(reason) => skip_row(report, table, line_number, reason),
        }
    }
    debug!(
        "event=table_read module=repo status=ok table={} rows={}",
        table,
        rows.len()
    );
    rows
}

fn parse_id(column: &'static str, value: &str) -> Result<EntityId, SkipReason> {
    value
        .trim()
        .parse::<EntityId>()
        .map_err(|_| SkipReason::InvalidId {
            column,
            value: value.to_string(),
        })
}

/// Returns the id a matched row is attached under, or `None` when the row
/// had to be skipped.
fn resolve_id(
    taken: bool,
    table: Table,
    line_number: usize,
    stored_id: EntityId,
    fresh_ids: &mut IdGenerator,
    report: &mut LoadReport,
) -> Option<EntityId> {
    if !taken {
        return Some(stored_id);
    }
    match fresh_ids.next_id() {
        Ok(assigned_id) => {
            warn!(
                "event=id_reassigned module=repo table={} line={} stored_id={} assigned_id={}",
                table, line_number, stored_id, assigned_id
            );
            report.reassigned_ids.push(ReassignedId {
                table,
                line_number,
                stored_id,
                assigned_id,
            });
            Some(assigned_id)
        }
        Err(_) => {
            skip_row(report, table, line_number, SkipReason::NoFreeId { id: stored_id });
            None
        }
    }
}

fn skip_row(report: &mut LoadReport, table: Table, line_number: usize, reason: SkipReason) {
    warn!(
        "event=row_skipped module=repo table={} line={} reason={}",
        table, line_number, reason
    );
    report.skipped_rows.push(SkippedRow {
        table,
        line_number,
        reason,
    });
}

fn count_orphans(table: Table, consumed: &[bool]) -> usize {
    let orphans = consumed.iter().filter(|used| !**used).count();
    if orphans > 0 {
        warn!(
            "event=rows_orphaned module=repo table={} rows={}",
            table, orphans
        );
    }
    orphans
}
