//! Command-line entry point.
//!
//! # Responsibility
//! - Resolve store and logging configuration from flags and environment.
//! - Run one account command against the flat-file store.
//! - Print the user's boards and upcoming deadlines after login.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};
use taskboard_core::{
    default_log_level, format_due_date, init_logging, load_workspace, logging_status, save_tree,
    BoardTree, Command, FlatFileStore, LoadReport, Outcome, SaveReport, Session, StoreConfig,
    UpcomingTask, DATA_DIR_ENV,
};

#[derive(Parser)]
#[command(name = "taskboard")]
#[command(version)]
#[command(about = "Personal task boards stored as flat files", long_about = None)]
struct Cli {
    /// Directory holding users.csv, boards.csv, lists.csv and tasks.csv
    #[arg(long, env = DATA_DIR_ENV, default_value = ".")]
    data_dir: PathBuf,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, env = "TASKBOARD_LOG_LEVEL")]
    log_level: Option<String>,

    /// Write rotating log files into this directory
    #[arg(long, env = "TASKBOARD_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and save it
    Signup { username: String, password: String },
    /// Log in and show boards plus the next upcoming tasks
    Login { username: String, password: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let log_dir = absolute(log_dir)?;
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy())
            .context("failed to initialize logging")?;
    }
    if let Some((level, log_dir)) = logging_status() {
        info!(
            "event=cli_start module=cli status=ok level={} log_dir={} version={}",
            level,
            log_dir.display(),
            env!("CARGO_PKG_VERSION")
        );
    }

    let mut store = FlatFileStore::new(StoreConfig::new(&cli.data_dir));
    let data_dir = store.config().data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;
    let (workspace, load_report) = load_workspace(&store);
    print_load_issues(&load_report);
    let mut session = Session::new(workspace);

    match cli.command {
        Commands::Signup { username, password } => {
            session
                .apply(Command::Signup {
                    username: username.clone(),
                    password,
                })
                .context("signup failed")?;
            println!("Signed up as {username}.");
        }
        Commands::Login { username, password } => {
            session
                .apply(Command::Login {
                    username: username.clone(),
                    password,
                })
                .context("login failed")?;
            println!("Logged in as {username}.");
            print_boards(&session.workspace().tree, &username);

            let today = format_due_date(chrono::Local::now().date_naive());
            if let Outcome::Upcoming(entries) = session
                .apply(Command::ShowUpcoming { today })
                .context("upcoming report failed")?
            {
                print_upcoming(&entries);
            }
        }
    }

    let workspace = session.into_workspace();
    let save_report = save_tree(&mut store, &workspace.tree);
    print_save_issues(&save_report);
    if !save_report.is_complete() {
        bail!("{} table(s) could not be saved", save_report.failures.len());
    }
    info!("event=cli_exit module=cli status=ok");
    Ok(())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}

fn print_boards(tree: &BoardTree, username: &str) {
    let boards = tree.boards_of(username);
    if boards.is_empty() {
        println!("No boards yet.");
        return;
    }
    for (index, board) in boards.iter().enumerate() {
        println!("{}. {}", index + 1, board.name);
        for list in tree.lists_of(board.id) {
            println!("   - {} ({} tasks)", list.name, tree.tasks_of(list.id).len());
        }
    }
}

fn print_upcoming(entries: &[UpcomingTask]) {
    if entries.is_empty() {
        println!("No upcoming tasks.");
        return;
    }
    println!("Upcoming:");
    for entry in entries {
        println!(
            "  {}  {} [{}] ({} / {})",
            entry.task.date, entry.task.name, entry.task.priority, entry.board_name, entry.list_name
        );
    }
}

fn print_load_issues(report: &LoadReport) {
    for (table, message) in &report.unreadable_tables {
        eprintln!("warning: {table} could not be read and was treated as empty: {message}");
    }
    for row in &report.skipped_rows {
        eprintln!(
            "warning: skipped {} line {}: {}",
            row.table, row.line_number, row.reason
        );
    }
    for moved in &report.reassigned_ids {
        eprintln!(
            "warning: {} line {} reused id {}; saved again as id {}",
            moved.table, moved.line_number, moved.stored_id, moved.assigned_id
        );
    }
    if report.orphaned_rows > 0 {
        eprintln!(
            "warning: {} row(s) reference missing parents and were not loaded",
            report.orphaned_rows
        );
    }
}

fn print_save_issues(report: &SaveReport) {
    for failure in &report.failures {
        eprintln!("error: {failure}");
    }
}
