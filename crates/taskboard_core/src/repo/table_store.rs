//! Raw line storage for the four tables.
//!
//! # Responsibility
//! - Read and replace whole tables as lines of text.
//! - Keep file-system details out of the tree mapper.
//!
//! # Invariants
//! - `write_lines` replaces the previous table content completely.
//! - A table that does not exist reads as `Ok(None)`, not as an error.

use crate::codec::read_record_lines;
use crate::config::StoreConfig;
use crate::repo::table::Table;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

pub type StoreResult<T> = Result<T, StoreError>;

/// I/O failure scoped to one table.
#[derive(Debug)]
pub enum StoreError {
    Read { table: Table, source: io::Error },
    Write { table: Table, source: io::Error },
}

impl StoreError {
    pub fn table(&self) -> Table {
        match self {
            Self::Read { table, .. } | Self::Write { table, .. } => *table,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { table, source } => write!(f, "unable to read {table}: {source}"),
            Self::Write { table, source } => write!(f, "unable to write {table}: {source}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
        }
    }
}

/// Line-level access to persisted tables.
pub trait TableStore {
    /// Returns every line of `table` (header included), or `None` when the
    /// table does not exist yet.
    fn read_lines(&self, table: Table) -> StoreResult<Option<Vec<String>>>;
    /// Replaces `table` with `lines`.
    fn write_lines(&mut self, table: Table, lines: &[String]) -> StoreResult<()>;
}

/// Tables stored as `*.csv` files in one directory.
#[derive(Debug, Clone)]
pub struct FlatFileStore {
    config: StoreConfig,
}

impl FlatFileStore {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}

impl TableStore for FlatFileStore {
    fn read_lines(&self, table: Table) -> StoreResult<Option<Vec<String>>> {
        let path = self.config.table_path(table);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Read { table, source }),
        };
        read_record_lines(BufReader::new(file))
            .map(Some)
            .map_err(|source| StoreError::Read { table, source })
    }

    fn write_lines(&mut self, table: Table, lines: &[String]) -> StoreResult<()> {
        let path = self.config.table_path(table);
        let write = || -> io::Result<()> {
            let mut writer = BufWriter::new(File::create(&path)?);
            for line in lines {
                writer.write_all(line.as_bytes())?;
                writer.write_all(b"\n")?;
            }
            writer.flush()
        };
        write().map_err(|source| StoreError::Write { table, source })
    }
}

/// Tables kept in memory; used for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryTableStore {
    tables: HashMap<Table, Vec<String>>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one table with raw lines (header included).
    pub fn with_lines<I, S>(mut self, table: Table, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .insert(table, lines.into_iter().map(Into::into).collect());
        self
    }

    pub fn lines(&self, table: Table) -> Option<&[String]> {
        self.tables.get(&table).map(Vec::as_slice)
    }
}

impl TableStore for MemoryTableStore {
    fn read_lines(&self, table: Table) -> StoreResult<Option<Vec<String>>> {
        Ok(self.tables.get(&table).cloned())
    }

    fn write_lines(&mut self, table: Table, lines: &[String]) -> StoreResult<()> {
        self.tables.insert(table, lines.to_vec());
        Ok(())
    }
}
