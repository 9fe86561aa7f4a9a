//! Store location configuration.
//!
//! # Responsibility
//! - Resolve where the four table files live.
//!
//! # Invariants
//! - Table file names are fixed; only the directory is configurable.

use crate::repo::table::Table;
use std::path::{Path, PathBuf};

/// Environment variable the CLI reads the data directory from.
pub const DATA_DIR_ENV: &str = "TASKBOARD_DATA_DIR";

/// Location of the persisted tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Full path of one table file.
    pub fn table_path(&self, table: Table) -> PathBuf {
        self.data_dir.join(table.file_name())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
